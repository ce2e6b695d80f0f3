// Turns a dashboard report into something to display. The report itself never contains
// any presentation.

use manifesto_analytics::dashboard::{DashboardReport, PartyReport};
use manifesto_analytics::*;
use serde_json::json;
use serde_json::Value as JSValue;

pub trait ReportRenderer {
    type Output;

    fn render(&self, report: &DashboardReport) -> Self::Output;
}

/// The summary in JSON format, as written by --out and compared with --reference.
pub struct JsonRenderer {
    pub dashboard_name: String,
}

/// One line per panel, for the logs.
pub struct TextRenderer;

fn ranking_js(ranking: &Ranking) -> JSValue {
    JSValue::Array(
        ranking
            .iter()
            .map(|(name, count)| json!({"name": name, "count": count}))
            .collect(),
    )
}

fn profile_js(profile: &DomainProfile) -> JSValue {
    JSValue::Array(
        profile
            .totals
            .iter()
            .map(|(name, value)| json!({"name": name, "value": value}))
            .collect(),
    )
}

fn trend_js(series: &TrendSeries) -> JSValue {
    JSValue::Array(
        series
            .iter()
            .map(|(year, value)| json!({"year": year, "value": value}))
            .collect(),
    )
}

fn keyword_trend_js(series: &Vec<(u16, u64)>) -> JSValue {
    JSValue::Array(
        series
            .iter()
            .map(|(year, rows)| json!({"year": year, "rows": rows}))
            .collect(),
    )
}

fn search_js(hits: &SearchHits) -> JSValue {
    json!({"matchingRows": hits.matching_rows, "occurrences": hits.occurrences})
}

// A failed panel is replaced by its error message.
fn panel_js<T>(res: &AnalyticsResult<T>, f: impl Fn(&T) -> JSValue) -> JSValue {
    match res {
        Ok(x) => f(x),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

fn optional_panel_js<T>(res: &Option<AnalyticsResult<T>>, f: impl Fn(&T) -> JSValue) -> JSValue {
    match res {
        Some(r) => panel_js(r, f),
        None => JSValue::Null,
    }
}

fn party_js(pr: &PartyReport) -> JSValue {
    json!({
        "party": pr.party.as_str(),
        "rows": pr.row_count,
        "years": pr.year_count,
        "topDomains": ranking_js(&pr.top_domains),
        "topSubcategories": ranking_js(&pr.top_subcategories),
        "topSummaryTopics": ranking_js(&pr.top_summary_topics),
        "topEntities": ranking_js(&pr.top_entities),
        "wordCloud": ranking_js(&pr.word_cloud),
        "domainProfile": panel_js(&pr.domain_profile, profile_js),
        "subcategoryProfile": panel_js(&pr.subcategory_profile, profile_js),
        "domainBreakdown": optional_panel_js(&pr.domain_breakdown, profile_js),
        "trend": optional_panel_js(&pr.trend, trend_js),
        "search": optional_panel_js(&pr.search, search_js),
        "keywordTrend": optional_panel_js(&pr.keyword_trend, keyword_trend_js),
    })
}

impl ReportRenderer for JsonRenderer {
    type Output = JSValue;

    fn render(&self, report: &DashboardReport) -> JSValue {
        let config = json!({
            "dashboard": self.dashboard_name,
            "fromYear": report.year_range.lo,
            "toYear": report.year_range.hi,
            "compareMode": report.compare_mode,
            "category": report.selected_category,
            "domain": report.selected_domain,
        });
        let results: Vec<JSValue> = report.parties.iter().map(party_js).collect();
        json!({ "config": config, "results": results })
    }
}

fn ranking_text(ranking: &Ranking) -> String {
    let items: Vec<String> = ranking
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect();
    items.join(", ")
}

fn profile_text(profile: &DomainProfile) -> String {
    let items: Vec<String> = profile
        .totals
        .iter()
        .map(|(name, value)| format!("{} {}", name, value))
        .collect();
    items.join(", ")
}

fn panel_text<T>(res: &AnalyticsResult<T>, f: impl Fn(&T) -> String) -> String {
    match res {
        Ok(x) => f(x),
        Err(e) => format!("error: {}", e),
    }
}

impl ReportRenderer for TextRenderer {
    type Output = Vec<String>;

    fn render(&self, report: &DashboardReport) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for pr in report.parties.iter() {
            lines.push(format!(
                "Party {}: {} rows over {} years ({}-{})",
                pr.party, pr.row_count, pr.year_count, report.year_range.lo, report.year_range.hi
            ));
            lines.push(format!("  top domains: {}", ranking_text(&pr.top_domains)));
            lines.push(format!(
                "  top subcategories: {}",
                ranking_text(&pr.top_subcategories)
            ));
            lines.push(format!(
                "  top summary topics: {}",
                ranking_text(&pr.top_summary_topics)
            ));
            lines.push(format!("  top entities: {}", ranking_text(&pr.top_entities)));
            lines.push(format!("  word cloud: {}", ranking_text(&pr.word_cloud)));
            lines.push(format!(
                "  domain profile: {}",
                panel_text(&pr.domain_profile, profile_text)
            ));
            lines.push(format!(
                "  subcategory profile: {}",
                panel_text(&pr.subcategory_profile, profile_text)
            ));
            if let (Some(domain), Some(res)) = (&report.selected_domain, &pr.domain_breakdown) {
                lines.push(format!(
                    "  breakdown of {}: {}",
                    domain,
                    panel_text(res, profile_text)
                ));
            }
            if let (Some(category), Some(res)) = (&report.selected_category, &pr.trend) {
                lines.push(format!(
                    "  trend of {}: {}",
                    category,
                    panel_text(res, |series: &TrendSeries| {
                        let items: Vec<String> = series
                            .iter()
                            .map(|(year, value)| format!("{}: {}", year, value))
                            .collect();
                        items.join(", ")
                    })
                ));
            }
            if let Some(res) = &pr.search {
                lines.push(format!(
                    "  search: {}",
                    panel_text(res, |hits: &SearchHits| format!(
                        "{} rows, {} occurrences",
                        hits.matching_rows, hits.occurrences
                    ))
                ));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifesto_analytics::builder::CorpusBuilder;
    use manifesto_analytics::dashboard::run_dashboard;
    use std::collections::BTreeMap;

    fn report() -> DashboardReport {
        let mut scores = BTreeMap::new();
        scores.insert("Agriculture".to_string(), 2.0);
        let record = ManifestoRecord {
            year: 2019,
            domains: "Economy, Economy".to_string(),
            topic_subcategories: "Agriculture, Irrigation".to_string(),
            summary_topics: "farmers".to_string(),
            ner: "[('Kisan', 'ORG')]".to_string(),
            text: "Support for farmers".to_string(),
            scores,
        };
        let store = CorpusBuilder::new()
            .taxonomy(&[TaxonomyEntry::new("Agriculture", "Economy")])
            .unwrap()
            .party(&PartyId::new("BJP"), vec![record])
            .unwrap()
            .build()
            .unwrap();
        let config = DashboardConfig::new(PartyId::new("BJP"))
            .with_category("Agriculture")
            .with_domain("Security");
        run_dashboard(&store, &config).unwrap()
    }

    #[test]
    fn json_summary() {
        let js = JsonRenderer {
            dashboard_name: "test".to_string(),
        }
        .render(&report());
        assert_eq!(js["config"]["dashboard"], "test");
        assert_eq!(js["config"]["fromYear"], 2004);
        assert_eq!(js["config"]["domain"], "Security");
        let bjp = &js["results"][0];
        assert_eq!(bjp["topDomains"], json!([{"name": "Economy", "count": 2}]));
        assert_eq!(bjp["trend"], json!([{"year": 2019, "value": 2.0}]));
        assert_eq!(
            bjp["domainProfile"],
            json!([{"name": "Economy", "value": 2.0}])
        );
        // Irrigation is not in the taxonomy.
        assert!(bjp["subcategoryProfile"]["error"]
            .as_str()
            .unwrap()
            .contains("Irrigation"));
        assert_eq!(
            bjp["domainBreakdown"]["error"],
            "unknown domain \"Security\""
        );
        assert_eq!(bjp["search"], JSValue::Null);
    }

    #[test]
    fn text_lines() {
        let lines = TextRenderer.render(&report());
        assert_eq!(lines[0], "Party BJP: 1 rows over 1 years (2004-2024)");
        assert!(lines.contains(&"  top domains: Economy (2)".to_string()));
        assert!(lines.contains(&"  trend of Agriculture: 2019: 2".to_string()));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("  breakdown of Security: error:")));
    }
}
