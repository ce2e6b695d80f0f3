use log::{debug, info};
use std::collections::BTreeSet;

pub use crate::config::*;
use crate::entities::{rank_entities, StopList};
use crate::filter::filter_parties;
use crate::search::search_rows;
use crate::taxonomy::{domain_breakdown, roll_up_to_domains};
use crate::tokens::{rank_tokens, rank_words};
use crate::trend::{keyword_trend, trend_series};

/// All the panels computed for one party.
///
/// The fallible panels carry their own result: one failing panel does not prevent
/// the others from being displayed.
#[derive(PartialEq, Debug, Clone)]
pub struct PartyReport {
    pub party: PartyId,
    pub row_count: usize,
    /// Number of distinct years in the filtered rows.
    pub year_count: usize,
    pub top_domains: Ranking,
    pub top_subcategories: Ranking,
    pub top_summary_topics: Ranking,
    pub top_entities: Ranking,
    pub word_cloud: Ranking,
    /// Domain totals from the score columns, limited to the top domains.
    pub domain_profile: AnalyticsResult<DomainProfile>,
    /// Domain totals from the subcategory field, limited to the top domains.
    pub subcategory_profile: AnalyticsResult<DomainProfile>,
    /// Only when a domain is selected.
    pub domain_breakdown: Option<AnalyticsResult<DomainProfile>>,
    /// Only when a category is selected.
    pub trend: Option<AnalyticsResult<TrendSeries>>,
    /// Only when there is a search term.
    pub search: Option<AnalyticsResult<SearchHits>>,
    pub keyword_trend: Option<AnalyticsResult<Vec<(u16, u64)>>>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct DashboardReport {
    /// The year range that was applied.
    pub year_range: YearRange,
    pub compare_mode: bool,
    pub selected_category: Option<String>,
    pub selected_domain: Option<String>,
    pub parties: Vec<PartyReport>,
}

/// Runs the whole pipeline: filter, then every aggregation, for each selected party.
///
/// Only an unknown party fails the whole run. All the other errors are reported
/// panel by panel.
pub fn run_dashboard(
    store: &CorpusStore,
    config: &DashboardConfig,
) -> AnalyticsResult<DashboardReport> {
    let year_range = config.effective_year_range();
    let parties = config.parties();
    info!(
        "run_dashboard: parties {:?}, years {:?}, category {:?}, domain {:?}, search {:?}",
        parties, year_range, config.selected_category, config.selected_domain, config.search_word
    );
    let filtered = filter_parties(store, year_range, Some(parties.as_slice()))?;
    let stop_list = StopList::default_list().with_words(&config.stop_words);

    let mut reports: Vec<PartyReport> = Vec::new();
    for (party, rows) in filtered.iter() {
        debug!("run_dashboard: {}: {} rows", party, rows.len());
        let years: BTreeSet<u16> = rows.iter().map(|r| r.year).collect();
        let trend = config.selected_category.as_ref().map(|category| {
            if store.has_category(category) {
                trend_series(rows, category)
            } else {
                Err(AnalyticsError::UnknownCategory(category.clone()))
            }
        });
        let search_word = config.search_word.as_ref().filter(|w| !w.trim().is_empty());
        reports.push(PartyReport {
            party: party.clone(),
            row_count: rows.len(),
            year_count: years.len(),
            top_domains: rank_tokens(rows, TokenField::Domains, config.top_n),
            top_subcategories: rank_tokens(rows, TokenField::TopicSubcategories, config.top_n),
            top_summary_topics: rank_tokens(rows, TokenField::SummaryTopics, config.top_n),
            top_entities: rank_entities(rows, &stop_list, config.top_n),
            word_cloud: rank_words(rows, &stop_list, config.top_n),
            domain_profile: roll_up_to_domains(rows, store.taxonomy(), ValueSource::ScoreColumns)
                .map(|p| p.top(config.top_n)),
            subcategory_profile: roll_up_to_domains(
                rows,
                store.taxonomy(),
                ValueSource::SubcategoryFrequency,
            )
            .map(|p| p.top(config.top_n)),
            domain_breakdown: config
                .selected_domain
                .as_ref()
                .map(|domain| domain_breakdown(rows, store.taxonomy(), domain)),
            trend,
            search: search_word.map(|w| search_rows(rows, w, config.search_mode)),
            keyword_trend: search_word.map(|w| keyword_trend(rows, w, config.search_mode)),
        });
    }

    Ok(DashboardReport {
        year_range,
        compare_mode: config.compare_mode,
        selected_category: config.selected_category.clone(),
        selected_domain: config.selected_domain.clone(),
        parties: reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CorpusBuilder;

    fn record(
        year: u16,
        domains: &str,
        subcategories: &str,
        ner: &str,
        text: &str,
        scores: &[(&str, f64)],
    ) -> ManifestoRecord {
        ManifestoRecord {
            year,
            domains: domains.to_string(),
            topic_subcategories: subcategories.to_string(),
            summary_topics: "manifesto".to_string(),
            ner: ner.to_string(),
            text: text.to_string(),
            scores: scores.iter().map(|(c, v)| (c.to_string(), *v)).collect(),
        }
    }

    fn store() -> CorpusStore {
        CorpusBuilder::new()
            .taxonomy(&[
                TaxonomyEntry::new("Agriculture", "Economy"),
                TaxonomyEntry::new("Caste", "Society"),
            ])
            .unwrap()
            .party(
                &PartyId::new("BJP"),
                vec![
                    record(
                        2004,
                        "Economy",
                        "Agriculture",
                        "[('Modi', 'PERSON'), ('BJP', 'ORG')]",
                        "Farmers and water",
                        &[("Agriculture", 3.0), ("Caste", 0.0)],
                    ),
                    record(
                        2009,
                        "Economy, Society",
                        "Agriculture, Caste",
                        "not a list",
                        "Water for every village",
                        &[("Agriculture", 5.0), ("Caste", 1.0)],
                    ),
                ],
            )
            .unwrap()
            .party(
                &PartyId::new("INC"),
                vec![record(
                    2014,
                    "Society",
                    "Caste, Unlisted",
                    "[('Gandhi', 'PERSON')]",
                    "Social justice",
                    &[("Agriculture", 0.0), ("Caste", 4.0)],
                )],
            )
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn single_party() {
        let s = store();
        let config = DashboardConfig::new(PartyId::new("BJP")).with_category("Agriculture");
        let report = run_dashboard(&s, &config).unwrap();
        assert_eq!(report.parties.len(), 1);
        let bjp = &report.parties[0];
        assert_eq!(bjp.row_count, 2);
        assert_eq!(bjp.year_count, 2);
        assert_eq!(
            bjp.top_domains,
            vec![("Economy".to_string(), 2), ("Society".to_string(), 1)]
        );
        // BJP is in the default stop list, the second row cannot be parsed.
        assert_eq!(bjp.top_entities, vec![("Modi".to_string(), 1)]);
        assert_eq!(bjp.word_cloud[0], ("water".to_string(), 2));
        assert_eq!(
            bjp.trend,
            Some(Ok(vec![(2004, 3.0), (2009, 5.0)]))
        );
        assert_eq!(
            bjp.domain_profile,
            Ok(DomainProfile {
                totals: vec![("Economy".to_string(), 8.0), ("Society".to_string(), 1.0)]
            })
        );
        assert_eq!(bjp.search, None);
        assert_eq!(bjp.domain_breakdown, None);
    }

    #[test]
    fn panels_fail_independently() {
        let s = store();
        let config = DashboardConfig::new(PartyId::new("INC"))
            .with_category("Cricket")
            .with_domain("Society")
            .with_search("justice", SearchMode::WholeWord);
        let report = run_dashboard(&s, &config).unwrap();
        let inc = &report.parties[0];
        assert_eq!(
            inc.trend,
            Some(Err(AnalyticsError::UnknownCategory("Cricket".to_string())))
        );
        assert_eq!(
            inc.subcategory_profile,
            Err(AnalyticsError::MissingTaxonomyEntry {
                subcategory: "Unlisted".to_string()
            })
        );
        assert_eq!(
            inc.domain_profile,
            Ok(DomainProfile {
                totals: vec![("Society".to_string(), 4.0)]
            })
        );
        assert_eq!(
            inc.search,
            Some(Ok(SearchHits {
                matching_rows: 1,
                occurrences: 1
            }))
        );
        assert_eq!(inc.keyword_trend, Some(Ok(vec![(2014, 1)])));
        assert_eq!(
            inc.domain_breakdown,
            Some(Ok(DomainProfile {
                totals: vec![("Caste".to_string(), 4.0)]
            }))
        );
        assert_eq!(inc.top_entities, vec![("Gandhi".to_string(), 1)]);
    }

    #[test]
    fn compare_mode_and_year_range() {
        let s = store();
        let config = DashboardConfig::new(PartyId::new("BJP"))
            .comparing(&[PartyId::new("INC"), PartyId::new("BJP"), PartyId::new("INC")])
            .with_year_range(YearRange::new(2009, 2014))
            .with_category("Caste");
        let report = run_dashboard(&s, &config).unwrap();
        assert!(report.compare_mode);
        let names: Vec<PartyId> = report.parties.iter().map(|p| p.party.clone()).collect();
        assert_eq!(names, vec![PartyId::new("INC"), PartyId::new("BJP")]);
        assert_eq!(report.parties[0].trend, Some(Ok(vec![(2014, 4.0)])));
        assert_eq!(report.parties[1].trend, Some(Ok(vec![(2009, 1.0)])));

        let all_years = DashboardConfig {
            show_all_years: true,
            ..config
        };
        let report = run_dashboard(&s, &all_years).unwrap();
        assert_eq!(report.year_range, YearRange::ALL);
        assert_eq!(
            report.parties[1].trend,
            Some(Ok(vec![(2004, 0.0), (2009, 1.0)]))
        );
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let s = store();
        let config = DashboardConfig::new(PartyId::new("BJP"))
            .with_year_range(YearRange::new(2024, 2004))
            .with_category("Caste");
        let report = run_dashboard(&s, &config).unwrap();
        let bjp = &report.parties[0];
        assert_eq!(bjp.row_count, 0);
        assert!(bjp.top_domains.is_empty());
        assert_eq!(bjp.trend, Some(Ok(vec![])));
        assert_eq!(bjp.domain_profile, Ok(DomainProfile::default()));
    }

    #[test]
    fn unknown_party() {
        let s = store();
        let config = DashboardConfig::new(PartyId::new("AAP"));
        assert_eq!(
            run_dashboard(&s, &config),
            Err(AnalyticsError::UnknownParty("AAP".to_string()))
        );
    }
}
