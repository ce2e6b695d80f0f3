use log::debug;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

pub use crate::config::*;
use crate::tokens::count_tokens;

/// Aggregates subcategory values into the domains that own them.
///
/// Arguments:
/// * `rows` the filtered records
/// * `taxonomy` the subcategory -> domain mapping
/// * `source` sums the score columns, or counts the tokens of the free-text
/// subcategory field
///
/// Every subcategory considered must have an owning domain, otherwise the roll-up
/// fails with [AnalyticsError::MissingTaxonomyEntry]. With score columns, this covers
/// all the columns present in the rows, including the ones that sum to zero.
/// Domains with a zero total are not part of the result.
pub fn roll_up_to_domains(
    rows: &[&ManifestoRecord],
    taxonomy: &Taxonomy,
    source: ValueSource,
) -> AnalyticsResult<DomainProfile> {
    let values: Vec<(String, f64)> = match source {
        ValueSource::ScoreColumns => sum_score_columns(rows),
        ValueSource::SubcategoryFrequency => count_tokens(rows, TokenField::TopicSubcategories)
            .into_iter()
            .map(|(sub, count)| (sub, count as f64))
            .collect(),
    };
    debug!(
        "roll_up_to_domains: {:?}: {} subcategories over {} rows",
        source,
        values.len(),
        rows.len()
    );
    roll_up_values(&values, taxonomy)
}

/// The sum of every score column over the rows, by category name.
pub fn sum_score_columns(rows: &[&ManifestoRecord]) -> Vec<(String, f64)> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows.iter() {
        for (category, value) in row.scores.iter() {
            *sums.entry(category.as_str()).or_insert(0.0) += *value;
        }
    }
    sums.into_iter().map(|(c, v)| (c.to_string(), v)).collect()
}

/// Accumulates (subcategory, value) pairs into their domains.
///
/// Domains are ordered by decreasing total. Ties keep the order in which the domains
/// first received a contribution.
pub fn roll_up_values(
    values: &[(String, f64)],
    taxonomy: &Taxonomy,
) -> AnalyticsResult<DomainProfile> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();
    for (subcategory, value) in values.iter() {
        let domain = taxonomy.domain_of(subcategory).ok_or_else(|| {
            AnalyticsError::MissingTaxonomyEntry {
                subcategory: subcategory.clone(),
            }
        })?;
        if *value == 0.0 {
            continue;
        }
        match index.get(domain) {
            Some(&idx) => {
                totals[idx].1 += *value;
            }
            None => {
                index.insert(domain, totals.len());
                totals.push((domain.to_string(), *value));
            }
        }
    }
    // Contributions of opposite signs may cancel out.
    totals.retain(|(_, total)| *total != 0.0);
    sort_by_total(&mut totals);
    Ok(DomainProfile { totals })
}

/// The score totals of the subcategories of a single domain.
///
/// The keys of the result are subcategories. Subcategories with a zero total are
/// omitted; ties are in lexicographic order.
pub fn domain_breakdown(
    rows: &[&ManifestoRecord],
    taxonomy: &Taxonomy,
    domain: &str,
) -> AnalyticsResult<DomainProfile> {
    if !taxonomy.contains_domain(domain) {
        return Err(AnalyticsError::UnknownDomain(domain.to_string()));
    }
    let sums: HashMap<String, f64> = sum_score_columns(rows).into_iter().collect();
    let mut totals: Vec<(String, f64)> = taxonomy
        .subcategories_of(domain)
        .into_iter()
        .filter_map(|sub| match sums.get(sub) {
            Some(v) if *v != 0.0 => Some((sub.to_string(), *v)),
            _ => None,
        })
        .collect();
    sort_by_total(&mut totals);
    Ok(DomainProfile { totals })
}

fn sort_by_total(totals: &mut [(String, f64)]) {
    // Stable sort, the values are never NaN in practice.
    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(subcategories: &str, scores: &[(&str, f64)]) -> ManifestoRecord {
        ManifestoRecord {
            year: 2019,
            domains: String::new(),
            topic_subcategories: subcategories.to_string(),
            summary_topics: String::new(),
            ner: "[]".to_string(),
            text: String::new(),
            scores: scores.iter().map(|(c, v)| (c.to_string(), *v)).collect(),
        }
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::from_entries(&[
            TaxonomyEntry::new("Agriculture", "Economy"),
            TaxonomyEntry::new("Industry", "Economy"),
            TaxonomyEntry::new("Caste", "Society"),
            TaxonomyEntry::new("Women", "Society"),
            TaxonomyEntry::new("Defence", "Security"),
        ])
        .unwrap()
    }

    fn rows() -> Vec<ManifestoRecord> {
        vec![
            record(
                "Agriculture, Caste",
                &[
                    ("Agriculture", 3.0),
                    ("Industry", 1.0),
                    ("Caste", 2.0),
                    ("Women", 0.0),
                    ("Defence", 0.0),
                ],
            ),
            record(
                "Agriculture, Women, Women",
                &[
                    ("Agriculture", 5.0),
                    ("Industry", 0.0),
                    ("Caste", 1.0),
                    ("Women", 4.0),
                    ("Defence", 0.0),
                ],
            ),
        ]
    }

    #[test]
    fn score_columns() {
        let recs = rows();
        let refs: Vec<&ManifestoRecord> = recs.iter().collect();
        let profile = roll_up_to_domains(&refs, &taxonomy(), ValueSource::ScoreColumns).unwrap();
        assert_eq!(
            profile.totals,
            vec![("Economy".to_string(), 9.0), ("Society".to_string(), 7.0)]
        );
        // Defence only had zeros.
        assert_eq!(profile.get("Security"), None);
    }

    #[test]
    fn conservation() {
        let recs = rows();
        let refs: Vec<&ManifestoRecord> = recs.iter().collect();
        let profile = roll_up_to_domains(&refs, &taxonomy(), ValueSource::ScoreColumns).unwrap();
        let contributed: f64 = sum_score_columns(&refs).iter().map(|(_, v)| *v).sum();
        assert_eq!(profile.total(), contributed);
    }

    #[test]
    fn subcategory_frequency() {
        let recs = rows();
        let refs: Vec<&ManifestoRecord> = recs.iter().collect();
        let profile =
            roll_up_to_domains(&refs, &taxonomy(), ValueSource::SubcategoryFrequency).unwrap();
        // Agriculture 2 -> Economy, Caste 1 + Women 2 -> Society
        assert_eq!(
            profile.totals,
            vec![("Society".to_string(), 3.0), ("Economy".to_string(), 2.0)]
        );
        assert_eq!(profile.top(1).totals, vec![("Society".to_string(), 3.0)]);
    }

    #[test]
    fn missing_entry_is_an_integrity_error() {
        let recs = vec![record("", &[("Agriculture", 1.0), ("Sanitation", 0.0)])];
        let refs: Vec<&ManifestoRecord> = recs.iter().collect();
        let res = roll_up_to_domains(&refs, &taxonomy(), ValueSource::ScoreColumns);
        assert_eq!(
            res,
            Err(AnalyticsError::MissingTaxonomyEntry {
                subcategory: "Sanitation".to_string()
            })
        );

        let recs = vec![record("Agriculture, Sanitation", &[])];
        let refs: Vec<&ManifestoRecord> = recs.iter().collect();
        let res = roll_up_to_domains(&refs, &taxonomy(), ValueSource::SubcategoryFrequency);
        assert_eq!(
            res,
            Err(AnalyticsError::MissingTaxonomyEntry {
                subcategory: "Sanitation".to_string()
            })
        );
    }

    #[test]
    fn ties_keep_first_contribution() {
        let values = vec![
            ("Caste".to_string(), 2.0),
            ("Agriculture".to_string(), 2.0),
        ];
        let profile = roll_up_values(&values, &taxonomy()).unwrap();
        assert_eq!(
            profile.totals,
            vec![("Society".to_string(), 2.0), ("Economy".to_string(), 2.0)]
        );
    }

    #[test]
    fn no_rows() {
        let profile = roll_up_to_domains(&[], &taxonomy(), ValueSource::ScoreColumns).unwrap();
        assert!(profile.is_empty());
    }

    #[test]
    fn breakdown_of_one_domain() {
        let recs = rows();
        let refs: Vec<&ManifestoRecord> = recs.iter().collect();
        let profile = domain_breakdown(&refs, &taxonomy(), "Society").unwrap();
        assert_eq!(
            profile.totals,
            vec![("Women".to_string(), 4.0), ("Caste".to_string(), 3.0)]
        );
        let profile = domain_breakdown(&refs, &taxonomy(), "Economy").unwrap();
        assert_eq!(
            profile.totals,
            vec![("Agriculture".to_string(), 8.0), ("Industry".to_string(), 1.0)]
        );
        assert!(domain_breakdown(&refs, &taxonomy(), "Security")
            .unwrap()
            .is_empty());
        assert_eq!(
            domain_breakdown(&refs, &taxonomy(), "Sports"),
            Err(AnalyticsError::UnknownDomain("Sports".to_string()))
        );
    }
}
