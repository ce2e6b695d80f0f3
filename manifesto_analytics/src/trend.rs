use log::debug;
use std::collections::BTreeMap;

pub use crate::config::*;
use crate::search::SearchMatcher;

/// The total of one category per year, by increasing year.
///
/// Years without rows are absent from the series (there is no zero-filling).
/// A row lacking the category column means the category is unknown, and a row with a
/// year outside of [MANIFESTO_YEARS] is a data-integrity error.
pub fn trend_series(rows: &[&ManifestoRecord], category: &str) -> AnalyticsResult<TrendSeries> {
    let mut by_year: BTreeMap<u16, f64> = BTreeMap::new();
    for row in rows.iter() {
        check_year(row.year)?;
        let value = row
            .score(category)
            .ok_or_else(|| AnalyticsError::UnknownCategory(category.to_string()))?;
        *by_year.entry(row.year).or_insert(0.0) += value;
    }
    debug!(
        "trend_series: {:?}: {} years over {} rows",
        category,
        by_year.len(),
        rows.len()
    );
    Ok(by_year.into_iter().collect())
}

/// One series per party, each computed independently over its own rows.
/// The series do not necessarily cover the same years.
pub fn compare_trends(
    parties: &[(PartyId, Vec<&ManifestoRecord>)],
    category: &str,
) -> Vec<(PartyId, AnalyticsResult<TrendSeries>)> {
    parties
        .iter()
        .map(|(party, rows)| (party.clone(), trend_series(rows, category)))
        .collect()
}

/// Number of rows per year whose raw text contains the search term.
/// Years with no matching row are absent.
pub fn keyword_trend(
    rows: &[&ManifestoRecord],
    word: &str,
    mode: SearchMode,
) -> AnalyticsResult<Vec<(u16, u64)>> {
    let matcher = SearchMatcher::new(word, mode)?;
    let mut by_year: BTreeMap<u16, u64> = BTreeMap::new();
    for row in rows.iter() {
        check_year(row.year)?;
        if matcher.is_match(&row.text) {
            *by_year.entry(row.year).or_insert(0) += 1;
        }
    }
    Ok(by_year.into_iter().collect())
}

fn check_year(year: u16) -> AnalyticsResult<()> {
    if MANIFESTO_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(AnalyticsError::YearOutOfDomain { year })
    }
}
