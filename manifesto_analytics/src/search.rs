use log::debug;
use regex::Regex;

pub use crate::config::*;

/// A case-insensitive literal search term.
///
/// The term is matched literally: characters with a meaning in regular
/// expressions are escaped.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    regex: Regex,
}

impl SearchMatcher {
    /// Surrounding whitespace of the term is ignored. An empty term is an error.
    pub fn new(word: &str, mode: SearchMode) -> AnalyticsResult<SearchMatcher> {
        let term = word.trim();
        if term.is_empty() {
            return Err(AnalyticsError::EmptySearchTerm);
        }
        let escaped = regex::escape(term);
        let pattern = match mode {
            SearchMode::Substring => format!("(?i){}", escaped),
            SearchMode::WholeWord => format!(r"(?i)\b{}\b", escaped),
        };
        debug!("SearchMatcher: pattern {:?}", pattern);
        let regex =
            Regex::new(&pattern).map_err(|e| AnalyticsError::InvalidSearchTerm(e.to_string()))?;
        Ok(SearchMatcher { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Number of non-overlapping matches.
    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}

/// Searches the raw text of the rows.
pub fn search_rows(
    rows: &[&ManifestoRecord],
    word: &str,
    mode: SearchMode,
) -> AnalyticsResult<SearchHits> {
    let matcher = SearchMatcher::new(word, mode)?;
    let mut hits = SearchHits::default();
    for row in rows.iter() {
        let n = matcher.count(&row.text);
        if n > 0 {
            hits.matching_rows += 1;
            hits.occurrences += n;
        }
    }
    debug!("search_rows: {:?}: {:?}", word, hits);
    Ok(hits)
}
