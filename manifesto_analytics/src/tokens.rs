use log::debug;
use std::collections::HashMap;

pub use crate::config::*;
use crate::entities::StopList;

/// Words shorter than this are not part of the word cloud.
const MIN_WORD_LEN: usize = 3;

/// An occurrence counter that remembers the order in which the keys were first seen.
///
/// This order is the tie-break of all the rankings: among equal counts, the key seen
/// first comes first.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    index: HashMap<String, usize>,
    counts: Vec<(String, u64)>,
}

impl Tally {
    pub(crate) fn add(&mut self, key: &str) {
        self.add_count(key, 1);
    }

    pub(crate) fn add_count(&mut self, key: &str, count: u64) {
        match self.index.get(key) {
            Some(&idx) => {
                self.counts[idx].1 += count;
            }
            None => {
                self.index.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), count));
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.counts.len()
    }

    /// All the counts, in first-seen order.
    pub(crate) fn into_counts(self) -> Vec<(String, u64)> {
        self.counts
    }

    /// The `top_n` keys by decreasing count.
    pub(crate) fn into_ranking(self, top_n: usize) -> Ranking {
        let mut res = self.counts;
        // Stable: ties keep the first-seen order.
        res.sort_by(|a, b| b.1.cmp(&a.1));
        res.truncate(top_n);
        res
    }
}

/// Splits a comma-joined field into its tokens.
///
/// Whitespace around the tokens is removed, and empty tokens (from consecutive or
/// trailing commas) are dropped.
pub fn split_tokens(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// The occurrences of every token of a field, in first-seen order.
///
/// A token repeated within the field of a single row is counted every time.
pub fn count_tokens(rows: &[&ManifestoRecord], field: TokenField) -> Vec<(String, u64)> {
    tally_tokens(rows, field).into_counts()
}

/// The `top_n` most frequent tokens of a comma-joined field, by decreasing count.
///
/// Ties are broken by first-seen order (rows in order, tokens left to right).
pub fn rank_tokens(rows: &[&ManifestoRecord], field: TokenField, top_n: usize) -> Ranking {
    let tally = tally_tokens(rows, field);
    debug!(
        "rank_tokens: {:?}: {} distinct tokens over {} rows",
        field,
        tally.len(),
        rows.len()
    );
    tally.into_ranking(top_n)
}

fn tally_tokens(rows: &[&ManifestoRecord], field: TokenField) -> Tally {
    let mut tally = Tally::default();
    for row in rows.iter() {
        for token in split_tokens(row.field(field)) {
            tally.add(token);
        }
    }
    tally
}

/// The `top_n` most frequent words of the raw text, for a word cloud.
///
/// Words are runs of alphabetic characters, lower-cased. Stop words (compared without
/// case) and words shorter than three characters are dropped.
pub fn rank_words(rows: &[&ManifestoRecord], stop_list: &StopList, top_n: usize) -> Ranking {
    let mut tally = Tally::default();
    for row in rows.iter() {
        for word in row.text.split(|c: char| !c.is_alphabetic()) {
            if word.chars().count() < MIN_WORD_LEN {
                continue;
            }
            let w = word.to_lowercase();
            if stop_list.contains_ignore_case(&w) {
                continue;
            }
            tally.add(&w);
        }
    }
    debug!("rank_words: {} distinct words", tally.len());
    tally.into_ranking(top_n)
}
