// Conversion of the raw tables into records, common to all the providers.

use std::collections::BTreeMap;
use std::path::Path;

use crate::mdash::*;
use snafu::prelude::*;

const YEAR: &str = "Year";
const DOMAINS: &str = "Domains";
const TOPIC_SUBCATEGORIES: &str = "Topic_Subcategories";
const SUMMARY_TOPICS: &str = "Summary_Topics";
const NER: &str = "NER";
const TEXT: &str = "Text";

/// A table as read from a file: the first row and all the other rows, as text.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawTable {
    pub path: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// The 1-based line number of a row in the file, counting the header.
    pub fn lineno(idx: usize) -> usize {
        idx + 2
    }

    fn column(&self, name: &str) -> MdashResult<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .context(MissingColumnSnafu {
                column: name,
                path: self.path.clone(),
            })
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The provider of a file given on the command line.
pub fn provider_from_path(path: &str) -> &'static str {
    let lower = path.to_lowercase();
    if lower.ends_with(".xlsx") {
        "xlsx"
    } else {
        "csv"
    }
}

// Left over by spreadsheet exports of indexed tables.
fn is_index_column(name: &str) -> bool {
    name.is_empty() || name.starts_with("Unnamed")
}

struct RecordLayout {
    year: usize,
    domains: usize,
    topic_subcategories: usize,
    summary_topics: usize,
    ner: usize,
    text: usize,
    scores: Vec<(usize, String)>,
}

impl RecordLayout {
    fn from_table(table: &RawTable) -> MdashResult<RecordLayout> {
        let fixed = [YEAR, DOMAINS, TOPIC_SUBCATEGORIES, SUMMARY_TOPICS, NER, TEXT];
        let scores: Vec<(usize, String)> = table
            .header
            .iter()
            .enumerate()
            .filter(|(_, h)| !is_index_column(h) && !fixed.contains(&h.as_str()))
            .map(|(idx, h)| (idx, h.clone()))
            .collect();
        debug!(
            "RecordLayout: {}: score columns: {:?}",
            table.path,
            scores.iter().map(|(_, h)| h).collect::<Vec<_>>()
        );
        Ok(RecordLayout {
            year: table.column(YEAR)?,
            domains: table.column(DOMAINS)?,
            topic_subcategories: table.column(TOPIC_SUBCATEGORIES)?,
            summary_topics: table.column(SUMMARY_TOPICS)?,
            ner: table.column(NER)?,
            text: table.column(TEXT)?,
            scores,
        })
    }
}

// Short lines are padded with empty cells.
fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}

/// Years may have been written as decimal numbers (`2004.0`).
pub fn parse_year(content: &str, path: &str, lineno: usize) -> MdashResult<u16> {
    let s = content.trim();
    if let Ok(y) = s.parse::<u16>() {
        return Ok(y);
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= u16::MAX as f64 => Ok(f as u16),
        _ => ParsingYearSnafu {
            path,
            lineno,
            content,
        }
        .fail(),
    }
}

/// An empty cell (or a `nan` written by pandas) is a zero score.
pub fn parse_score(content: &str, path: &str, lineno: usize, column: &str) -> MdashResult<f64> {
    let s = content.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_nan() => Ok(0.0),
        Ok(f) => Ok(f),
        Err(_) => ParsingScoreSnafu {
            path,
            lineno,
            column,
            content,
        }
        .fail(),
    }
}

pub fn table_to_records(table: &RawTable) -> MdashResult<Vec<ManifestoRecord>> {
    let layout = RecordLayout::from_table(table)?;
    let mut res: Vec<ManifestoRecord> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let lineno = RawTable::lineno(idx);
        if row.iter().all(|c| c.trim().is_empty()) {
            debug!("table_to_records: {}: skipping empty line {}", table.path, lineno);
            continue;
        }
        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        for (col, name) in layout.scores.iter() {
            let v = parse_score(cell(row, *col), &table.path, lineno, name)?;
            scores.insert(name.clone(), v);
        }
        res.push(ManifestoRecord {
            year: parse_year(cell(row, layout.year), &table.path, lineno)?,
            domains: cell(row, layout.domains).to_string(),
            topic_subcategories: cell(row, layout.topic_subcategories).to_string(),
            summary_topics: cell(row, layout.summary_topics).to_string(),
            ner: cell(row, layout.ner).to_string(),
            text: cell(row, layout.text).to_string(),
            scores,
        });
    }
    Ok(res)
}

/// Reads the (subcategory, domain) pairs of a taxonomy table. Rows without a
/// subcategory are ignored.
pub fn table_to_taxonomy(
    table: &RawTable,
    domain_column: &str,
    subcategory_column: &str,
) -> MdashResult<Vec<TaxonomyEntry>> {
    let domain_idx = table.column(domain_column)?;
    let sub_idx = table.column(subcategory_column)?;
    let mut res: Vec<TaxonomyEntry> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let subcategory = cell(row, sub_idx).trim();
        if subcategory.is_empty() {
            debug!(
                "table_to_taxonomy: {}: no subcategory on line {}",
                table.path,
                RawTable::lineno(idx)
            );
            continue;
        }
        res.push(TaxonomyEntry::new(subcategory, cell(row, domain_idx).trim()));
    }
    info!(
        "table_to_taxonomy: {} entries from {}",
        res.len(),
        simplify_file_name(&table.path)
    );
    Ok(res)
}
