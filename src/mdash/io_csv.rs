// Primitives for reading CSV files.

use snafu::prelude::*;

use crate::mdash::{io_common::RawTable, *};

pub fn read_csv_table(path: &str) -> MdashResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        // Trailing empty cells are sometimes dropped by the exports.
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1_usize })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    debug!("read_csv_table: {}: header: {:?}", path, header);
    ensure!(!header.is_empty(), EmptyTableSnafu { path });

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let lineno = RawTable::lineno(idx);
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    debug!("read_csv_table: {}: {} rows", path, rows.len());

    Ok(RawTable {
        path: path.to_string(),
        header,
        rows,
    })
}
