// Primitives for reading Excel (.xlsx) files.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use snafu::prelude::*;

use crate::mdash::{io_common::RawTable, *};

pub fn read_excel_table(path: &str, worksheet: Option<&str>) -> MdashResult<RawTable> {
    let wrange = get_range(path, worksheet)?;

    let mut iter = wrange.rows();
    let header_cells = iter.next().context(EmptyTableSnafu { path })?;
    let header: Vec<String> = header_cells
        .iter()
        .map(|c| cell_to_string(c, 1).map(|s| s.trim().to_string()))
        .collect::<MdashResult<Vec<String>>>()?;
    debug!("read_excel_table: {}: header: {:?}", path, header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = RawTable::lineno(idx);
        let cells = row
            .iter()
            .map(|c| cell_to_string(c, lineno))
            .collect::<MdashResult<Vec<String>>>()?;
        rows.push(cells);
    }
    debug!("read_excel_table: {}: {} rows", path, rows.len());

    Ok(RawTable {
        path: path.to_string(),
        header,
        rows,
    })
}

/// Numbers are written the shortest way: 2004.0 becomes `2004`.
fn cell_to_string(cell: &DataType, lineno: usize) -> MdashResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Empty => Ok(String::new()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, worksheet: Option<&str>) -> MdashResult<calamine::Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        return Ok(wrange);
    }
    let all_worksheets = workbook.worksheets();
    match all_worksheets.as_slice() {
        [] => EmptyTableSnafu { path }.fail(),
        [(worksheet_name, wrange)] => {
            debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
            Ok(wrange.clone())
        }
        _ => AmbiguousWorksheetSnafu { path }.fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::Float(2004.0), 2).unwrap(), "2004");
        assert_eq!(cell_to_string(&DataType::Float(1.5), 2).unwrap(), "1.5");
        assert_eq!(cell_to_string(&DataType::Int(3), 2).unwrap(), "3");
        assert_eq!(cell_to_string(&DataType::Empty, 2).unwrap(), "");
        assert!(matches!(
            cell_to_string(&DataType::DateTime(44000.0), 7),
            Err(MdashError::ExcelWrongCellType { lineno: 7, .. })
        ));
    }
}
