//! Read roster rows from a spreadsheet
//!
//! The first row of the sheet is the header; columns are located by header
//! text so their order in the export does not matter.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};

use super::row::{RosterRow, columns};

/// Convert a cell to trimmed text; blank and error cells are `None`
fn cell_to_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Unit numbers come through as floats
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    };

    if text.is_empty() { None } else { Some(text) }
}

/// Map header text to column index
fn parse_header(header: &[Data]) -> HashMap<String, usize> {
    header
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| cell_to_string(cell).map(|name| (name.to_lowercase(), idx)))
        .collect()
}

fn get_cell(row: &[Data], col: Option<usize>) -> Option<String> {
    col.and_then(|c| row.get(c)).and_then(cell_to_string)
}

/// Read every non-blank data row of `sheet_name`
pub fn read_roster<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Vec<RosterRow>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    if !sheet_names.iter().any(|s| s == sheet_name) {
        bail!(
            "Sheet '{}' not found in {} (available: {})",
            sheet_name,
            path.display(),
            sheet_names.join(", ")
        );
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    // Worksheet row number of the header, 1-based
    let first_row = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let col_indices = parse_header(header);
    let col = |name: &str| col_indices.get(&name.to_lowercase()).copied();

    for &required in columns::REQUIRED {
        if col(required).is_none() {
            bail!("Sheet '{}' has no '{}' column", sheet_name, required);
        }
    }

    let email_col = col(columns::EMAIL);
    let unit_type_col = col(columns::UNIT_TYPE);
    let unit_number_col = col(columns::UNIT_NUMBER);
    let first_name_col = col(columns::FIRST_NAME);
    let last_name_col = col(columns::LAST_NAME);
    let rank_col = col(columns::RANK);

    let mut roster = Vec::new();

    for (idx, row) in rows.enumerate() {
        // Skip blank rows
        if row.iter().all(|c| cell_to_string(c).is_none()) {
            continue;
        }

        roster.push(RosterRow {
            row: first_row + idx + 1,
            email: get_cell(row, email_col),
            unit_type: get_cell(row, unit_type_col),
            unit_number: get_cell(row, unit_number_col),
            first_name: get_cell(row, first_name_col).unwrap_or_default(),
            last_name: get_cell(row, last_name_col).unwrap_or_default(),
            rank: get_cell(row, rank_col),
        });
    }

    log::info!("Read {} rows from sheet '{}'", roster.len(), sheet_name);

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    const HEADERS: &[&str] = &[
        "First Name",
        "Last Name",
        "Registrant Home E-Mail",
        "Unit Type",
        "Unit No",
        "Unit Rank",
    ];

    fn write_roster(dir: &TempDir, sheet: &str, headers: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join("roster.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();

        for (col, name) in headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name).unwrap();
        }

        worksheet.write_string(1, 0, "Ann").unwrap();
        worksheet.write_string(1, 1, "Bee").unwrap();
        worksheet.write_string(1, 2, " Ann@Example.com ").unwrap();
        worksheet.write_string(1, 3, "Troop").unwrap();
        worksheet.write_number(1, 4, 42).unwrap();
        worksheet.write_string(1, 5, "Scoutmaster").unwrap();

        // Row 3 left blank on purpose

        worksheet.write_string(3, 0, "Cal").unwrap();
        worksheet.write_string(3, 1, "Dee").unwrap();
        worksheet.write_string(3, 3, "Pack").unwrap();
        worksheet.write_string(3, 4, "7").unwrap();

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(42.0)), Some("42".to_string()));
        assert_eq!(cell_to_string(&Data::Float(4.5)), Some("4.5".to_string()));
        assert_eq!(cell_to_string(&Data::Int(7)), Some("7".to_string()));
        assert_eq!(cell_to_string(&Data::String("  ".to_string())), None);
        assert_eq!(cell_to_string(&Data::Empty), None);
    }

    #[test]
    fn test_read_roster_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_roster(&dir, "IP Adults", HEADERS);

        let rows = read_roster(&path, "IP Adults").unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(
            rows[0],
            RosterRow {
                row: 2,
                email: Some("Ann@Example.com".to_string()),
                unit_type: Some("Troop".to_string()),
                unit_number: Some("42".to_string()),
                first_name: "Ann".to_string(),
                last_name: "Bee".to_string(),
                rank: Some("Scoutmaster".to_string()),
            }
        );

        assert_eq!(rows[1].row, 4);
        assert_eq!(rows[1].email, None);
        assert_eq!(rows[1].rank, None);
        assert_eq!(rows[1].unit_number.as_deref(), Some("7"));
    }

    #[test]
    fn test_missing_sheet_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_roster(&dir, "Youth", HEADERS);

        let err = read_roster(&path, "IP Adults").unwrap_err();
        assert!(err.to_string().contains("Youth"));
    }

    #[test]
    fn test_missing_required_column_is_error() {
        let dir = TempDir::new().unwrap();
        let headers = &["First Name", "Last Name", "Email", "Unit Type", "Unit No", "Unit Rank"];
        let path = write_roster(&dir, "IP Adults", headers);

        let err = read_roster(&path, "IP Adults").unwrap_err();
        assert!(err.to_string().contains("Registrant Home E-Mail"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(read_roster(dir.path().join("nope.xlsx"), "IP Adults").is_err());
    }
}
