//! XLSX number-format reader built on a local-header ZIP scanner

use log::debug;
use rayon::prelude::*;
use std::collections::HashSet;

pub mod archive;
pub mod cell_ref;
pub mod extract;
pub mod styles;
pub mod workbook;
pub mod xml_table;

pub use archive::{ArchiveEntry, ArchiveReader};
pub use cell_ref::CellRef;
pub use extract::{ColumnFormats, FormatRow, extract_column_formats};
pub use styles::StyleTable;
pub use workbook::{SheetInfo, list_sheets};

use crate::config::ExtractConfig;
use crate::error::ExtractResult;

/// Number formats of the requested column on one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetFormats {
    pub sheet: String,
    /// Archive part the sheet was read from
    pub part: String,
    pub formats: ColumnFormats,
}

/// Read the configured column of every configured sheet from package bytes.
///
/// Results follow the order of `config.sheets` (workbook order when it is
/// empty). Requested names that the workbook does not contain are skipped.
pub fn read_column_formats(bytes: &[u8], config: &ExtractConfig) -> ExtractResult<Vec<SheetFormats>> {
    config.validate()?;

    let archive = ArchiveReader::new(bytes);
    let sheets = list_sheets(&archive)?;
    let selected = select_sheets(&sheets, &config.sheets);
    if selected.is_empty() {
        debug!("no requested sheet found in workbook");
        return Ok(Vec::new());
    }

    let styles = StyleTable::from_archive(&archive)?;
    debug!("resolved {} cell styles", styles.len());

    selected
        .par_iter()
        .map(|sheet| -> ExtractResult<SheetFormats> {
            let sheet_xml = archive.read(&sheet.part)?;
            let formats = extract_column_formats(&sheet.part, &sheet_xml, config.column, &styles)?;
            debug!(
                "sheet '{}': {} formatted rows in column {}",
                sheet.name,
                formats.rows.len(),
                config.column
            );
            Ok(SheetFormats {
                sheet: sheet.name.clone(),
                part: sheet.part.clone(),
                formats,
            })
        })
        .collect()
}

/// Pick sheets by name in request order, dropping duplicates and unknown names
fn select_sheets<'s>(sheets: &'s [SheetInfo], requested: &[String]) -> Vec<&'s SheetInfo> {
    if requested.is_empty() {
        return sheets.iter().collect();
    }

    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    for name in requested {
        if !seen.insert(name.as_str()) {
            continue;
        }
        match sheets.iter().find(|s| &s.name == name) {
            Some(sheet) => selected.push(sheet),
            None => debug!("sheet '{}' not found, skipping", name),
        }
    }
    selected
}
