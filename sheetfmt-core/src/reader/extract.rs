//! Per-column number-format extraction from a worksheet part

use log::trace;

use super::cell_ref::{self, CellRef};
use super::styles::StyleTable;
use super::xml_table::{self, XmlElement};
use crate::error::{ExtractError, ExtractResult};

/// Format code of one styled cell, keyed by its row offset from the
/// used-range origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRow {
    pub row_index: i64,
    pub format_code: String,
}

/// Number formats of one column of one worksheet, sorted by `row_index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFormats {
    /// Requested column (1-based, absolute)
    pub column: u32,
    /// Top-left corner of the sheet's declared used range
    pub origin: CellRef,
    pub rows: Vec<FormatRow>,
}

impl ColumnFormats {
    fn empty(column: u32, origin: CellRef) -> Self {
        Self {
            column,
            origin,
            rows: Vec::new(),
        }
    }

    /// Column position relative to the used-range origin, 1-based
    pub fn label_index(&self) -> i64 {
        i64::from(self.column) - i64::from(self.origin.col) + 1
    }

    /// Output column name, e.g. "Column1.NumberFormat"
    pub fn column_name(&self) -> String {
        format!("Column{}.NumberFormat", self.label_index())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Extract the format code of every styled cell in `column`.
///
/// Cells without a style index, or whose style index has no number format,
/// are left out. Row indices are offsets from the `dimension` origin, or
/// from A1 when the sheet declares no dimension.
pub fn extract_column_formats(
    part: &str,
    sheet_xml: &[u8],
    column: u32,
    styles: &StyleTable,
) -> ExtractResult<ColumnFormats> {
    let root = xml_table::parse_xml(part, sheet_xml)?;
    extract_from_table(part, &root, column, styles)
}

/// Same as [`extract_column_formats`] on an already parsed `worksheet`
pub fn extract_from_table(
    part: &str,
    root: &XmlElement,
    column: u32,
    styles: &StyleTable,
) -> ExtractResult<ColumnFormats> {
    let origin = used_range_origin(root)?;

    let Some(sheet_data) = root.find("sheetData") else {
        return Ok(ColumnFormats::empty(column, origin));
    };

    let mut rows = Vec::new();
    let mut previous_row = 0u32;

    for row in sheet_data.children_named("row") {
        let row_number = match row.attr("r") {
            Some(r) => r.trim().parse::<u32>().map_err(|_| ExtractError::MalformedSheetPart {
                part: part.to_string(),
                message: format!("row number '{}' is not an unsigned integer", r),
            })?,
            None => previous_row.saturating_add(1),
        };
        previous_row = row_number;

        let mut previous_col = 0u32;
        for cell in row.children_named("c") {
            // Cells may omit `r`; they then follow the previous cell of the row
            let cell_ref = match cell.attr("r") {
                Some(r) => CellRef::parse(r)?,
                None => CellRef::new(row_number, previous_col.saturating_add(1)),
            };
            previous_col = cell_ref.col;

            if cell_ref.col != column {
                continue;
            }
            let Some(style) = cell.attr("s") else {
                continue;
            };
            let style_index = style.trim().parse::<usize>().map_err(|_| {
                ExtractError::MalformedSheetPart {
                    part: part.to_string(),
                    message: format!("style index '{}' of {} is not an unsigned integer", style, cell_ref),
                }
            })?;

            match styles.format_code(style_index) {
                Some(code) => rows.push(FormatRow {
                    row_index: i64::from(cell_ref.row) - i64::from(origin.row),
                    format_code: code.to_string(),
                }),
                None => trace!("{}: style {} of {} has no number format", part, style_index, cell_ref),
            }
        }
    }

    // Stable, so cells sharing a row keep document order
    rows.sort_by_key(|row| row.row_index);

    Ok(ColumnFormats {
        column,
        origin,
        rows,
    })
}

fn used_range_origin(root: &XmlElement) -> ExtractResult<CellRef> {
    match root.find("dimension").and_then(|d| d.attr("ref")) {
        Some(range) => Ok(cell_ref::parse_range(range)?.0),
        None => Ok(CellRef::new(1, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PART: &str = "xl/worksheets/sheet1.xml";

    fn general_styles() -> StyleTable {
        StyleTable::from_styles_xml(
            br#"<styleSheet>
<numFmts><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/></numFmts>
<cellXfs><xf numFmtId="0"/><xf numFmtId="164"/><xf numFmtId="10"/></cellXfs>
</styleSheet>"#,
        )
        .unwrap()
    }

    fn sheet(dimension: &str, rows: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{dimension}<sheetData>{rows}</sheetData></worksheet>"#
        )
    }

    fn rows_of(formats: &ColumnFormats) -> Vec<(i64, &str)> {
        formats
            .rows
            .iter()
            .map(|r| (r.row_index, r.format_code.as_str()))
            .collect()
    }

    #[test]
    fn test_unstyled_rows_are_absent() {
        let xml = sheet(
            r#"<dimension ref="A1:B3"/>"#,
            r#"<row r="1"><c r="A1" s="0"><v>1</v></c><c r="B1" s="1"/></row>
<row r="2"><c r="A2"><v>2</v></c><c r="B2" s="0"/></row>
<row r="3"><c r="A3" s="0"><v>3</v></c></row>"#,
        );
        let formats = extract_column_formats(PART, xml.as_bytes(), 1, &general_styles()).unwrap();

        assert_eq!(rows_of(&formats), vec![(0, "General"), (2, "General")]);
        assert_eq!(formats.column_name(), "Column1.NumberFormat");
    }

    #[test]
    fn test_rows_are_sorted() {
        let xml = sheet(
            r#"<dimension ref="A1:A4"/>"#,
            r#"<row r="4"><c r="A4" s="1"/></row>
<row r="1"><c r="A1" s="2"/></row>
<row r="3"><c r="A3" s="0"/></row>"#,
        );
        let formats = extract_column_formats(PART, xml.as_bytes(), 1, &general_styles()).unwrap();
        assert_eq!(
            rows_of(&formats),
            vec![(0, "0.00%"), (2, "General"), (3, "yyyy-mm-dd")]
        );
    }

    #[test]
    fn test_offsets_from_used_range_origin() {
        let xml = sheet(
            r#"<dimension ref="B3:D9"/>"#,
            r#"<row r="3"><c r="B3" s="0"/><c r="C3" s="1"/></row>
<row r="7"><c r="C7" s="2"/></row>"#,
        );
        let formats = extract_column_formats(PART, xml.as_bytes(), 3, &general_styles()).unwrap();

        assert_eq!(formats.origin, CellRef::new(3, 2));
        assert_eq!(formats.label_index(), 2);
        assert_eq!(formats.column_name(), "Column2.NumberFormat");
        assert_eq!(rows_of(&formats), vec![(0, "yyyy-mm-dd"), (4, "0.00%")]);
    }

    #[test]
    fn test_missing_dimension_defaults_to_a1() {
        let xml = sheet("", r#"<row r="5"><c r="B5" s="1"/></row>"#);
        let formats = extract_column_formats(PART, xml.as_bytes(), 2, &general_styles()).unwrap();
        assert_eq!(formats.origin, CellRef::new(1, 1));
        assert_eq!(rows_of(&formats), vec![(4, "yyyy-mm-dd")]);
    }

    #[test]
    fn test_empty_sheet_data() {
        let xml = sheet(r#"<dimension ref="A1"/>"#, "");
        let formats = extract_column_formats(PART, xml.as_bytes(), 1, &general_styles()).unwrap();
        assert!(formats.is_empty());
        assert_eq!(formats.column, 1);

        let no_sheet_data = br#"<worksheet><dimension ref="A1"/></worksheet>"#;
        let formats = extract_column_formats(PART, no_sheet_data, 1, &general_styles()).unwrap();
        assert!(formats.rows.is_empty());
    }

    #[test]
    fn test_column_without_styled_cells() {
        let xml = sheet(
            r#"<dimension ref="A1:C2"/>"#,
            r#"<row r="1"><c r="A1" s="0"/><c r="C1"/></row><row r="2"><c r="A2" s="1"/></row>"#,
        );
        let formats = extract_column_formats(PART, xml.as_bytes(), 3, &general_styles()).unwrap();
        assert!(formats.is_empty());
    }

    #[test]
    fn test_cells_without_reference_follow_previous_cell() {
        let xml = sheet(
            r#"<dimension ref="A1:C2"/>"#,
            r#"<row r="1"><c s="0"/><c s="1"/><c s="2"/></row>
<row><c r="A2"/><c s="2"/></row>"#,
        );
        let formats = extract_column_formats(PART, xml.as_bytes(), 2, &general_styles()).unwrap();
        assert_eq!(rows_of(&formats), vec![(0, "yyyy-mm-dd"), (1, "0.00%")]);
    }

    #[test]
    fn test_unknown_style_index_is_dropped() {
        let xml = sheet("", r#"<row r="1"><c r="A1" s="42"/></row><row r="2"><c r="A2" s="0"/></row>"#);
        let formats = extract_column_formats(PART, xml.as_bytes(), 1, &general_styles()).unwrap();
        assert_eq!(rows_of(&formats), vec![(1, "General")]);
    }

    #[test]
    fn test_malformed_input() {
        let styles = general_styles();

        let bad_ref = sheet("", r#"<row r="1"><c r="A$1" s="0"/></row>"#);
        assert!(matches!(
            extract_column_formats(PART, bad_ref.as_bytes(), 1, &styles),
            Err(ExtractError::MalformedReference(_))
        ));

        let bad_dimension = sheet(r#"<dimension ref="1A:B2"/>"#, "");
        assert!(matches!(
            extract_column_formats(PART, bad_dimension.as_bytes(), 1, &styles),
            Err(ExtractError::MalformedReference(_))
        ));

        let bad_style = sheet("", r#"<row r="1"><c r="A1" s="x"/></row>"#);
        assert!(matches!(
            extract_column_formats(PART, bad_style.as_bytes(), 1, &styles),
            Err(ExtractError::MalformedSheetPart { .. })
        ));
    }

    #[test]
    fn test_truncated_sheet_data_is_an_error() {
        let truncated = br#"<worksheet><dimension ref="A1:A5"/><sheetData><row r="1"><c r="A1" s="0"/></row><row r="2"><c r="A2" s="0"/>"#;
        match extract_column_formats(PART, truncated, 1, &general_styles()) {
            Err(ExtractError::Xml { part, .. }) => assert_eq!(part, PART),
            other => panic!("expected Xml error, got {:?}", other),
        }
    }

    #[test]
    fn test_column_left_of_used_range() {
        let xml = sheet(
            r#"<dimension ref="C1:D2"/>"#,
            r#"<row r="1"><c r="A1" s="2"/><c r="C1" s="0"/></row><row r="2"><c r="A2" s="1"/></row>"#,
        );
        let formats = extract_column_formats(PART, xml.as_bytes(), 1, &general_styles()).unwrap();

        assert_eq!(formats.label_index(), -1);
        assert_eq!(formats.column_name(), "Column-1.NumberFormat");
        assert_eq!(rows_of(&formats), vec![(0, "0.00%"), (1, "yyyy-mm-dd")]);

        let origin_column = extract_column_formats(PART, xml.as_bytes(), 2, &general_styles()).unwrap();
        assert_eq!(origin_column.column_name(), "Column0.NumberFormat");
        assert!(origin_column.is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let xml = sheet(
            r#"<dimension ref="A1:A3"/>"#,
            r#"<row r="3"><c r="A3" s="1"/></row><row r="1"><c r="A1" s="0"/></row>"#,
        );
        let styles = general_styles();
        let first = extract_column_formats(PART, xml.as_bytes(), 1, &styles).unwrap();
        let second = extract_column_formats(PART, xml.as_bytes(), 1, &styles).unwrap();
        assert_eq!(first, second);
    }
}
