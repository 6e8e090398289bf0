//! Cell style resolution: style index -> numFmtId -> format code

use log::debug;
use std::collections::HashMap;

use super::archive::ArchiveReader;
use super::xml_table::{self, XmlElement};
use crate::error::{ExtractError, ExtractResult};

pub const STYLES_PART: &str = "xl/styles.xml";

/// Built-in number formats reserved by ECMA-376 that a workbook may
/// reference without declaring them in `numFmts`
pub static BUILTIN_NUM_FMTS: &[(u32, &str)] = &[
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (5, "\"$\"#,##0_);(\"$\"#,##0)"),
    (6, "\"$\"#,##0_);[Red](\"$\"#,##0)"),
    (7, "\"$\"#,##0.00_);(\"$\"#,##0.00)"),
    (8, "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "mm-dd-yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (41, "_(* #,##0_);_(* \\(#,##0\\);_(* \"-\"_);_(@_)"),
    (42, "_(\"$\"* #,##0_);_(\"$\"* \\(#,##0\\);_(\"$\"* \"-\"_);_(@_)"),
    (43, "_(* #,##0.00_);_(* \\(#,##0.00\\);_(* \"-\"??_);_(@_)"),
    (44, "_(\"$\"* #,##0.00_);_(\"$\"* \\(#,##0.00\\);_(\"$\"* \"-\"??_);_(@_)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

/// Cell styles of one workbook resolved to number-format codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTable {
    /// cellXfs index -> format code
    styles: HashMap<usize, String>,
}

impl StyleTable {
    /// Build the table from the archive's styles part
    pub fn from_archive(archive: &ArchiveReader<'_>) -> ExtractResult<Self> {
        let bytes = archive
            .read_optional(STYLES_PART)?
            .ok_or_else(|| ExtractError::StylePartMissing(STYLES_PART.to_string()))?;
        Self::from_styles_xml(&bytes)
    }

    /// Build the table from styles part bytes. XML that cannot be parsed
    /// is reported as a malformed styles part.
    pub fn from_styles_xml(bytes: &[u8]) -> ExtractResult<Self> {
        let root = xml_table::parse_xml(STYLES_PART, bytes).map_err(|e| match e {
            ExtractError::Xml { source, .. } => malformed(format!("unreadable XML: {}", source)),
            other => other,
        })?;
        Self::from_table(&root)
    }

    /// Build from a parsed `styleSheet` element
    pub fn from_table(root: &XmlElement) -> ExtractResult<Self> {
        // numFmtId -> format code, built-ins overlaid by custom formats
        let mut formats: HashMap<u32, String> = BUILTIN_NUM_FMTS
            .iter()
            .map(|(id, code)| (*id, code.to_string()))
            .collect();

        for num_fmt in root.section_rows("numFmts", "numFmt") {
            let id = num_fmt
                .attr("numFmtId")
                .ok_or_else(|| malformed("numFmt without numFmtId"))?;
            let id = parse_format_id(id)?;
            let code = num_fmt
                .attr("formatCode")
                .ok_or_else(|| malformed(format!("numFmt {} without formatCode", id)))?;
            // Later declarations replace built-ins and earlier ones
            formats.insert(id, code.to_string());
        }

        let mut styles = HashMap::new();
        for (index, xf) in root.section_rows("cellXfs", "xf").into_iter().enumerate() {
            let id = match xf.attr("numFmtId") {
                Some(value) => parse_format_id(value)?,
                None => 0,
            };
            match formats.get(&id) {
                Some(code) => {
                    styles.insert(index, code.clone());
                }
                None => debug!("cellXfs[{}] references unknown numFmtId {}", index, id),
            }
        }

        Ok(Self { styles })
    }

    /// Format code for a cell style index
    pub fn format_code(&self, style_index: usize) -> Option<&str> {
        self.styles.get(&style_index).map(String::as_str)
    }

    /// Number of resolvable cell styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

fn parse_format_id(value: &str) -> ExtractResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| malformed(format!("numFmtId '{}' is not an unsigned integer", value)))
}

fn malformed(message: impl Into<String>) -> ExtractError {
    ExtractError::MalformedStylePart(message.into())
}
