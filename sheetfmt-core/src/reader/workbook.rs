//! Worksheet enumeration: sheet names and the archive parts backing them

use log::debug;
use std::collections::HashMap;

use super::archive::ArchiveReader;
use super::xml_table::{self, XmlElement};
use crate::error::ExtractResult;

pub const WORKBOOK_PART: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";

/// A sheet listed in the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub name: String,
    /// Archive entry name of the sheet part (e.g. "xl/worksheets/sheet1.xml")
    pub part: String,
}

/// List sheets in workbook order
pub fn list_sheets(archive: &ArchiveReader<'_>) -> ExtractResult<Vec<SheetInfo>> {
    let workbook_xml = archive.read(WORKBOOK_PART)?;
    let workbook = xml_table::parse_xml(WORKBOOK_PART, &workbook_xml)?;

    let targets = match archive.read_optional(WORKBOOK_RELS_PART)? {
        Some(bytes) => relationship_targets(&xml_table::parse_xml(WORKBOOK_RELS_PART, &bytes)?),
        None => {
            debug!("{} missing, using positional sheet parts", WORKBOOK_RELS_PART);
            HashMap::new()
        }
    };

    let mut sheets = Vec::new();
    for (position, sheet) in workbook.section_rows("sheets", "sheet").into_iter().enumerate() {
        let Some(name) = sheet.attr("name") else {
            debug!("sheet entry {} has no name, skipping", position + 1);
            continue;
        };

        // `r:id` is stored under its local name
        let part = sheet
            .attr("id")
            .and_then(|rid| targets.get(rid))
            .map(|target| resolve_target(target))
            .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", position + 1));

        sheets.push(SheetInfo {
            name: name.to_string(),
            part,
        });
    }

    Ok(sheets)
}

fn relationship_targets(rels: &XmlElement) -> HashMap<String, String> {
    rels.children_named("Relationship")
        .filter_map(|rel| Some((rel.attr("Id")?.to_string(), rel.attr("Target")?.to_string())))
        .collect()
}

/// Targets are relative to `xl/` unless they start with `/`
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if target.starts_with("xl/") {
        target.to_string()
    } else {
        format!("xl/{}", target)
    }
}
