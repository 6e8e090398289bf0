//! Output formatters for extracted number formats

use anyhow::Result;
use colored::*;
use serde_json::{Map, Value};
use sheetfmt_core::SheetFormats;
use std::path::Path;

/// Print number formats grouped by sheet with colors
pub fn print_human(file_path: &Path, results: &[SheetFormats]) {
    println!("{}", format!("Number formats: {}", file_path.display()).bold());
    println!();

    if results.is_empty() {
        println!("{}", "No matching sheets found".yellow().bold());
        return;
    }

    for result in results {
        let formats = &result.formats;
        println!(
            "{} {} {}",
            "Sheet:".bold(),
            result.sheet.cyan().bold(),
            format!("(origin {}, {})", formats.origin, formats.column_name()).bright_black()
        );

        if formats.is_empty() {
            println!("  {}", "no styled cells".bright_black());
        }
        for row in &formats.rows {
            println!("  {:>6}  {}", row.row_index.to_string().yellow(), row.format_code);
        }
        println!();
    }

    let total: usize = results.iter().map(|r| r.formats.rows.len()).sum();
    println!("{}", "Summary:".bold().underline());
    println!("  {} {}", "Sheets:".green().bold(), results.len());
    println!("  {} {}", "Formatted cells:".green().bold(), total);
}

/// Records of one sheet as `{"rowIndex": n, "Column<N>.NumberFormat": code}`
fn sheet_records(result: &SheetFormats) -> Vec<Value> {
    let column_name = result.formats.column_name();
    result
        .formats
        .rows
        .iter()
        .map(|row| {
            let mut record = Map::new();
            record.insert("rowIndex".to_string(), Value::from(row.row_index));
            record.insert(column_name.clone(), Value::from(row.format_code.clone()));
            Value::Object(record)
        })
        .collect()
}

/// Print number formats in JSON format
pub fn print_json(file_path: &Path, results: &[SheetFormats]) -> Result<()> {
    let sheets: Vec<Value> = results
        .iter()
        .map(|result| {
            serde_json::json!({
                "sheet": result.sheet,
                "column": result.formats.column,
                "origin": result.formats.origin.to_a1(),
                "records": sheet_records(result),
            })
        })
        .collect();

    let output = serde_json::json!({
        "file": file_path.display().to_string(),
        "sheets": sheets,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
