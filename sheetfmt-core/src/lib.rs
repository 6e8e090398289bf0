//! sheetfmt-core: per-cell number-format extraction for XLSX workbooks
//!
//! Reads an OOXML package with a local-header ZIP scanner, resolves cell
//! style indices to number-format codes and reports, for one column of each
//! requested sheet, the format code of every styled cell keyed by its row
//! offset from the sheet's used-range origin.

pub mod config;
pub mod error;
pub mod reader;

use std::path::Path;

pub use config::ExtractConfig;
pub use error::{ExtractError, ExtractResult};
pub use reader::{CellRef, ColumnFormats, FormatRow, SheetFormats};

/// Main extraction interface
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    /// Create an extractor reading column 1 of every sheet
    pub fn new() -> Self {
        Self::with_config(ExtractConfig::default())
    }

    /// Create an extractor with custom configuration
    pub fn with_config(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Extract number formats from a workbook file
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> ExtractResult<Vec<SheetFormats>> {
        let bytes = std::fs::read(path)?;
        self.extract_bytes(&bytes)
    }

    /// Extract number formats from package bytes already in memory
    pub fn extract_bytes(&self, bytes: &[u8]) -> ExtractResult<Vec<SheetFormats>> {
        reader::read_column_formats(bytes, &self.config)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
