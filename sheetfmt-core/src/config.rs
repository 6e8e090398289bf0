//! Configuration for number-format extraction

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::reader::cell_ref::MAX_COLUMN;

/// Column read when none is configured
pub const DEFAULT_COLUMN: u32 = 1;

/// Which sheets and which column to read
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Sheet names to read, in output order (empty means all sheets)
    pub sheets: Vec<String>,
    /// 1-based absolute column number
    pub column: u32,
}

impl ExtractConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExtractConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn with_sheets<I, S>(mut self, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheets = sheets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }

    /// Check that the column lies inside the worksheet grid
    pub fn validate(&self) -> ExtractResult<()> {
        if self.column == 0 || self.column > MAX_COLUMN {
            return Err(ExtractError::InvalidConfig(format!(
                "column {} is outside 1..={}",
                self.column, MAX_COLUMN
            )));
        }
        Ok(())
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            sheets: Vec::new(),
            column: DEFAULT_COLUMN,
        }
    }
}
