//! Error types for number-format extraction

use thiserror::Error;

/// Result type for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting number formats from a workbook
#[derive(Debug, Error)]
pub enum ExtractError {
    /// IO error while reading the workbook file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required part is not present in the archive
    #[error("Archive entry not found: {0}")]
    ArchiveEntryNotFound(String),

    /// A local file header or its payload runs past the end of the input
    #[error("Truncated archive: entry at offset {offset} extends past end of data")]
    TruncatedArchive { offset: usize },

    /// Entry uses a compression method other than stored or Deflate
    #[error("Unsupported compression method {method} for entry '{name}'")]
    UnsupportedCompression { name: String, method: u16 },

    /// Entry sizes are only recorded in a data descriptor after the payload
    #[error("Entry '{name}' was written in streaming mode; sizes in a data descriptor are not supported")]
    DataDescriptorUnsupported { name: String },

    /// Entry payload could not be inflated
    #[error("Failed to decompress entry '{name}': {source}")]
    DecompressionFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Cell or range reference is not a valid A1-style reference
    #[error("Malformed cell reference: '{0}'")]
    MalformedReference(String),

    /// Workbook has no styles part
    #[error("Styles part missing: {0}")]
    StylePartMissing(String),

    /// Styles part does not carry the expected attributes
    #[error("Malformed styles part: {0}")]
    MalformedStylePart(String),

    /// Worksheet part does not carry the expected attributes
    #[error("Malformed worksheet part '{part}': {message}")]
    MalformedSheetPart { part: String, message: String },

    /// XML syntax error in an archive part
    #[error("XML error in '{part}': {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Extraction settings are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
