//! Forward-only ZIP reader driven by local file headers
//!
//! The archive is scanned from the first byte, hopping from one local file
//! header to the next. The central directory is never consulted: the first
//! header whose signature is not `PK\x03\x04` ends the scan. Declared sizes
//! are trusted, so a header with wrong sizes misaligns every header after it.

use flate2::read::DeflateDecoder;
use log::trace;
use std::io::Read;

use crate::error::{ExtractError, ExtractResult};

const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const LOCAL_FILE_HEADER_LEN: usize = 30;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

/// General-purpose flag bit 3: sizes follow the payload in a data descriptor
const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;

/// Cap on buffer preallocation taken from a declared uncompressed size
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// Byte-slice view of an OOXML package
#[derive(Debug, Clone, Copy)]
pub struct ArchiveReader<'a> {
    data: &'a [u8],
}

impl<'a> ArchiveReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Lazily scan entries in on-disk order
    pub fn entries(&self) -> Entries<'a> {
        Entries {
            data: self.data,
            offset: 0,
            done: false,
        }
    }

    /// Find the first entry with the given name
    pub fn find(&self, name: &str) -> ExtractResult<Option<ArchiveEntry<'a>>> {
        let wanted = normalize_name(name);
        for entry in self.entries() {
            let entry = entry?;
            if normalize_name(&entry.name) == wanted {
                trace!("entry '{}' found at offset {}", entry.name, entry.offset);
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Decompressed content of a named entry, or `None` when it is absent
    pub fn read_optional(&self, name: &str) -> ExtractResult<Option<Vec<u8>>> {
        self.find(name)?.map(|entry| entry.content()).transpose()
    }

    /// Decompressed content of a named entry
    pub fn read(&self, name: &str) -> ExtractResult<Vec<u8>> {
        self.read_optional(name)?
            .ok_or_else(|| ExtractError::ArchiveEntryNotFound(normalize_name(name).to_string()))
    }
}

fn normalize_name(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

/// A single entry found by the scanner. The payload stays compressed until
/// [`ArchiveEntry::content`] is called.
#[derive(Debug, Clone)]
pub struct ArchiveEntry<'a> {
    pub name: String,
    /// Compression method from the local header (0 = stored, 8 = Deflate)
    method: u16,
    uncompressed_size: u32,
    /// Offset of the local header within the archive
    offset: usize,
    data: &'a [u8],
}

impl ArchiveEntry<'_> {
    /// Decompress the payload
    pub fn content(&self) -> ExtractResult<Vec<u8>> {
        match self.method {
            METHOD_STORED => Ok(self.data.to_vec()),
            METHOD_DEFLATE => {
                let capacity = (self.uncompressed_size as usize).min(MAX_PREALLOC);
                let mut content = Vec::with_capacity(capacity);
                DeflateDecoder::new(self.data)
                    .read_to_end(&mut content)
                    .map_err(|source| ExtractError::DecompressionFailed {
                        name: self.name.clone(),
                        source,
                    })?;
                Ok(content)
            }
            method => Err(ExtractError::UnsupportedCompression {
                name: self.name.clone(),
                method,
            }),
        }
    }
}

/// Iterator over local file headers
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    data: &'a [u8],
    offset: usize,
    done: bool,
}

enum HeaderScan<'a> {
    Entry(ArchiveEntry<'a>),
    /// Signature mismatch or end of input: normally the central directory
    Terminator,
}

impl<'a> Entries<'a> {
    fn scan_header(&mut self) -> ExtractResult<HeaderScan<'a>> {
        let start = self.offset;
        let rest = self.data.get(start..).unwrap_or_default();

        let Some(signature) = read_u32(rest, 0) else {
            trace!("archive scan reached end of data at offset {start}");
            return Ok(HeaderScan::Terminator);
        };
        if signature != LOCAL_FILE_HEADER_SIGNATURE {
            trace!("archive scan stopped at offset {start}: signature {signature:#010x}");
            return Ok(HeaderScan::Terminator);
        }

        let truncated = || ExtractError::TruncatedArchive { offset: start };
        let header = rest.get(..LOCAL_FILE_HEADER_LEN).ok_or_else(truncated)?;

        let flags = read_u16(header, 6).ok_or_else(truncated)?;
        let method = read_u16(header, 8).ok_or_else(truncated)?;
        let compressed_size = read_u32(header, 18).ok_or_else(truncated)? as usize;
        let uncompressed_size = read_u32(header, 22).ok_or_else(truncated)?;
        let name_len = read_u16(header, 26).ok_or_else(truncated)? as usize;
        let extra_len = read_u16(header, 28).ok_or_else(truncated)? as usize;

        let name_end = LOCAL_FILE_HEADER_LEN + name_len;
        let data_start = name_end + extra_len;
        let data_end = data_start
            .checked_add(compressed_size)
            .ok_or_else(truncated)?;

        let name_bytes = rest.get(LOCAL_FILE_HEADER_LEN..name_end).ok_or_else(truncated)?;
        let name = String::from_utf8_lossy(name_bytes).into_owned();

        // Streamed entries leave the header sizes zero, so the payload end is unknown
        if flags & FLAG_DATA_DESCRIPTOR != 0 && compressed_size == 0 {
            return Err(ExtractError::DataDescriptorUnsupported { name });
        }

        let data = rest.get(data_start..data_end).ok_or_else(truncated)?;

        self.offset = start + data_end;

        Ok(HeaderScan::Entry(ArchiveEntry {
            name,
            method,
            uncompressed_size,
            offset: start,
            data,
        }))
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = ExtractResult<ArchiveEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scan_header() {
            Ok(HeaderScan::Entry(entry)) => Some(Ok(entry)),
            Ok(HeaderScan::Terminator) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
