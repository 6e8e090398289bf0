//! A1-style cell reference parsing

use std::fmt;

use crate::error::{ExtractError, ExtractResult};

/// Largest column in the XLSX grid ("XFD")
pub const MAX_COLUMN: u32 = 16_384;

/// A cell position with 1-based row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a reference like "A1" or "xfd125"
    ///
    /// The input must be a run of letters followed by a run of digits.
    /// Anything else, including `$` markers, is rejected.
    pub fn parse(reference: &str) -> ExtractResult<Self> {
        let malformed = || ExtractError::MalformedReference(reference.to_string());

        let letters_len = reference
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        let (letters, digits) = reference.split_at(letters_len);

        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let col = column_from_letters(letters).ok_or_else(malformed)?;
        let row = digits.parse::<u32>().map_err(|_| malformed())?;
        if row == 0 {
            return Err(malformed());
        }

        Ok(Self { row, col })
    }

    /// Convert to an Excel-style reference (e.g., "A1")
    pub fn to_a1(&self) -> String {
        format!("{}{}", column_to_letters(self.col), self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// Decode column letters ("A" = 1, "Z" = 26, "AA" = 27), case-insensitive.
/// Returns `None` for an empty string, a non-letter, or overflow.
pub fn column_from_letters(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0u32, |col, b| {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let digit = u32::from(b.to_ascii_uppercase() - b'A') + 1;
        col.checked_mul(26)?.checked_add(digit)
    })
}

/// Encode a 1-based column number as letters (1 -> "A", 27 -> "AA")
pub fn column_to_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Parse a range like "A1:B3" into its corners. A single reference is
/// treated as a one-cell range.
pub fn parse_range(range: &str) -> ExtractResult<(CellRef, CellRef)> {
    match range.split_once(':') {
        Some((start, end)) => Ok((CellRef::parse(start)?, CellRef::parse(end)?)),
        None => {
            let cell = CellRef::parse(range)?;
            Ok((cell, cell))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(CellRef::parse("A1").unwrap(), CellRef::new(1, 1));
        assert_eq!(CellRef::parse("B2").unwrap(), CellRef::new(2, 2));
        assert_eq!(CellRef::parse("Z1").unwrap(), CellRef::new(1, 26));
        assert_eq!(CellRef::parse("AA1").unwrap(), CellRef::new(1, 27));
        assert_eq!(CellRef::parse("AB10").unwrap(), CellRef::new(10, 28));
        assert_eq!(CellRef::parse("XFD1").unwrap(), CellRef::new(1, MAX_COLUMN));
        assert_eq!(CellRef::parse("XFD125").unwrap(), CellRef::new(125, 16_384));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(CellRef::parse("xfd125").unwrap(), CellRef::new(125, 16_384));
        assert_eq!(CellRef::parse("aA3").unwrap(), CellRef::new(3, 27));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "A", "12", "1A", "A1B", "$A$1", "A-1", "A 1", "A0", "É1", "A99999999999"] {
            assert!(
                matches!(CellRef::parse(bad), Err(ExtractError::MalformedReference(_))),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_from_letters("A"), Some(1));
        assert_eq!(column_from_letters("z"), Some(26));
        assert_eq!(column_from_letters("AZ"), Some(52));
        assert_eq!(column_from_letters("BA"), Some(53));
        assert_eq!(column_from_letters(""), None);
        assert_eq!(column_from_letters("A1"), None);

        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(702), "ZZ");
        assert_eq!(column_to_letters(703), "AAA");
        assert_eq!(column_to_letters(16_384), "XFD");
    }

    #[test]
    fn test_to_a1() {
        assert_eq!(CellRef::new(1, 1).to_a1(), "A1");
        assert_eq!(CellRef::new(125, 16_384).to_string(), "XFD125");
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            parse_range("A1:B3").unwrap(),
            (CellRef::new(1, 1), CellRef::new(3, 2))
        );
        assert_eq!(
            parse_range("C5").unwrap(),
            (CellRef::new(5, 3), CellRef::new(5, 3))
        );
        assert!(parse_range("A1:").is_err());
    }
}
