//! Tools for feeding the [nand kernel][nand_kernel] from text.
//!
//! [Bit16] is the 16-bit value used in comparison tables, and [cmp_io] reads and writes those
//! tables.

use nand_kernel::{Word, WORD_WIDTH};

pub mod cmp_io;

/// A 16 bit value as written in comparison tables.
///
/// # Examples
/// ```
/// use nand_interface::{Bit16, Error};
/// let mut i: Result<Bit16, Error> = "0110001111001010".parse();
/// assert!(i.is_ok());
/// // 16 bits are exactly 16 characters long
/// i = "01100011110010100".parse();
/// assert!(i.is_err());
/// // Bits only consist of 0s and 1s
/// i = "0110001111001012".parse();
/// assert!(i.is_err());
/// ```
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Bit16 {
    i: [bool; 16],
}

impl Bit16 {
    pub fn to_word(&self) -> Word {
        self.i.to_vec()
    }

    /// Two's-complement value.
    ///
    /// # Examples
    /// ```
    /// use nand_interface::Bit16;
    /// assert_eq!(Bit16::from(-420).to_i16(), -420);
    /// ```
    pub fn to_i16(&self) -> i16 {
        self.i
            .iter()
            .fold(0u16, |acc, &bit| (acc << 1) | u16::from(bit)) as i16
    }
}

impl std::str::FromStr for Bit16 {
    type Err = Error;
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.len() != WORD_WIDTH {
            Err(Error::CharCount(WORD_WIDTH))?
        }
        let word = nand_kernel::codec::string_to_word(text).map_err(|e| match e {
            nand_kernel::Error::InvalidChar(c, i) => Error::Char(c, i),
            other => other.into(),
        })?;
        Self::try_from(word.as_slice())
    }
}

impl std::convert::From<[bool; 16]> for Bit16 {
    fn from(i: [bool; 16]) -> Self {
        Bit16 { i }
    }
}

impl std::convert::TryFrom<&[bool]> for Bit16 {
    type Error = Error;
    fn try_from(word: &[bool]) -> Result<Self, Self::Error> {
        let i: [bool; 16] = word.try_into().map_err(|_| nand_kernel::Error::DimensionMismatch {
            expected: WORD_WIDTH,
            actual: word.len(),
        })?;
        Ok(Bit16 { i })
    }
}

impl std::convert::From<i16> for Bit16 {
    fn from(i: i16) -> Self {
        let mut bits = [false; 16];
        bits.copy_from_slice(&nand_kernel::from_i16(i));
        Bit16 { i: bits }
    }
}

impl std::fmt::Display for Bit16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", nand_kernel::codec::word_to_string(&self.i))
    }
}

/// Errors while reading comparison tables.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// String input is the wrong length, with expected length specified.
    #[error("input must be {0} character(s)")]
    CharCount(usize),
    /// Character can either be `0` or `1`. Offset of invalid character is also recorded.
    #[error("expected either 0 or 1 character, but got {0} at offset {1}")]
    Char(char, usize),
    /// The table has no header line.
    #[error("comparison table has no header")]
    MissingHeader,
    /// A row has a different number of cells than the header.
    #[error("line {line}: expected {expected} column(s), got {actual}")]
    Columns {
        line: usize,
        expected: usize,
        actual: usize,
    },
    /// A column asked for is not in the header.
    #[error("line {line}: no column named {column}")]
    Column { line: usize, column: String },
    /// A cell cannot be decoded as the value asked for.
    #[error("line {line}: cannot decode {cell:?} in column {column}")]
    Cell {
        line: usize,
        column: String,
        cell: String,
    },
    /// Upstream IO error.
    #[error("cannot read: {0}")]
    Io(#[from] std::io::Error),
    /// A kernel chip or codec rejected a value.
    #[error(transparent)]
    Kernel(#[from] nand_kernel::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trip() {
        let b = Bit16::from(-2);
        assert_eq!(b.to_string(), "1111111111111110");
        assert_eq!(b.to_string().parse::<Bit16>().unwrap(), b);
    }

    #[test]
    fn rejects_wrong_width_word() {
        assert!(matches!(
            Bit16::try_from(&[true; 15][..]),
            Err(Error::Kernel(nand_kernel::Error::DimensionMismatch {
                expected: 16,
                actual: 15
            }))
        ));
    }

    #[test]
    fn bad_character_offset() {
        assert!(matches!(
            "0000000020000000".parse::<Bit16>(),
            Err(Error::Char('2', 8))
        ));
    }
}
