//! # Binary Codec
//!
//! Conversion between machine integers and fixed-width [Word]s, most significant bit first.
//!
//! Negative numbers are encoded the way the hardware negates: write the magnitude in binary,
//! invert every bit with [NOT][gates::not_multibit_gate] and [increment][arithmetic::increment].
//! Decoding a word whose sign bit is set runs the same procedure to recover the magnitude.
//!
//! Widths from 1 to [MAX_WIDTH] bits are supported.

use crate::error::Error;
use crate::{arithmetic, gates, Word};

/// Widest word the codec converts, the width of `i64`/`u64`.
pub const MAX_WIDTH: usize = 64;

fn ensure_codec_width(width: usize) -> Result<(), Error> {
    if width > MAX_WIDTH {
        Err(Error::DimensionMismatch {
            expected: MAX_WIDTH,
            actual: width,
        })
    } else {
        Ok(())
    }
}

/// Encodes an unsigned number in exactly `width` bits.
///
/// # Examples
/// ```
/// use nand_kernel::codec::to_unsigned_bits;
/// assert_eq!(to_unsigned_bits(5, 3), Ok(vec![true, false, true]));
/// assert!(to_unsigned_bits(8, 3).is_err());
/// ```
pub fn to_unsigned_bits(value: u64, width: usize) -> Result<Word, Error> {
    ensure_codec_width(width)?;
    if width < MAX_WIDTH && value >> width != 0 {
        return Err(Error::OutOfRange {
            value: value.into(),
            width,
        });
    }
    Ok((0..width).rev().map(|i| (value >> i) & 1 == 1).collect())
}

/// Decodes a word as an unsigned number.
///
/// # Examples
/// ```
/// use nand_kernel::codec::from_unsigned_bits;
/// assert_eq!(from_unsigned_bits(&[true, false, true]), Ok(5));
/// ```
pub fn from_unsigned_bits(word: &[bool]) -> Result<u64, Error> {
    if word.is_empty() {
        return Err(Error::EmptyInput);
    }
    ensure_codec_width(word.len())?;
    Ok(word
        .iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)))
}

/// Two's-complement encoding of `value` in exactly `width` bits. Fails if `value` is outside
/// `[-2^(width-1), 2^(width-1) - 1]`.
///
/// # Examples
/// ```
/// use nand_kernel::codec::to_twos_complement;
/// assert_eq!(to_twos_complement(3, 4), Ok(vec![false, false, true, true]));
/// assert_eq!(to_twos_complement(-3, 4), Ok(vec![true, true, false, true]));
/// assert_eq!(to_twos_complement(-8, 4), Ok(vec![true, false, false, false]));
/// assert!(to_twos_complement(8, 4).is_err());
/// ```
pub fn to_twos_complement(value: i64, width: usize) -> Result<Word, Error> {
    ensure_codec_width(width)?;
    let out_of_range = Error::OutOfRange {
        value: value.into(),
        width,
    };
    if width == 0 {
        return Err(out_of_range);
    }
    let limit = 1i128 << (width - 1);
    let wide = i128::from(value);
    if wide < -limit || wide >= limit {
        return Err(out_of_range);
    }

    let magnitude = to_unsigned_bits(value.unsigned_abs(), width)?;
    if value < 0 {
        Ok(arithmetic::increment(&gates::not_multibit_gate(&magnitude)))
    } else {
        Ok(magnitude)
    }
}

/// Inverse of [to_twos_complement] for a word of any supported width.
///
/// # Examples
/// ```
/// use nand_kernel::codec::{from_twos_complement, to_twos_complement};
/// assert_eq!(from_twos_complement(&[true, true, false, true]), Ok(-3));
/// assert_eq!(from_twos_complement(&to_twos_complement(-112, 16).unwrap()), Ok(-112));
/// ```
pub fn from_twos_complement(word: &[bool]) -> Result<i64, Error> {
    let (&sign, _) = word.split_first().ok_or(Error::EmptyInput)?;
    ensure_codec_width(word.len())?;
    if !sign {
        return Ok(from_unsigned_bits(word)? as i64);
    }
    // The most negative value negates to itself, which reads back unsigned as 2^(width-1).
    let magnitude = from_unsigned_bits(&arithmetic::increment(&gates::not_multibit_gate(word)))?;
    Ok((-i128::from(magnitude)) as i64)
}

/// Renders a word as `0`/`1` characters, most significant bit first.
///
/// # Examples
/// ```
/// use nand_kernel::codec::word_to_string;
/// assert_eq!(word_to_string(&[true, false, false, true]), "1001");
/// ```
pub fn word_to_string(word: &[bool]) -> String {
    word.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Parses a string of `0`/`1` characters. Leading and trailing white space is ignored.
///
/// # Examples
/// ```
/// use nand_kernel::{codec::string_to_word, Error};
/// assert_eq!(string_to_word("1001"), Ok(vec![true, false, false, true]));
/// assert_eq!(string_to_word("10x1"), Err(Error::InvalidChar('x', 2)));
/// ```
pub fn string_to_word(text: &str) -> Result<Word, Error> {
    text.trim()
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(Error::InvalidChar(c, i)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn width_limits() {
        assert_eq!(
            to_twos_complement(1, 0),
            Err(Error::OutOfRange { value: 1, width: 0 })
        );
        assert_eq!(
            to_twos_complement(1, 65),
            Err(Error::DimensionMismatch {
                expected: 64,
                actual: 65
            })
        );
        assert_eq!(from_twos_complement(&[]), Err(Error::EmptyInput));
        assert_eq!(to_twos_complement(i64::MIN, 64).map(|w| w[0]), Ok(true));
        assert_eq!(
            from_twos_complement(&to_twos_complement(i64::MIN, 64).unwrap()),
            Ok(i64::MIN)
        );
    }

    #[test]
    fn signed_range_edges() {
        assert!(to_twos_complement(32767, 16).is_ok());
        assert!(to_twos_complement(-32768, 16).is_ok());
        assert_eq!(
            to_twos_complement(32768, 16),
            Err(Error::OutOfRange {
                value: 32768,
                width: 16
            })
        );
        assert!(to_twos_complement(-32769, 16).is_err());
        assert_eq!(from_twos_complement(&[true]), Ok(-1));
        assert_eq!(from_twos_complement(&[false]), Ok(0));
    }

    #[test]
    fn matches_from_i16() {
        for v in [-32768i16, -112, -1, 0, 1, 420, 32767] {
            assert_eq!(to_twos_complement(v.into(), 16), Ok(crate::from_i16(v)));
        }
    }

    #[test]
    fn string_round_trip() {
        let word = to_twos_complement(-5, 8).unwrap();
        assert_eq!(string_to_word(&word_to_string(&word)), Ok(word));
    }

    fn width_and_value() -> impl Strategy<Value = (usize, i64)> {
        prop::sample::select(vec![3usize, 6, 9, 12, 14, 16]).prop_flat_map(|width| {
            let limit = 1i64 << (width - 1);
            (Just(width), -limit..limit)
        })
    }

    proptest! {
        #[test]
        fn twos_complement_round_trip((width, value) in width_and_value()) {
            let word = to_twos_complement(value, width).unwrap();
            prop_assert_eq!(word.len(), width);
            prop_assert_eq!(from_twos_complement(&word), Ok(value));
        }

        #[test]
        fn sign_bit_matches_sign((width, value) in width_and_value()) {
            let word = to_twos_complement(value, width).unwrap();
            prop_assert_eq!(word[0], value < 0);
        }
    }
}
