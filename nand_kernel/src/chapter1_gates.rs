//! # Gate Implementation
//!
//! Every gate is derived from `NAND`. `NAND` itself is the only gate built with a Rust bitwise
//! operator; the rest only call other gates. Gates are pure and total over single bits.
//!
//! ## Single-bit gates
//! * `NOT(a) = NAND(a, a)`
//! * `AND(a, b) = NOT(NAND(a, b))`
//! * `OR(a, b) = NAND(NOT(a), NOT(b))`
//! * `XOR(a, b) = OR(AND(a, NOT(b)), AND(NOT(a), b))`
//!
//! ## Multiplexor
//!
//! | AND(a, NOT(sel)) | AND(b, sel) | OR |
//! |------------------|-------------|----|
//! | a                | 0           | a  |
//! | 0                | b           | b  |
//!
//! ## Multi-bit gates
//! Element-wise lifts over two [Word][crate::Word]s paired by position. Unlike the single-bit
//! gates they can fail: both words must have the same width.
//!
//! ## Multi-way gates
//! Selectors are most significant bit first. A 4-way selection uses the low-order bit to pick
//! inside each pair and the high-order bit to pick between the pairs. The 8-way gates are two
//! 4-way gates joined by the high-order bit, and demultiplexors mirror the same tree.

use crate::error::{ensure_same_width, Error};
use crate::Word;

/// The Not And gate. The only gate that is implemented with Rust bitwise operators.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::nand_gate;
/// assert_eq!(nand_gate(false, false), true);
/// assert_eq!(nand_gate(true, false), true);
/// assert_eq!(nand_gate(false, true), true);
/// assert_eq!(nand_gate(true, true), false);
/// ```
///
pub fn nand_gate(a: bool, b: bool) -> bool {
    !(a & b)
}

/// The Not gate.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::not_gate;
/// assert_eq!(not_gate(true), false);
/// assert_eq!(not_gate(false), true);
/// ```
///
pub fn not_gate(a: bool) -> bool {
    nand_gate(a, a)
}

/// The And gate.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::and_gate;
/// assert_eq!(and_gate(false, false), false);
/// assert_eq!(and_gate(true, false), false);
/// assert_eq!(and_gate(false, true), false);
/// assert_eq!(and_gate(true, true), true);
/// ```
///
pub fn and_gate(a: bool, b: bool) -> bool {
    not_gate(nand_gate(a, b))
}

/// The Or gate.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::or_gate;
/// assert_eq!(or_gate(false, false), false);
/// assert_eq!(or_gate(true, false), true);
/// assert_eq!(or_gate(false, true), true);
/// assert_eq!(or_gate(true, true), true);
/// ```
///
pub fn or_gate(a: bool, b: bool) -> bool {
    nand_gate(not_gate(a), not_gate(b))
}

/// The exclusive Or gate.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::xor_gate;
/// assert_eq!(xor_gate(false, false), false);
/// assert_eq!(xor_gate(true, false), true);
/// assert_eq!(xor_gate(false, true), true);
/// assert_eq!(xor_gate(true, true), false);
/// ```
///
pub fn xor_gate(a: bool, b: bool) -> bool {
    or_gate(and_gate(a, not_gate(b)), and_gate(not_gate(a), b))
}

/// The Multiplexor gate. Selector at 0 selects `a` and 1 selects `b`.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::multiplexor_gate;
/// assert_eq!(multiplexor_gate(true, false, false), true);
/// assert_eq!(multiplexor_gate(false, true, false), false);
/// assert_eq!(multiplexor_gate(true, false, true), false);
/// assert_eq!(multiplexor_gate(false, true, true), true);
/// ```
///
pub fn multiplexor_gate(a: bool, b: bool, sel: bool) -> bool {
    or_gate(and_gate(a, not_gate(sel)), and_gate(b, sel))
}

/// The Demultiplexor gate. Output is `[input, 0]` if selector is 0, else `[0, input]`.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::demultiplexor_gate;
/// assert_eq!(demultiplexor_gate(false, false), [false, false]);
/// assert_eq!(demultiplexor_gate(true, false), [true, false]);
/// assert_eq!(demultiplexor_gate(false, true), [false, false]);
/// assert_eq!(demultiplexor_gate(true, true), [false, true]);
/// ```
///
pub fn demultiplexor_gate(input: bool, sel: bool) -> [bool; 2] {
    [and_gate(input, not_gate(sel)), and_gate(input, sel)]
}

/// NOT at each position. Cannot fail, there is only one input.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::not_multibit_gate;
/// assert_eq!(not_multibit_gate(&[true, false, true]), vec![false, true, false]);
/// ```
///
pub fn not_multibit_gate(a: &[bool]) -> Word {
    a.iter().map(|&bit| not_gate(bit)).collect()
}

fn zip_gate(a: &[bool], b: &[bool], gate: fn(bool, bool) -> bool) -> Result<Word, Error> {
    ensure_same_width(a, b)?;
    Ok(a.iter().zip(b).map(|(&x, &y)| gate(x, y)).collect())
}

/// AND at each position.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::and_multibit_gate;
/// assert_eq!(
///     and_multibit_gate(&[true, true, false, false], &[true, false, true, false]),
///     Ok(vec![true, false, false, false])
/// );
/// assert!(and_multibit_gate(&[true], &[true, false]).is_err());
/// ```
///
pub fn and_multibit_gate(a: &[bool], b: &[bool]) -> Result<Word, Error> {
    zip_gate(a, b, and_gate)
}

/// OR at each position.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::or_multibit_gate;
/// assert_eq!(
///     or_multibit_gate(&[true, true, false, false], &[true, false, true, false]),
///     Ok(vec![true, true, true, false])
/// );
/// ```
///
pub fn or_multibit_gate(a: &[bool], b: &[bool]) -> Result<Word, Error> {
    zip_gate(a, b, or_gate)
}

/// XOR at each position. XOR against an all-ones word is a bitwise NOT, which is how the
/// [ALU][crate::arithmetic::alu] applies its negation flags.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::xor_multibit_gate;
/// assert_eq!(
///     xor_multibit_gate(&[true, true, false, false], &[true, false, true, false]),
///     Ok(vec![false, true, true, false])
/// );
/// ```
///
pub fn xor_multibit_gate(a: &[bool], b: &[bool]) -> Result<Word, Error> {
    zip_gate(a, b, xor_gate)
}

/// Picks `a` if selector is 0 and `b` if it is 1.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::multiplexor_multibit_gate;
/// let a = [true, true, false, false];
/// let b = [true, false, true, false];
/// assert_eq!(multiplexor_multibit_gate(&a, &b, false), Ok(a.to_vec()));
/// assert_eq!(multiplexor_multibit_gate(&a, &b, true), Ok(b.to_vec()));
/// ```
///
pub fn multiplexor_multibit_gate(a: &[bool], b: &[bool], sel: bool) -> Result<Word, Error> {
    ensure_same_width(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(&x, &y)| multiplexor_gate(x, y, sel))
        .collect())
}

/// Demultiplexes `input[i]` by `sel[i]` at each position. Returns the two output words.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::demultiplexor_multibit_gate;
/// assert_eq!(
///     demultiplexor_multibit_gate(&[true, true, false], &[false, true, true]),
///     Ok([vec![true, false, false], vec![false, true, false]])
/// );
/// ```
///
pub fn demultiplexor_multibit_gate(input: &[bool], sel: &[bool]) -> Result<[Word; 2], Error> {
    ensure_same_width(input, sel)?;
    let (a, b): (Word, Word) = input
        .iter()
        .zip(sel)
        .map(|(&i, &s)| {
            let [a, b] = demultiplexor_gate(i, s);
            (a, b)
        })
        .unzip();
    Ok([a, b])
}

/// Returns 1 if at least one input bit is 1. An empty word has no answer.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::or_multiway_gate;
/// assert_eq!(or_multiway_gate(&[false; 8]), Ok(false));
/// assert_eq!(or_multiway_gate(&[false, false, false, true]), Ok(true));
/// assert!(or_multiway_gate(&[]).is_err());
/// ```
pub fn or_multiway_gate(a: &[bool]) -> Result<bool, Error> {
    let (&first, rest) = a.split_first().ok_or(Error::EmptyInput)?;
    Ok(rest.iter().fold(first, |acc, &bit| or_gate(acc, bit)))
}

/// 4-way multi-bit Multiplexor. 00 selects the first word, 01 the second, 10 the third and
/// 11 the fourth.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::multiplexor_4way_multibit_gate;
/// let inputs = [[true, true], [true, false], [false, true], [false, false]];
/// let words = [&inputs[0][..], &inputs[1][..], &inputs[2][..], &inputs[3][..]];
/// assert_eq!(multiplexor_4way_multibit_gate(words, [false, false]), Ok(vec![true, true]));
/// assert_eq!(multiplexor_4way_multibit_gate(words, [false, true]), Ok(vec![true, false]));
/// assert_eq!(multiplexor_4way_multibit_gate(words, [true, false]), Ok(vec![false, true]));
/// assert_eq!(multiplexor_4way_multibit_gate(words, [true, true]), Ok(vec![false, false]));
/// ```
pub fn multiplexor_4way_multibit_gate(a: [&[bool]; 4], sel: [bool; 2]) -> Result<Word, Error> {
    let low_pair = multiplexor_multibit_gate(a[0], a[1], sel[1])?;
    let high_pair = multiplexor_multibit_gate(a[2], a[3], sel[1])?;
    multiplexor_multibit_gate(&low_pair, &high_pair, sel[0])
}

/// 8-way multi-bit Multiplexor. 000 selects the first word through to 111 for the eighth.
///
/// # Examples
///
/// ```
/// use nand_kernel::{from_i16, gates::multiplexor_8way_multibit_gate};
/// let inputs: Vec<_> = (0..8).map(from_i16).collect();
/// let words = std::array::from_fn(|i| inputs[i].as_slice());
/// assert_eq!(multiplexor_8way_multibit_gate(words, [false, false, false]), Ok(from_i16(0)));
/// assert_eq!(multiplexor_8way_multibit_gate(words, [true, false, true]), Ok(from_i16(5)));
/// assert_eq!(multiplexor_8way_multibit_gate(words, [true, true, true]), Ok(from_i16(7)));
/// ```
pub fn multiplexor_8way_multibit_gate(a: [&[bool]; 8], sel: [bool; 3]) -> Result<Word, Error> {
    let low_four = multiplexor_4way_multibit_gate([a[0], a[1], a[2], a[3]], [sel[1], sel[2]])?;
    let high_four = multiplexor_4way_multibit_gate([a[4], a[5], a[6], a[7]], [sel[1], sel[2]])?;
    multiplexor_multibit_gate(&low_four, &high_four, sel[0])
}

/// 4-way Demultiplexor. Input lands in position 0 for selector 00 through position 3 for 11.
/// Unselected positions are always 0.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::demultiplexor_4way_gate;
/// assert_eq!(demultiplexor_4way_gate(false, [true, true]), [false, false, false, false]);
/// assert_eq!(demultiplexor_4way_gate(true, [false, false]), [true, false, false, false]);
/// assert_eq!(demultiplexor_4way_gate(true, [false, true]), [false, true, false, false]);
/// assert_eq!(demultiplexor_4way_gate(true, [true, false]), [false, false, true, false]);
/// assert_eq!(demultiplexor_4way_gate(true, [true, true]), [false, false, false, true]);
/// ```
///
pub fn demultiplexor_4way_gate(input: bool, sel: [bool; 2]) -> [bool; 4] {
    let [low, high] = demultiplexor_gate(input, sel[0]);
    let [a, b] = demultiplexor_gate(low, sel[1]);
    let [c, d] = demultiplexor_gate(high, sel[1]);
    [a, b, c, d]
}

/// 8-way Demultiplexor. Input lands in position 0 for selector 000 through position 7 for 111.
///
/// # Examples
///
/// ```
/// use nand_kernel::gates::demultiplexor_8way_gate;
/// assert_eq!(demultiplexor_8way_gate(false, [true, false, true]), [false; 8]);
/// assert_eq!(
///     demultiplexor_8way_gate(true, [true, false, true]),
///     [false, false, false, false, false, true, false, false]
/// );
/// ```
///
pub fn demultiplexor_8way_gate(input: bool, sel: [bool; 3]) -> [bool; 8] {
    let [low, high] = demultiplexor_gate(input, sel[0]);
    let [a, b, c, d] = demultiplexor_4way_gate(low, [sel[1], sel[2]]);
    let [e, f, g, h] = demultiplexor_4way_gate(high, [sel[1], sel[2]]);
    [a, b, c, d, e, f, g, h]
}
