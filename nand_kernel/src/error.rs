//! Errors raised by gates, codecs and chips.
//!
//! All of them are input errors detected at the boundary of the failing operation. Nothing is
//! retried; a failing `execute` aborts the current cycle.

use crate::clock::ClockPhase;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A word does not have the width the operation requires.
    #[error("expected a word of {expected} bit(s), got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// A memory address is past the last word of the memory.
    #[error("address {address} is outside a memory of {capacity} words")]
    AddressOutOfRange { address: usize, capacity: usize },
    /// An integer cannot be encoded in the requested number of bits.
    #[error("{value} does not fit in {width} bit(s)")]
    OutOfRange { value: i128, width: usize },
    /// Both active-low inputs of an SR latch were asserted together.
    #[error("set and reset asserted together on {chip}")]
    InvalidControlState { chip: &'static str },
    /// Reduction over a word with no bits.
    #[error("input must hold at least one bit")]
    EmptyInput,
    /// Fewer sub-ticks per phase than the driven chips need to settle.
    #[error("each clock phase needs at least {required} sub-tick(s), got {given}")]
    NoSubTicks { required: usize, given: usize },
    /// Character can either be `0` or `1`. Offset of invalid character is also recorded.
    #[error("expected either 0 or 1 character, but got {0} at offset {1}")]
    InvalidChar(char, usize),
    /// A chip failed while a [Harness][crate::Harness] was driving it.
    #[error("cycle {cycle} ({phase:?}): {chip} #{index} failed on inputs {inputs}")]
    Cycle {
        cycle: usize,
        phase: ClockPhase,
        chip: &'static str,
        index: usize,
        inputs: String,
        #[source]
        source: Box<Error>,
    },
}

pub(crate) fn ensure_width(word: &[bool], expected: usize) -> Result<(), Error> {
    if word.len() == expected {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected,
            actual: word.len(),
        })
    }
}

pub(crate) fn ensure_same_width(a: &[bool], b: &[bool]) -> Result<(), Error> {
    ensure_width(b, a.len())
}
