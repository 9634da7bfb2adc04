//! A NAND-derived logic emulator: combinational gates, a two's-complement codec, an ALU and
//! clock-driven storage chips (latches, flip-flops, registers, RAM, counter).
//!
//! Everything above the [NAND gate][gates::nand_gate] is composed from other gates. The only
//! state a sequential chip owns is the `(q, notQ)` pair of an [SR latch][seq_logic::SrLatch];
//! every storage chip is a tree of latches driven through the [Chip][clock::Chip] contract.
//!
//! # Note on memory
//! A [Ram16K][memory::RamSize::Ram16K] holds 262144 [Bit][seq_logic::Bit]s, each a master-slave
//! flip-flop. RAM blocks keep their children on the heap so that building one does not blow the stack.

pub mod chapter1_gates;
pub mod chapter2_arithmetic;
pub mod chapter3_memory;
pub mod chapter3_sequential_logic;
pub mod clock;
pub mod codec;
pub mod error;
pub mod harness;

pub use chapter1_gates as gates;
pub use chapter2_arithmetic as arithmetic;
pub use chapter3_memory as memory;
pub use chapter3_sequential_logic as seq_logic;

pub use clock::{Chip, ClockPhase};
pub use error::Error;
pub use harness::{Harness, HarnessConfig};

/// An ordered sequence of bits, most significant bit first.
pub type Word = Vec<bool>;

/// Width of a register and of every RAM word.
pub const WORD_WIDTH: usize = 16;

/// Convenience function to get a 16-bit [Word] for specific numbers.
///
/// # Examples
/// ```
/// use nand_kernel::from_i16;
/// assert_eq!(from_i16(0), vec![false; 16]);
/// assert_eq!(
///     from_i16(1),
///     vec![false, false, false, false, false, false, false, false, false, false, false, false, false, false, false, true]
/// );
/// assert_eq!(from_i16(-1), vec![true; 16]);
/// ```
///
pub fn from_i16(a: i16) -> Word {
    let bits = a as u16;
    (0..WORD_WIDTH).rev().map(|i| (bits >> i) & 1 == 1).collect()
}

/// Inverse of [from_i16]. Fails unless the word is exactly 16 bits.
///
/// # Examples
/// ```
/// use nand_kernel::{from_i16, to_i16};
/// assert_eq!(to_i16(&from_i16(-112)), Ok(-112));
/// assert!(to_i16(&[true, false]).is_err());
/// ```
pub fn to_i16(word: &[bool]) -> Result<i16, Error> {
    error::ensure_width(word, WORD_WIDTH)?;
    Ok(codec::from_twos_complement(word)? as i16)
}
