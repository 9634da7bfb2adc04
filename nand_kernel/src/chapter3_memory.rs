//! # Memory
//!
//! RAM blocks built recursively from [Register]s. A block of each tier holds eight blocks of the
//! tier below (four for [RamSize::Ram16K]); a [RamSize::Ram8] holds eight registers.
//!
//! The high-order bits of an address select the child block, the remaining bits are passed to
//! that child unchanged as its own address. On every `execute` the load bit is routed to one
//! child with an 8-way (or 4-way) demultiplexor, every child runs with its own load bit, and a
//! multiplexor keyed by the same address bits picks the child output.
//!
//! ## Probing
//! [Ram::probe] reads a stored word without running the clock, like probing a chip in a
//! simulator with the address lines set.

use tracing::trace;

use crate::clock::{Chip, ClockPhase};
use crate::error::{ensure_width, Error};
use crate::seq_logic::{Load, Register};
use crate::{codec, gates, Word, WORD_WIDTH};

/// The RAM tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RamSize {
    Ram8,
    Ram64,
    Ram512,
    Ram4K,
    Ram16K,
}

impl RamSize {
    pub const ALL: [RamSize; 5] = [
        RamSize::Ram8,
        RamSize::Ram64,
        RamSize::Ram512,
        RamSize::Ram4K,
        RamSize::Ram16K,
    ];

    /// Number of words.
    pub fn capacity(self) -> usize {
        match self {
            Self::Ram8 => 8,
            Self::Ram64 => 64,
            Self::Ram512 => 512,
            Self::Ram4K => 4096,
            Self::Ram16K => 16384,
        }
    }

    /// Address bits, `ceil(log2(capacity))`.
    ///
    /// # Examples
    /// ```
    /// use nand_kernel::memory::RamSize;
    /// let widths: Vec<usize> = RamSize::ALL.iter().map(|s| s.address_width()).collect();
    /// assert_eq!(widths, [3, 6, 9, 12, 14]);
    /// ```
    pub fn address_width(self) -> usize {
        match self {
            Self::Ram8 => 3,
            Self::Ram64 => 6,
            Self::Ram512 => 9,
            Self::Ram4K => 12,
            Self::Ram16K => 14,
        }
    }

    /// Tier of the child blocks. A [RamSize::Ram8] holds registers instead.
    pub fn child(self) -> Option<RamSize> {
        match self {
            Self::Ram8 => None,
            Self::Ram64 => Some(Self::Ram8),
            Self::Ram512 => Some(Self::Ram64),
            Self::Ram4K => Some(Self::Ram512),
            Self::Ram16K => Some(Self::Ram4K),
        }
    }

    /// Number of children.
    pub fn fan_out(self) -> usize {
        match self {
            Self::Ram16K => 4,
            _ => 8,
        }
    }

    /// High-order address bits that select the child.
    pub fn select_width(self) -> usize {
        match self {
            Self::Ram16K => 2,
            _ => 3,
        }
    }

    /// Splits an address into `(child, address within child)`.
    ///
    /// # Examples
    /// ```
    /// use nand_kernel::memory::RamSize;
    /// assert_eq!(RamSize::Ram64.split_address(45), Ok((5, 5)));
    /// assert_eq!(RamSize::Ram16K.split_address(16383), Ok((3, 4095)));
    /// assert!(RamSize::Ram8.split_address(8).is_err());
    /// ```
    pub fn split_address(self, address: usize) -> Result<(usize, usize), Error> {
        self.check_address(address)?;
        let child_width = self.address_width() - self.select_width();
        Ok((address >> child_width, address & ((1 << child_width) - 1)))
    }

    /// Inverse of [RamSize::split_address].
    pub fn join_address(self, child: usize, offset: usize) -> usize {
        let child_width = self.address_width() - self.select_width();
        (child << child_width) | offset
    }

    fn check_address(self, address: usize) -> Result<(), Error> {
        if address < self.capacity() {
            Ok(())
        } else {
            Err(Error::AddressOutOfRange {
                address,
                capacity: self.capacity(),
            })
        }
    }
}

/// Input of a [Ram] block. The address is a binary word of the block's address width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamInputs {
    pub address: Word,
    pub input: Word,
    pub load: bool,
}

impl RamInputs {
    /// Encodes a numeric address for a block of the given size.
    ///
    /// # Examples
    /// ```
    /// use nand_kernel::{from_i16, memory::{RamInputs, RamSize}, Error};
    /// let inputs = RamInputs::new(RamSize::Ram8, 5, from_i16(15), true).unwrap();
    /// assert_eq!(inputs.address, vec![true, false, true]);
    /// assert_eq!(
    ///     RamInputs::new(RamSize::Ram64, 64, from_i16(15), true),
    ///     Err(Error::AddressOutOfRange { address: 64, capacity: 64 })
    /// );
    /// ```
    pub fn new(size: RamSize, address: usize, input: Word, load: bool) -> Result<Self, Error> {
        size.check_address(address)?;
        Ok(Self {
            address: codec::to_unsigned_bits(address as u64, size.address_width())?,
            input,
            load,
        })
    }

    /// Same address, load low.
    pub fn read(size: RamSize, address: usize) -> Result<Self, Error> {
        Self::new(size, address, vec![false; WORD_WIDTH], false)
    }
}

#[derive(Debug, Clone)]
enum Bank {
    Registers(Vec<Register>),
    Blocks(Vec<Ram>),
}

/// A RAM block of any [RamSize].
///
/// # Examples
/// ```
/// use nand_kernel::{from_i16, memory::{Ram, RamInputs, RamSize}, Harness};
/// let size = RamSize::Ram8;
/// let mut harness = Harness::new(Ram::new(size), RamInputs::new(size, 5, from_i16(22), true)?);
/// assert_eq!(harness.cycle(1, 2)?, &from_i16(0));
/// harness.set_inputs(RamInputs::read(size, 5)?);
/// assert_eq!(harness.cycle(1, 2)?, &from_i16(22));
/// assert_eq!(harness.chips()[0].probe(&[true, false, true])?, from_i16(22));
/// # Ok::<(), nand_kernel::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Ram {
    size: RamSize,
    bank: Bank,
    outputs: Word,
}

impl Ram {
    pub fn new(size: RamSize) -> Self {
        let bank = match size.child() {
            None => Bank::Registers(vec![Register::new(); size.fan_out()]),
            Some(child) => Bank::Blocks((0..size.fan_out()).map(|_| Ram::new(child)).collect()),
        };
        Self {
            size,
            bank,
            outputs: vec![false; WORD_WIDTH],
        }
    }

    pub fn size(&self) -> RamSize {
        self.size
    }

    /// Reads the word stored at `address` without running the clock.
    pub fn probe(&self, address: &[bool]) -> Result<Word, Error> {
        ensure_width(address, self.size.address_width())?;
        let (select, rest) = address.split_at(self.size.select_width());
        let child = codec::from_unsigned_bits(select)? as usize;
        match &self.bank {
            Bank::Registers(registers) => Ok(registers[child].outputs().clone()),
            Bank::Blocks(blocks) => blocks[child].probe(rest),
        }
    }
}

// `select` holds `size.select_width()` bits, checked by the caller.
fn decode(size: RamSize, load: bool, select: &[bool]) -> Vec<bool> {
    match size {
        RamSize::Ram16K => {
            gates::demultiplexor_4way_gate(load, std::array::from_fn(|i| select[i])).to_vec()
        }
        _ => gates::demultiplexor_8way_gate(load, std::array::from_fn(|i| select[i])).to_vec(),
    }
}

fn recompose(size: RamSize, outputs: &[Word], select: &[bool]) -> Result<Word, Error> {
    match size {
        RamSize::Ram16K => gates::multiplexor_4way_multibit_gate(
            std::array::from_fn(|i| outputs[i].as_slice()),
            std::array::from_fn(|i| select[i]),
        ),
        _ => gates::multiplexor_8way_multibit_gate(
            std::array::from_fn(|i| outputs[i].as_slice()),
            std::array::from_fn(|i| select[i]),
        ),
    }
}

impl Chip for Ram {
    type Input = RamInputs;
    type Output = Word;

    fn name(&self) -> &'static str {
        match self.size {
            RamSize::Ram8 => "Ram8",
            RamSize::Ram64 => "Ram64",
            RamSize::Ram512 => "Ram512",
            RamSize::Ram4K => "Ram4K",
            RamSize::Ram16K => "Ram16K",
        }
    }

    fn execute(&mut self, phase: ClockPhase, input: &RamInputs) -> Result<Word, Error> {
        ensure_width(&input.address, self.size.address_width())?;
        ensure_width(&input.input, WORD_WIDTH)?;
        let (select, rest) = input.address.split_at(self.size.select_width());
        let loads = decode(self.size, input.load, select);
        if input.load {
            trace!(ram = self.name(), select = %codec::word_to_string(select), ?phase, "write decoded");
        }

        let outputs = match &mut self.bank {
            Bank::Registers(registers) => registers
                .iter_mut()
                .zip(loads)
                .map(|(register, load)| {
                    register.execute(phase, &Load::new(input.input.clone(), load))
                })
                .collect::<Result<Vec<Word>, Error>>()?,
            Bank::Blocks(blocks) => blocks
                .iter_mut()
                .zip(loads)
                .map(|(block, load)| {
                    let child = RamInputs {
                        address: rest.to_vec(),
                        input: input.input.clone(),
                        load,
                    };
                    block.execute(phase, &child)
                })
                .collect::<Result<Vec<Word>, Error>>()?,
        };
        self.outputs = recompose(self.size, &outputs, select)?;
        Ok(self.outputs.clone())
    }

    fn outputs(&self) -> &Word {
        &self.outputs
    }

    // Every child is the same tier
    fn min_sub_ticks(&self) -> usize {
        match &self.bank {
            Bank::Registers(registers) => registers.first().map_or(1, Chip::min_sub_ticks),
            Bank::Blocks(blocks) => blocks.first().map_or(1, Chip::min_sub_ticks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn address_width_is_log2_capacity() {
        for size in RamSize::ALL {
            assert_eq!(1usize << size.address_width(), size.capacity());
            assert_eq!(size.capacity().next_power_of_two().trailing_zeros() as usize, size.address_width());
            let child_capacity = size.child().map_or(1, RamSize::capacity);
            assert_eq!(child_capacity * size.fan_out(), size.capacity());
            assert_eq!(1 << size.select_width(), size.fan_out());
        }
    }

    #[test]
    fn split_join_every_address() {
        for size in RamSize::ALL {
            let child_capacity = size.capacity() / size.fan_out();
            for address in 0..size.capacity() {
                let (child, offset) = size.split_address(address).unwrap();
                assert!(child < size.fan_out());
                assert!(offset < child_capacity);
                assert_eq!(size.join_address(child, offset), address);
            }
        }
    }

    proptest! {
        #[test]
        fn split_then_join(address in 0usize..16384) {
            for size in RamSize::ALL.into_iter().filter(|s| address < s.capacity()) {
                let (child, offset) = size.split_address(address).unwrap();
                prop_assert_eq!(size.join_address(child, offset), address);
            }
        }
    }

    #[test]
    fn split_matches_bit_prefix() {
        let size = RamSize::Ram512;
        let inputs = RamInputs::read(size, 0b101_011_110).unwrap();
        let (select, rest) = inputs.address.split_at(size.select_width());
        let (child, offset) = size.split_address(0b101_011_110).unwrap();
        assert_eq!(codec::from_unsigned_bits(select), Ok(child as u64));
        assert_eq!(codec::from_unsigned_bits(rest), Ok(offset as u64));
    }

    #[test]
    fn decode_routes_load_to_selected_child() {
        let loads = decode(RamSize::Ram16K, true, &[true, false]);
        assert_eq!(loads, [false, false, true, false]);
        let loads = decode(RamSize::Ram64, true, &[true, true, false]);
        assert_eq!(loads.iter().position(|&l| l), Some(6));
        assert!(!decode(RamSize::Ram8, false, &[true, true, true]).contains(&true));
    }

    #[test]
    fn needs_two_sub_ticks() {
        for size in RamSize::ALL {
            assert_eq!(Ram::new(size).min_sub_ticks(), 2);
        }
    }

    #[test]
    fn bad_widths() {
        let mut ram = Ram::new(RamSize::Ram8);
        let short_address = RamInputs {
            address: vec![true, false],
            input: vec![false; 16],
            load: false,
        };
        assert_eq!(
            ram.execute(ClockPhase::Tick, &short_address),
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
        let short_word = RamInputs {
            address: vec![true, false, true],
            input: vec![false; 8],
            load: true,
        };
        assert!(ram.execute(ClockPhase::Tick, &short_word).is_err());
        assert!(ram.probe(&[true; 4]).is_err());
    }

    #[test]
    fn out_of_range_address() {
        assert_eq!(
            RamInputs::read(RamSize::Ram512, 512),
            Err(Error::AddressOutOfRange {
                address: 512,
                capacity: 512
            })
        );
    }
}
