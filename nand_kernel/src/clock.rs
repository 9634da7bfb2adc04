//! # Clock and Chips
//!
//! One clock cycle is a [Tick][ClockPhase::Tick] followed by a [Tock][ClockPhase::Tock]. Chips
//! see the phase as a bit through [ClockPhase::to_bit]: Tick is low, Tock is high.
//!
//! A [Chip] owns its state and changes it only inside [Chip::execute]. A parent chip owns its
//! children by value, so a composition is always a tree.

use crate::error::Error;

/// The two half-phases of a clock cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockPhase {
    Tick,
    Tock,
}

impl ClockPhase {
    /// The other phase.
    ///
    /// # Examples
    /// ```
    /// use nand_kernel::ClockPhase;
    /// assert_eq!(ClockPhase::Tick.flip(), ClockPhase::Tock);
    /// assert_eq!(ClockPhase::Tock.flip(), ClockPhase::Tick);
    /// ```
    pub fn flip(self) -> Self {
        match self {
            Self::Tick => Self::Tock,
            Self::Tock => Self::Tick,
        }
    }

    /// Clock line level during this phase.
    pub fn to_bit(self) -> bool {
        match self {
            Self::Tick => false,
            Self::Tock => true,
        }
    }
}

/// A component driven by the clock.
///
/// `execute` runs the chip for one half-cycle step and returns the new outputs, which the chip
/// also retains until the next call. `outputs` reads the retained value without running the
/// chip.
pub trait Chip {
    type Input;
    type Output;

    /// Chip type name, used in error reports.
    fn name(&self) -> &'static str;

    fn execute(&mut self, phase: ClockPhase, input: &Self::Input) -> Result<Self::Output, Error>;

    fn outputs(&self) -> &Self::Output;

    /// Fewest `execute` calls per clock phase that let the chip settle. Combinational chips
    /// settle in one; anything holding an [SrLatch][crate::seq_logic::SrLatch] needs two.
    fn min_sub_ticks(&self) -> usize {
        1
    }
}

/// Wraps a combinational function as a [Chip]. The clock phase is ignored.
///
/// # Examples
/// ```
/// use nand_kernel::{clock::Gate, gates, Chip, ClockPhase};
/// let mut xor = Gate::new("Xor", |&[a, b]: &[bool; 2]| Ok(gates::xor_gate(a, b)));
/// assert_eq!(xor.outputs(), &false);
/// assert_eq!(xor.execute(ClockPhase::Tick, &[true, false]), Ok(true));
/// assert_eq!(xor.outputs(), &true);
/// ```
pub struct Gate<I, O> {
    name: &'static str,
    logic: fn(&I) -> Result<O, Error>,
    outputs: O,
}

impl<I, O: Default> Gate<I, O> {
    pub fn new(name: &'static str, logic: fn(&I) -> Result<O, Error>) -> Self {
        Self {
            name,
            logic,
            outputs: O::default(),
        }
    }
}

impl<I, O: Clone> Chip for Gate<I, O> {
    type Input = I;
    type Output = O;

    fn name(&self) -> &'static str {
        self.name
    }

    fn execute(&mut self, _phase: ClockPhase, input: &I) -> Result<O, Error> {
        self.outputs = (self.logic)(input)?;
        Ok(self.outputs.clone())
    }

    fn outputs(&self) -> &O {
        &self.outputs
    }
}
