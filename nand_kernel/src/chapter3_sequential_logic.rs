//! # Sequential Logic
//!
//! Clock-driven chips. The only state kept in a Rust primitive is the `(q, notQ)` pair of the
//! [SrLatch]. Every other sequential chip keeps its state in latches it owns.
//!
//! ## Notes on propagation delay
//! A latch computes its new pair from the pair it retained on the previous `execute`, never from
//! the pair it is computing. One `execute` is one gate delay. A latch needs two steps to move
//! from one stable state to the other (it passes through `q == notQ` on the way), so every
//! clock phase must be held for at least two sub-ticks; see [HarnessConfig][crate::HarnessConfig].
//!
//! ## Notes on cycles
//! The [RsFlipFlop] runs its master latch on the given phase and its slave on the flipped one.
//! The master is transparent during Tock and the slave during Tick, so what the master captured
//! during Tock shows up at the output only after the falling edge (Tock to Tick). This gives
//! [Dff] its contract: the output during cycle `t` is the input of cycle `t - 1`.
//!
//! ## Note on the initial state
//! Latches start in the stable "stores 0" state `(q, notQ) = (0, 1)`. Starting at `(0, 0)` would
//! already break `q != notQ` and flip between `(0, 0)` and `(1, 1)` while held.

use tracing::warn;

use crate::clock::{Chip, ClockPhase};
use crate::error::{ensure_width, Error};
use crate::{arithmetic, gates, Word, WORD_WIDTH};

/// The cross-coupled NAND latch. Inputs `[s, r]` are active low: 0 asserts the line.
///
/// Asserting both at once is the forbidden state of the latch and fails with
/// [InvalidControlState][Error::InvalidControlState]; the retained pair is left untouched.
///
/// # Examples
/// ```
/// use nand_kernel::{seq_logic::SrLatch, Chip, ClockPhase::Tick};
/// let mut latch = SrLatch::new();
/// assert_eq!(latch.outputs(), &[false, true]);
/// latch.execute(Tick, &[false, true]).unwrap();
/// assert_eq!(latch.execute(Tick, &[false, true]), Ok([true, false]));
/// // Released, it holds
/// assert_eq!(latch.execute(Tick, &[true, true]), Ok([true, false]));
/// assert!(latch.execute(Tick, &[false, false]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SrLatch {
    state: [bool; 2],
}

impl SrLatch {
    pub fn new() -> Self {
        Self {
            state: [false, true],
        }
    }
}

impl Default for SrLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip for SrLatch {
    /// `[s, r]`, active low
    type Input = [bool; 2];
    /// `[q, notQ]`
    type Output = [bool; 2];

    fn name(&self) -> &'static str {
        "SrLatch"
    }

    fn execute(&mut self, _phase: ClockPhase, input: &[bool; 2]) -> Result<[bool; 2], Error> {
        let [s, r] = *input;
        if !s && !r {
            warn!(state = ?self.state, "set and reset asserted together");
            return Err(Error::InvalidControlState { chip: self.name() });
        }
        let [q, not_q] = self.state;
        self.state = [gates::nand_gate(s, not_q), gates::nand_gate(q, r)];
        Ok(self.state)
    }

    fn outputs(&self) -> &[bool; 2] {
        &self.state
    }

    /// One step reaches `q == notQ`, the second the new stable pair.
    fn min_sub_ticks(&self) -> usize {
        2
    }
}

/// An [SrLatch] that only listens while the clock is high. Inputs `[s, r]` are active high and
/// are NANDed with the clock bit before reaching the latch.
#[derive(Debug, Clone, Default)]
pub struct ClockedSrLatch {
    latch: SrLatch,
}

impl ClockedSrLatch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Chip for ClockedSrLatch {
    type Input = [bool; 2];
    type Output = [bool; 2];

    fn name(&self) -> &'static str {
        "ClockedSrLatch"
    }

    fn execute(&mut self, phase: ClockPhase, input: &[bool; 2]) -> Result<[bool; 2], Error> {
        let clock = phase.to_bit();
        let [s, r] = *input;
        self.latch.execute(
            phase,
            &[gates::nand_gate(s, clock), gates::nand_gate(r, clock)],
        )
    }

    fn outputs(&self) -> &[bool; 2] {
        self.latch.outputs()
    }

    fn min_sub_ticks(&self) -> usize {
        self.latch.min_sub_ticks()
    }
}

/// Master-slave flip-flop. Commits on the falling edge.
#[derive(Debug, Clone, Default)]
pub struct RsFlipFlop {
    master: ClockedSrLatch,
    slave: ClockedSrLatch,
}

impl RsFlipFlop {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Chip for RsFlipFlop {
    type Input = [bool; 2];
    type Output = [bool; 2];

    fn name(&self) -> &'static str {
        "RsFlipFlop"
    }

    fn execute(&mut self, phase: ClockPhase, input: &[bool; 2]) -> Result<[bool; 2], Error> {
        let master = self.master.execute(phase, input)?;
        self.slave.execute(phase.flip(), &master)
    }

    fn outputs(&self) -> &[bool; 2] {
        self.slave.outputs()
    }

    fn min_sub_ticks(&self) -> usize {
        self.master.min_sub_ticks().max(self.slave.min_sub_ticks())
    }
}

/// The Data Flip Flop: an [RsFlipFlop] fed `(d, NOT(d))`. Output during cycle `t` is the input
/// of cycle `t - 1`.
///
/// # Examples
/// ```
/// use nand_kernel::{seq_logic::Dff, Chip, ClockPhase::{Tick, Tock}};
/// let mut dff = Dff::new();
/// for phase in [Tick, Tick, Tock, Tock] {
///     dff.execute(phase, &true).unwrap();
/// }
/// // Not yet past the falling edge
/// assert_eq!(dff.outputs(), &false);
/// dff.execute(Tick, &false).unwrap();
/// assert_eq!(dff.execute(Tick, &false), Ok(true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dff {
    flip_flop: RsFlipFlop,
}

impl Dff {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Chip for Dff {
    type Input = bool;
    type Output = bool;

    fn name(&self) -> &'static str {
        "Dff"
    }

    fn execute(&mut self, phase: ClockPhase, d: &bool) -> Result<bool, Error> {
        let [q, _] = self.flip_flop.execute(phase, &[*d, gates::not_gate(*d)])?;
        Ok(q)
    }

    fn outputs(&self) -> &bool {
        &self.flip_flop.outputs()[0]
    }

    fn min_sub_ticks(&self) -> usize {
        self.flip_flop.min_sub_ticks()
    }
}

/// Input of chips with a `load` control bit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Load<T> {
    pub input: T,
    pub load: bool,
}

impl<T> Load<T> {
    pub fn new(input: T, load: bool) -> Self {
        Self { input, load }
    }
}

/// The 1-bit register. With `load` set the input is stored, otherwise the [Dff] is fed its own
/// output and holds.
///
/// # Examples
/// ```
/// use nand_kernel::{seq_logic::{Bit, Load}, Harness};
/// let mut harness = Harness::new(Bit::new(), Load::new(true, true));
/// assert_eq!(harness.cycle(1, 2), Ok(&false));
/// harness.set_inputs(Load::new(false, false));
/// assert_eq!(harness.cycle(3, 2), Ok(&true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bit {
    dff: Dff,
}

impl Bit {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Chip for Bit {
    type Input = Load<bool>;
    type Output = bool;

    fn name(&self) -> &'static str {
        "Bit"
    }

    fn execute(&mut self, phase: ClockPhase, input: &Load<bool>) -> Result<bool, Error> {
        let d = gates::multiplexor_gate(*self.dff.outputs(), input.input, input.load);
        self.dff.execute(phase, &d)
    }

    fn outputs(&self) -> &bool {
        self.dff.outputs()
    }

    fn min_sub_ticks(&self) -> usize {
        self.dff.min_sub_ticks()
    }
}

/// The 16-bit Register. Same idea as [Bit], one per position, all sharing `load`.
#[derive(Debug, Clone)]
pub struct Register {
    bits: Vec<Bit>,
    outputs: Word,
}

impl Register {
    pub fn new() -> Self {
        Self {
            bits: vec![Bit::new(); WORD_WIDTH],
            outputs: vec![false; WORD_WIDTH],
        }
    }
}

impl Default for Register {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip for Register {
    type Input = Load<Word>;
    type Output = Word;

    fn name(&self) -> &'static str {
        "Register"
    }

    fn execute(&mut self, phase: ClockPhase, input: &Load<Word>) -> Result<Word, Error> {
        ensure_width(&input.input, WORD_WIDTH)?;
        for ((bit, &value), out) in self
            .bits
            .iter_mut()
            .zip(&input.input)
            .zip(self.outputs.iter_mut())
        {
            *out = bit.execute(phase, &Load::new(value, input.load))?;
        }
        Ok(self.outputs.clone())
    }

    fn outputs(&self) -> &Word {
        &self.outputs
    }

    // All bits are alike
    fn min_sub_ticks(&self) -> usize {
        self.bits.first().map_or(1, Chip::min_sub_ticks)
    }
}

/// Input of the [Counter].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterInputs {
    pub input: Word,
    pub inc: bool,
    pub load: bool,
    pub reset: bool,
}

impl CounterInputs {
    /// All control bits low: the counter holds.
    pub fn hold() -> Self {
        Self {
            input: vec![false; WORD_WIDTH],
            inc: false,
            load: false,
            reset: false,
        }
    }

    pub fn inc() -> Self {
        Self {
            inc: true,
            ..Self::hold()
        }
    }

    pub fn load(input: Word) -> Self {
        Self {
            input,
            load: true,
            ..Self::hold()
        }
    }

    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::hold()
        }
    }
}

/// The Counter. Starts at 0. Each cycle, in priority order:
/// * `reset` is set: next cycle will be 0
/// * `load` is set: next cycle will be the input
/// * `inc` is set: next cycle will be one more
/// * otherwise it holds
///
/// # Examples
/// ```
/// use nand_kernel::{from_i16, seq_logic::{Counter, CounterInputs}, Harness};
/// let mut harness = Harness::new(Counter::new(), CounterInputs::load(from_i16(41)));
/// harness.cycle(1, 2).unwrap();
/// harness.set_inputs(CounterInputs::inc());
/// // Shows the loaded 41 while 42 is captured
/// assert_eq!(harness.cycle(1, 2), Ok(&from_i16(41)));
/// harness.set_inputs(CounterInputs::hold());
/// assert_eq!(harness.cycle(1, 2), Ok(&from_i16(42)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Counter {
    count: Register,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Chip for Counter {
    type Input = CounterInputs;
    type Output = Word;

    fn name(&self) -> &'static str {
        "Counter"
    }

    fn execute(&mut self, phase: ClockPhase, input: &CounterInputs) -> Result<Word, Error> {
        ensure_width(&input.input, WORD_WIDTH)?;
        let current = self.count.outputs();
        let next = arithmetic::increment(current);
        let mut new = gates::multiplexor_multibit_gate(current, &next, input.inc)?;
        new = gates::multiplexor_multibit_gate(&new, &input.input, input.load)?;
        new = gates::multiplexor_multibit_gate(&new, &[false; WORD_WIDTH], input.reset)?;
        let write = gates::or_gate(input.reset, gates::or_gate(input.load, input.inc));
        self.count.execute(phase, &Load::new(new, write))
    }

    fn outputs(&self) -> &Word {
        self.count.outputs()
    }

    fn min_sub_ticks(&self) -> usize {
        self.count.min_sub_ticks()
    }
}
