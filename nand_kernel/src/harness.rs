//! # Test Harness
//!
//! Drives chips through clock cycles. A harness owns its chips, the inputs fed to them and the
//! outputs of the last step. State stays in the chips; the harness only sequences them.
//!
//! Each cycle runs the Tick phase, then the Tock phase. Each phase repeats `execute` for a
//! number of sub-ticks so that latches can settle; fewer than [Chip::min_sub_ticks] of any
//! driven chip is refused. A [Sample] is recorded at the end of every phase until
//! [Harness::clear_trace] drops them.
//!
//! Several chips of the same type can be chained. The first one gets the harness inputs and
//! each following chip gets the inputs built by a [Feed] from the previous chip's output.

use std::fmt::Debug;

use tracing::{debug, trace};

use crate::clock::{Chip, ClockPhase};
use crate::error::Error;

/// Harness settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Repeated `execute` calls per clock phase. An SR latch needs two to change state.
    pub sub_ticks_per_phase: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sub_ticks_per_phase: 2,
        }
    }
}

/// Outputs observed at the end of one clock phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample<O> {
    pub cycle: usize,
    pub phase: ClockPhase,
    pub outputs: O,
}

/// Builds a chained chip's inputs from the previous chip's output and the harness inputs.
pub type Feed<C> = fn(&<C as Chip>::Output, &<C as Chip>::Input) -> <C as Chip>::Input;

/// The cycle driver.
///
/// # Examples
/// ```
/// use nand_kernel::{seq_logic::Dff, Harness};
/// // Two flip-flops in series delay by two cycles
/// let mut harness = Harness::chain(vec![Dff::new(), Dff::new()], |&q, _| q, true)?;
/// assert_eq!(harness.cycle(2, 2)?, &false);
/// harness.set_inputs(false);
/// assert_eq!(harness.cycle(1, 2)?, &true);
/// assert_eq!(harness.cycle(1, 2)?, &true);
/// assert_eq!(harness.cycle(1, 2)?, &false);
/// # Ok::<(), nand_kernel::Error>(())
/// ```
pub struct Harness<C: Chip> {
    chips: Vec<C>,
    feed: Option<Feed<C>>,
    inputs: C::Input,
    outputs: C::Output,
    cycles: usize,
    trace: Vec<Sample<C::Output>>,
}

impl<C> Harness<C>
where
    C: Chip,
    C::Input: Debug,
    C::Output: Clone + Debug,
{
    /// Harness around a single chip.
    pub fn new(chip: C, inputs: C::Input) -> Self {
        Self {
            outputs: chip.outputs().clone(),
            chips: vec![chip],
            feed: None,
            inputs,
            cycles: 0,
            trace: Vec::new(),
        }
    }

    /// Harness around chips in series. Outputs are the outputs of the last chip.
    pub fn chain(chips: Vec<C>, feed: Feed<C>, inputs: C::Input) -> Result<Self, Error> {
        let outputs = chips.last().ok_or(Error::EmptyInput)?.outputs().clone();
        Ok(Self {
            chips,
            feed: Some(feed),
            inputs,
            outputs,
            cycles: 0,
            trace: Vec::new(),
        })
    }

    pub fn set_inputs(&mut self, inputs: C::Input) -> &mut Self {
        self.inputs = inputs;
        self
    }

    pub fn inputs(&self) -> &C::Input {
        &self.inputs
    }

    /// Outputs at the end of the last phase run.
    pub fn outputs(&self) -> &C::Output {
        &self.outputs
    }

    pub fn chips(&self) -> &[C] {
        &self.chips
    }

    /// Number of complete cycles run so far.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// One sample per phase run, oldest first.
    pub fn trace(&self) -> &[Sample<C::Output>] {
        &self.trace
    }

    /// Drops the recorded samples. Cycle numbering carries on.
    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Fewest sub-ticks per phase every chip in the harness settles in, at least one.
    pub fn min_sub_ticks(&self) -> usize {
        self.chips
            .iter()
            .map(Chip::min_sub_ticks)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Runs `cycles` full Tick and Tock pairs, holding each phase for `sub_ticks_per_phase`
    /// executions. Fails with [Error::NoSubTicks] below [Harness::min_sub_ticks], before any
    /// chip runs.
    pub fn cycle(&mut self, cycles: usize, sub_ticks_per_phase: usize) -> Result<&C::Output, Error> {
        let required = self.min_sub_ticks();
        if sub_ticks_per_phase < required {
            return Err(Error::NoSubTicks {
                required,
                given: sub_ticks_per_phase,
            });
        }
        for _ in 0..cycles {
            let cycle = self.cycles + 1;
            for phase in [ClockPhase::Tick, ClockPhase::Tock] {
                for sub_tick in 0..sub_ticks_per_phase {
                    trace!(cycle, ?phase, sub_tick, "step");
                    self.step(cycle, phase)?;
                }
                self.trace.push(Sample {
                    cycle,
                    phase,
                    outputs: self.outputs.clone(),
                });
            }
            self.cycles = cycle;
            debug!(cycle, outputs = ?self.outputs, "cycle complete");
        }
        Ok(&self.outputs)
    }

    /// [Harness::cycle] with the settings of a [HarnessConfig].
    pub fn run(&mut self, cycles: usize, config: HarnessConfig) -> Result<&C::Output, Error> {
        self.cycle(cycles, config.sub_ticks_per_phase)
    }

    fn step(&mut self, cycle: usize, phase: ClockPhase) -> Result<(), Error> {
        let mut previous: Option<C::Output> = None;
        for (index, chip) in self.chips.iter_mut().enumerate() {
            let output = match (previous.as_ref(), self.feed) {
                (Some(previous), Some(feed)) => {
                    let wired = feed(previous, &self.inputs);
                    chip.execute(phase, &wired)
                        .map_err(|e| report(e, cycle, phase, chip.name(), index, &wired))
                }
                _ => chip
                    .execute(phase, &self.inputs)
                    .map_err(|e| report(e, cycle, phase, chip.name(), index, &self.inputs)),
            }?;
            previous = Some(output);
        }
        if let Some(output) = previous {
            self.outputs = output;
        }
        Ok(())
    }
}

fn report(
    source: Error,
    cycle: usize,
    phase: ClockPhase,
    chip: &'static str,
    index: usize,
    inputs: &impl Debug,
) -> Error {
    Error::Cycle {
        cycle,
        phase,
        chip,
        index,
        inputs: format!("{:?}", inputs),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Gate;
    use crate::seq_logic::{Counter, CounterInputs, Dff, Load, Register};

    #[test]
    fn zero_sub_ticks_rejected() {
        let mut harness = Harness::new(Dff::new(), true);
        assert_eq!(
            harness.cycle(1, 0),
            Err(Error::NoSubTicks {
                required: 2,
                given: 0
            })
        );
        assert_eq!(harness.cycles(), 0);
    }

    #[test]
    fn one_sub_tick_rejected_for_latches() {
        let mut harness = Harness::new(Dff::new(), true);
        assert_eq!(harness.min_sub_ticks(), 2);
        assert_eq!(
            harness.cycle(1, 1),
            Err(Error::NoSubTicks {
                required: 2,
                given: 1
            })
        );
        assert!(harness.trace().is_empty());

        let mut counter = Harness::new(Counter::new(), CounterInputs::inc());
        assert!(counter.cycle(5, 1).is_err());
        let mut register = Harness::new(Register::new(), Load::new(vec![true; 16], true));
        assert!(register.run(1, HarnessConfig { sub_ticks_per_phase: 1 }).is_err());
    }

    #[test]
    fn gates_settle_in_one_sub_tick() {
        let or = |&[a, b]: &[bool; 2]| -> Result<bool, Error> { Ok(crate::gates::or_gate(a, b)) };
        let mut harness = Harness::new(Gate::new("Or", or), [true, false]);
        assert_eq!(harness.min_sub_ticks(), 1);
        assert_eq!(harness.cycle(1, 1), Ok(&true));
        assert_eq!(
            harness.cycle(1, 0),
            Err(Error::NoSubTicks {
                required: 1,
                given: 0
            })
        );
    }

    #[test]
    fn clear_trace_keeps_counting() {
        let mut harness = Harness::new(Dff::new(), true);
        harness.cycle(2, 2).unwrap();
        harness.clear_trace();
        assert!(harness.trace().is_empty());
        harness.cycle(1, 2).unwrap();
        assert_eq!(harness.trace().len(), 2);
        assert_eq!(harness.trace()[0].cycle, 3);
        assert_eq!(harness.cycles(), 3);
    }

    #[test]
    fn empty_chain_rejected() {
        assert!(Harness::<Dff>::chain(Vec::new(), |&q, _| q, true).is_err());
    }

    #[test]
    fn trace_has_one_sample_per_phase() {
        let mut harness = Harness::new(Dff::new(), true);
        harness.run(3, HarnessConfig::default()).unwrap();
        let phases: Vec<(usize, ClockPhase)> =
            harness.trace().iter().map(|s| (s.cycle, s.phase)).collect();
        assert_eq!(
            phases,
            [
                (1, ClockPhase::Tick),
                (1, ClockPhase::Tock),
                (2, ClockPhase::Tick),
                (2, ClockPhase::Tock),
                (3, ClockPhase::Tick),
                (3, ClockPhase::Tock),
            ]
        );
        assert_eq!(harness.cycles(), 3);
    }

    #[test]
    fn error_names_cycle_and_chip() {
        let mut harness = Harness::new(Register::new(), Load::new(vec![true; 16], true));
        harness.cycle(2, 2).unwrap();
        harness.set_inputs(Load::new(vec![true; 15], true));
        match harness.cycle(1, 2) {
            Err(Error::Cycle {
                cycle,
                phase,
                chip,
                index,
                inputs,
                source,
            }) => {
                assert_eq!(cycle, 3);
                assert_eq!(phase, ClockPhase::Tick);
                assert_eq!(chip, "Register");
                assert_eq!(index, 0);
                assert!(inputs.contains("load: true"));
                assert_eq!(
                    *source,
                    Error::DimensionMismatch {
                        expected: 16,
                        actual: 15
                    }
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn chained_gates_see_previous_output() {
        let not = |&[a, _]: &[bool; 2]| -> Result<bool, Error> { Ok(crate::gates::not_gate(a)) };
        let chips = vec![Gate::new("Not", not), Gate::new("Not", not)];
        let mut harness = Harness::chain(chips, |&out, inputs| [out, inputs[1]], [true, false])
            .unwrap();
        assert_eq!(harness.cycle(1, 1), Ok(&true));
    }
}
