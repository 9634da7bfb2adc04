use nand_kernel::codec::{from_twos_complement, to_twos_complement};
use nand_kernel::memory::{Ram, RamInputs, RamSize};
use nand_kernel::seq_logic::{Bit, Counter, CounterInputs, Dff, Load, Register};
use nand_kernel::{from_i16, to_i16, ClockPhase, Harness, HarnessConfig};

const SUB_TICKS: usize = 2;

#[test]
fn dff_delays_by_one_cycle() {
    let inputs = [false, false, true, true, false, true, false];
    let mut harness = Harness::new(Dff::new(), false);
    let mut observed = Vec::new();
    for &input in &inputs {
        harness.set_inputs(input);
        observed.push(*harness.cycle(1, SUB_TICKS).unwrap());
    }
    assert!(!observed[0], "first cycle shows the initial state");
    for t in 1..inputs.len() {
        assert_eq!(observed[t], inputs[t - 1], "cycle {}", t + 1);
    }
}

#[test]
fn dff_first_tick_is_initial_state() {
    let mut harness = Harness::new(Dff::new(), true);
    harness.cycle(2, SUB_TICKS).unwrap();
    let first = &harness.trace()[0];
    assert_eq!((first.cycle, first.phase, first.outputs), (1, ClockPhase::Tick, false));
    // Captured during the first Tock, visible from the second Tick
    assert!(!harness.trace()[1].outputs);
    assert!(harness.trace()[2].outputs);
}

#[test]
fn dff_holds_with_more_sub_ticks() {
    let mut harness = Harness::new(Dff::new(), true);
    harness.cycle(1, 5).unwrap();
    harness.set_inputs(false);
    assert_eq!(harness.cycle(1, 5), Ok(&true));
    assert_eq!(harness.cycle(1, 5), Ok(&false));
}

#[test]
fn counter_regression_scenario() {
    let mut harness = Harness::new(Counter::new(), CounterInputs::hold());
    harness.set_inputs(CounterInputs::inc());
    harness.cycle(3, SUB_TICKS).unwrap();
    harness.set_inputs(CounterInputs::load(to_twos_complement(17, 16).unwrap()));
    harness.cycle(1, SUB_TICKS).unwrap();
    harness.set_inputs(CounterInputs::inc());
    harness.cycle(5, SUB_TICKS).unwrap();
    harness.set_inputs(CounterInputs::hold());
    let out = harness.cycle(2, SUB_TICKS).unwrap();
    assert_eq!(from_twos_complement(out), Ok(22));
}

#[test]
fn counter_reset_wins() {
    let mut harness = Harness::new(Counter::new(), CounterInputs::load(from_i16(100)));
    harness.cycle(2, SUB_TICKS).unwrap();
    harness.set_inputs(CounterInputs {
        input: from_i16(7),
        inc: true,
        load: true,
        reset: true,
    });
    harness.cycle(1, SUB_TICKS).unwrap();
    harness.set_inputs(CounterInputs::hold());
    assert_eq!(harness.cycle(1, SUB_TICKS), Ok(&from_i16(0)));
}

#[test]
fn hold_is_idempotent() {
    let config = HarnessConfig::default();

    let mut bit = Harness::new(Bit::new(), Load::new(true, true));
    bit.run(1, config).unwrap();
    bit.set_inputs(Load::new(false, false));
    bit.run(1, config).unwrap();
    for _ in 0..5 {
        assert_eq!(bit.run(1, config), Ok(&true));
    }

    let mut register = Harness::new(Register::new(), Load::new(from_i16(-1234), true));
    register.run(1, config).unwrap();
    register.set_inputs(Load::new(from_i16(99), false));
    register.run(1, config).unwrap();
    for _ in 0..5 {
        assert_eq!(register.run(1, config), Ok(&from_i16(-1234)));
    }

    let mut counter = Harness::new(Counter::new(), CounterInputs::load(from_i16(321)));
    counter.run(1, config).unwrap();
    counter.set_inputs(CounterInputs::hold());
    counter.run(1, config).unwrap();
    for _ in 0..5 {
        assert_eq!(counter.run(1, config).map(|w| to_i16(w)), Ok(Ok(321)));
    }
}

fn write_then_read(size: RamSize, address: usize, value: i16) -> Harness<Ram> {
    let mut harness = Harness::new(
        Ram::new(size),
        RamInputs::new(size, address, from_i16(value), true).unwrap(),
    );
    harness.cycle(1, SUB_TICKS).unwrap();
    harness.set_inputs(RamInputs::read(size, address).unwrap());
    assert_eq!(harness.cycle(1, SUB_TICKS), Ok(&from_i16(value)));
    harness
}

#[test]
fn ram8_read_after_write() {
    let size = RamSize::Ram8;
    let mut harness = write_then_read(size, 5, 15);
    harness.set_inputs(RamInputs::read(size, 7).unwrap());
    assert_eq!(harness.cycle(1, SUB_TICKS), Ok(&from_i16(0)));
    harness.set_inputs(RamInputs::read(size, 5).unwrap());
    assert_eq!(harness.cycle(1, SUB_TICKS), Ok(&from_i16(15)));
}

#[test]
fn ram64_read_after_write() {
    let size = RamSize::Ram64;
    let mut harness = write_then_read(size, 5, 15);
    for untouched in [7, 13, 45, 63] {
        harness.set_inputs(RamInputs::read(size, untouched).unwrap());
        assert_eq!(harness.cycle(1, SUB_TICKS), Ok(&from_i16(0)), "address {}", untouched);
    }
    let ram = &harness.chips()[0];
    assert_eq!(
        ram.probe(&RamInputs::read(size, 5).unwrap().address),
        Ok(from_i16(15))
    );
}

#[test]
fn ram64_keeps_many_words() {
    let size = RamSize::Ram64;
    let mut harness = Harness::new(Ram::new(size), RamInputs::read(size, 0).unwrap());
    for address in (0..64).step_by(9) {
        harness.set_inputs(RamInputs::new(size, address, from_i16(address as i16 * -3), true).unwrap());
        harness.cycle(1, SUB_TICKS).unwrap();
    }
    for address in (0..64).step_by(9) {
        harness.set_inputs(RamInputs::read(size, address).unwrap());
        assert_eq!(
            harness.cycle(1, SUB_TICKS),
            Ok(&from_i16(address as i16 * -3))
        );
    }
}

#[test]
fn ram512_and_ram4k_read_after_write() {
    write_then_read(RamSize::Ram512, 300, -42);
    write_then_read(RamSize::Ram4K, 4095, 4095);
}

#[test]
fn ram16k_read_after_write() {
    let harness = write_then_read(RamSize::Ram16K, 12345, -32768);
    let ram = &harness.chips()[0];
    let other = RamInputs::read(RamSize::Ram16K, 12344).unwrap();
    assert_eq!(ram.probe(&other.address), Ok(from_i16(0)));
}

#[test]
fn ram_refuses_one_sub_tick() {
    let size = RamSize::Ram8;
    let mut harness = Harness::new(
        Ram::new(size),
        RamInputs::new(size, 5, from_i16(15), true).unwrap(),
    );
    assert!(harness.cycle(1, 1).is_err());
    assert_eq!(harness.cycles(), 0);
    harness.cycle(1, SUB_TICKS).unwrap();
    harness.set_inputs(RamInputs::read(size, 5).unwrap());
    assert_eq!(harness.cycle(1, SUB_TICKS), Ok(&from_i16(15)));
}
