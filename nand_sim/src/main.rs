use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nand_interface::{cmp_io, Bit16};
use nand_kernel::clock::Gate;
use nand_kernel::memory::{Ram, RamInputs, RamSize};
use nand_kernel::seq_logic::{Counter, CounterInputs, Dff};
use nand_kernel::{codec, from_i16, gates, to_i16, Harness, HarnessConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nand_sim", version, about = "Drive NAND-built chips through clock cycles")]
struct Cli {
    /// Executions of each clock phase, at least 2 for every sequential chip
    #[arg(long, global = true, default_value_t = 2)]
    sub_ticks: usize,
    /// Log filter, RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    log: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a string of 0s and 1s to a flip-flop, one bit per cycle
    Dff { inputs: String },
    /// Increment three times, load 17, increment five times and hold
    Counter,
    /// Write a value into RAM and read it back
    Ram {
        #[arg(long, value_enum, default_value_t = Tier::Ram8)]
        size: Tier,
        #[arg(long)]
        address: usize,
        #[arg(long, allow_negative_numbers = true)]
        value: i16,
    },
    /// Run a gate against a comparison table
    Check {
        #[arg(long, value_enum)]
        chip: GateKind,
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Tier {
    Ram8,
    Ram64,
    Ram512,
    Ram4k,
    Ram16k,
}

impl From<Tier> for RamSize {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Ram8 => RamSize::Ram8,
            Tier::Ram64 => RamSize::Ram64,
            Tier::Ram512 => RamSize::Ram512,
            Tier::Ram4k => RamSize::Ram4K,
            Tier::Ram16k => RamSize::Ram16K,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GateKind {
    Nand,
    Not,
    And,
    Or,
    Xor,
    Mux,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = HarnessConfig {
        sub_ticks_per_phase: cli.sub_ticks,
    };
    match cli.command {
        Commands::Dff { inputs } => dff(&inputs, config),
        Commands::Counter => counter(config),
        Commands::Ram {
            size,
            address,
            value,
        } => ram(size.into(), address, value, config),
        Commands::Check { chip, file } => check(chip, &file, config),
    }
}

fn bit(b: bool) -> u8 {
    u8::from(b)
}

fn dff(inputs: &str, config: HarnessConfig) -> Result<()> {
    let inputs = codec::string_to_word(inputs).context("inputs must be 0s and 1s")?;
    let mut harness = Harness::new(Dff::new(), false);
    let mut out = cmp_io::Writer::new(std::io::stdout().lock());
    out.write_row(["time", "in", "out"])?;
    for input in inputs {
        harness.set_inputs(input);
        let q = *harness.run(1, config)?;
        out.write_row([harness.cycles() as u64, bit(input).into(), bit(q).into()])?;
    }
    Ok(())
}

fn counter(config: HarnessConfig) -> Result<()> {
    let steps = [
        (CounterInputs::inc(), 3),
        (CounterInputs::load(from_i16(17)), 1),
        (CounterInputs::inc(), 5),
        (CounterInputs::hold(), 2),
    ];
    let mut harness = Harness::new(Counter::new(), CounterInputs::hold());
    let mut out = cmp_io::Writer::new(std::io::stdout().lock());
    out.write_row(["time", "in", "reset", "load", "inc", "out"])?;
    for (inputs, cycles) in steps {
        debug!(?inputs, cycles, "counter step");
        harness.set_inputs(inputs);
        for _ in 0..cycles {
            let value = to_i16(harness.run(1, config)?)?;
            let inputs = harness.inputs();
            out.write_row([
                harness.cycles().to_string(),
                to_i16(&inputs.input)?.to_string(),
                bit(inputs.reset).to_string(),
                bit(inputs.load).to_string(),
                bit(inputs.inc).to_string(),
                value.to_string(),
            ])?;
        }
    }
    info!(value = to_i16(harness.outputs())?, "counter settled");
    Ok(())
}

fn ram(size: RamSize, address: usize, value: i16, config: HarnessConfig) -> Result<()> {
    let write = RamInputs::new(size, address, from_i16(value), true)?;
    let read = RamInputs::read(size, address)?;
    info!(?size, capacity = size.capacity(), "building memory");
    let mut harness = Harness::new(Ram::new(size), write);
    let mut out = cmp_io::Writer::new(std::io::stdout().lock());
    out.write_row(["time", "in", "load", "address", "out"])?;
    for inputs in [None, Some(read)] {
        if let Some(inputs) = inputs {
            harness.set_inputs(inputs);
        }
        let word = harness.run(1, config)?.clone();
        let inputs = harness.inputs();
        out.write_row([
            harness.cycles().to_string(),
            Bit16::try_from(inputs.input.as_slice())?.to_string(),
            bit(inputs.load).to_string(),
            address.to_string(),
            Bit16::try_from(word.as_slice())?.to_string(),
        ])?;
    }
    let stored = harness.chips()[0].probe(&harness.inputs().address)?;
    if to_i16(&stored)? != value {
        bail!("address {} holds {} after writing {}", address, to_i16(&stored)?, value);
    }
    Ok(())
}

fn gate(kind: GateKind) -> Gate<[bool; 3], bool> {
    match kind {
        GateKind::Nand => Gate::new("Nand", |&[a, b, _]: &[bool; 3]| Ok(gates::nand_gate(a, b))),
        GateKind::Not => Gate::new("Not", |&[a, _, _]: &[bool; 3]| Ok(gates::not_gate(a))),
        GateKind::And => Gate::new("And", |&[a, b, _]: &[bool; 3]| Ok(gates::and_gate(a, b))),
        GateKind::Or => Gate::new("Or", |&[a, b, _]: &[bool; 3]| Ok(gates::or_gate(a, b))),
        GateKind::Xor => Gate::new("Xor", |&[a, b, _]: &[bool; 3]| Ok(gates::xor_gate(a, b))),
        GateKind::Mux => Gate::new("Mux", |&[a, b, sel]: &[bool; 3]| {
            Ok(gates::multiplexor_gate(a, b, sel))
        }),
    }
}

fn gate_inputs(kind: GateKind, row: &cmp_io::Row) -> Result<[bool; 3], nand_interface::Error> {
    Ok(match kind {
        GateKind::Not => [row.bit("in")?, false, false],
        GateKind::Mux => [row.bit("a")?, row.bit("b")?, row.bit("sel")?],
        _ => [row.bit("a")?, row.bit("b")?, false],
    })
}

fn check(kind: GateKind, file: &Path, config: HarnessConfig) -> Result<()> {
    let handle = File::open(file).with_context(|| format!("cannot open {}", file.display()))?;
    let mut reader = cmp_io::Reader::new(BufReader::new(handle))?;
    let mut harness = Harness::new(gate(kind), [false; 3]);
    let mut rows = 0;
    for row in reader.rows() {
        let row = row?;
        harness.set_inputs(gate_inputs(kind, &row)?);
        let got = *harness.run(1, config)?;
        let expected = row.bit("out")?;
        if got != expected {
            bail!(
                "{}: line {}: expected out = {}, got {}",
                file.display(),
                row.line(),
                bit(expected),
                bit(got)
            );
        }
        rows += 1;
    }
    info!(rows, "comparison table passed");
    Ok(())
}
