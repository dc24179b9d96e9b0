//! Command-line entry point: wires the loader, the machine, and the dump
//! helpers together. None of the engineering here is in the core — it's
//! argument parsing and sequencing, same role `main.rs` plays in the
//! teacher repo this crate grew from.

use std::process::ExitCode;

use clap::Parser;
use slimvm::{dump, loader, machine::Machine, vm};

/// Run a slimvm bytecode file.
#[derive(Debug, Parser)]
#[command(name = "slimvm", version, about)]
struct Cli {
    /// Path to a bytecode file (a flat sequence of 9-byte instruction records).
    path: std::path::PathBuf,

    /// Print the stack after the run finishes, whether it halted or faulted.
    #[arg(long)]
    dump_stack: bool,

    /// Print the register file after the run finishes.
    #[arg(long)]
    dump_registers: bool,

    /// Print heap cells and the block chain after the run finishes.
    #[arg(long)]
    dump_memory: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .init();

    let cli = Cli::parse();

    let bytes = match loader::load_file(&cli.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(%err, path = %cli.path.display(), "failed to load bytecode");
            return ExitCode::FAILURE;
        }
    };

    let mut machine = Machine::new();
    if let Err(kind) = machine.load(bytes) {
        tracing::error!(%kind, "bytecode rejected");
        return ExitCode::FAILURE;
    }

    let outcome = vm::launch(&mut machine);

    if cli.dump_stack {
        print!("{}", dump::dump_stack(&machine));
    }
    if cli.dump_registers {
        print!("{}", dump::dump_registers(&machine));
    }
    if cli.dump_memory {
        print!("{}", dump::dump_memory(&machine));
    }

    match outcome {
        vm::ExecutionOutcome::Halted => ExitCode::SUCCESS,
        vm::ExecutionOutcome::Faulted(kind) => {
            tracing::error!(%kind, "machine faulted");
            ExitCode::FAILURE
        }
    }
}
