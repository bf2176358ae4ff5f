//! Command-line interface for running 3-bit register computer programs

mod cli;
mod config;
mod error;
mod input;
mod output;

use aoc_computer::{Machine, QuineSearch, Registers};
use clap::Parser;
use cli::Args;
use config::{Config, QuineMode, RegisterOverrides, Task};
use error::CliError;
use output::{OutputFormatter, Timed};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    let filter_layer = match EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
    {
        Ok(layer) => layer,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_args(args)?;
    let formatter = OutputFormatter::new(config.quiet);

    match config.task {
        Task::Run {
            input,
            overrides,
            max_outputs,
            step_limit,
        } => run_program(&formatter, &input, overrides, max_outputs, step_limit),
        Task::Disassemble { input } => {
            let loaded = input::load_program(&input)?;
            formatter.print_disassembly(&loaded.program.disassemble());
            Ok(())
        }
        Task::Quine {
            input,
            mode,
            thread_count,
            step_limit,
        } => search_quine(&formatter, &input, mode, thread_count, step_limit),
    }
}

/// Load a program file, apply register overrides and run it
fn run_program(
    formatter: &OutputFormatter,
    path: &Path,
    overrides: RegisterOverrides,
    max_outputs: Option<usize>,
    step_limit: u64,
) -> Result<(), CliError> {
    let parsed = Timed::measure(|| input::load_program(path));
    let parse_time = parsed.duration();
    let loaded = parsed.value?;

    let registers = overrides.apply(loaded.registers);
    info!(
        a = registers.a,
        b = registers.b,
        c = registers.c,
        words = loaded.program.len(),
        "running program"
    );

    let mut machine = Machine::new(&loaded.program, registers).with_step_limit(step_limit);
    let result = Timed::measure(|| machine.run_until(max_outputs));
    let run_time = result.duration();

    match result.value {
        Ok(reason) => {
            formatter.print_run(
                &machine.output(),
                reason,
                machine.steps(),
                parse_time,
                run_time,
            );
            Ok(())
        }
        Err(e) => {
            warn!(
                ip = machine.ip(),
                steps = machine.steps(),
                step_limit = machine.step_limit(),
                output = %machine.output(),
                "run faulted"
            );
            Err(e.into())
        }
    }
}

/// Search for seeds of A that make the program print itself
fn search_quine(
    formatter: &OutputFormatter,
    path: &Path,
    mode: QuineMode,
    thread_count: usize,
    step_limit: u64,
) -> Result<(), CliError> {
    let loaded = input::load_program(path)?;
    let Registers { b, c, .. } = loaded.registers;
    let search = QuineSearch::new(&loaded.program)
        .with_registers(b, c)
        .with_step_limit(step_limit);

    match mode {
        QuineMode::Probe(a) => {
            let matching = search.matching_prefix_len(a)?;
            formatter.print_probe(a, matching, loaded.program.len());
            Ok(())
        }
        QuineMode::Minimal => {
            let found = Timed::measure(|| search.find_minimal());
            let search_time = found.duration();
            let seed = found.value?.ok_or_else(|| CliError::NoSeed {
                path: path.to_path_buf(),
            })?;
            formatter.print_seeds(&[seed], search_time);
            Ok(())
        }
        QuineMode::All => {
            let thread_pool = rayon::ThreadPoolBuilder::new()
                .num_threads(thread_count)
                .build()?;
            let found = Timed::measure(|| thread_pool.install(|| search.find_all()));
            let search_time = found.duration();
            let seeds = found.value?;
            if seeds.is_empty() {
                return Err(CliError::NoSeed {
                    path: path.to_path_buf(),
                });
            }
            formatter.print_seeds(&seeds, search_time);
            Ok(())
        }
    }
}
