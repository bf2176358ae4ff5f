//! Configuration resolution from CLI args

use crate::cli::{Args, Command};
use crate::error::CliError;
use aoc_computer::{DEFAULT_STEP_LIMIT, Registers};
use std::path::{Path, PathBuf};

/// Register values given on the command line, applied over the file's values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOverrides {
    pub a: Option<i64>,
    pub b: Option<i64>,
    pub c: Option<i64>,
}

impl RegisterOverrides {
    pub fn apply(&self, registers: Registers) -> Registers {
        Registers {
            a: self.a.unwrap_or(registers.a),
            b: self.b.unwrap_or(registers.b),
            c: self.c.unwrap_or(registers.c),
        }
    }
}

/// What a quine search should report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuineMode {
    Minimal,
    All,
    Probe(i64),
}

/// The resolved command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Run {
        input: PathBuf,
        overrides: RegisterOverrides,
        max_outputs: Option<usize>,
        step_limit: u64,
    },
    Disassemble {
        input: PathBuf,
    },
    Quine {
        input: PathBuf,
        mode: QuineMode,
        thread_count: usize,
        step_limit: u64,
    },
}

/// Resolved runtime configuration
#[derive(Debug)]
pub struct Config {
    pub task: Task,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args, expanding paths and filling defaults
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        let task = match args.command {
            Command::Run {
                file,
                a,
                b,
                c,
                max_outputs,
                step_limit,
            } => Task::Run {
                input: expand_tilde(&file),
                overrides: RegisterOverrides { a, b, c },
                max_outputs,
                step_limit: resolve_step_limit(step_limit)?,
            },
            Command::Disasm { file } => Task::Disassemble {
                input: expand_tilde(&file),
            },
            Command::Quine {
                file,
                all,
                probe,
                threads,
                step_limit,
            } => Task::Quine {
                input: expand_tilde(&file),
                mode: match (all, probe) {
                    (_, Some(a)) => QuineMode::Probe(a),
                    (true, None) => QuineMode::All,
                    (false, None) => QuineMode::Minimal,
                },
                thread_count: resolve_thread_count(threads)?,
                step_limit: resolve_step_limit(step_limit)?,
            },
        };

        Ok(Config {
            task,
            quiet: args.quiet,
        })
    }
}

fn resolve_step_limit(step_limit: Option<u64>) -> Result<u64, CliError> {
    match step_limit {
        Some(0) => Err(CliError::Config("Step limit must be at least 1".to_string())),
        Some(limit) => Ok(limit),
        None => Ok(DEFAULT_STEP_LIMIT),
    }
}

fn resolve_thread_count(threads: Option<usize>) -> Result<usize, CliError> {
    match threads {
        Some(0) => Err(CliError::Config("Thread count must be at least 1".to_string())),
        Some(count) => Ok(count),
        None => Ok(num_cpus()),
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.get(2..).unwrap_or_default());
    }
    path.to_path_buf()
}

/// Get number of CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
