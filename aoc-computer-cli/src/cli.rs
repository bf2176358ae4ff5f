//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 3-bit register computer runner
#[derive(Parser, Debug)]
#[command(name = "computer", about = "Run 3-bit register computer programs", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode - only output answers
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a program file and print its output
    Run {
        /// Program file (`Register A: ...` lines followed by `Program: ...`)
        file: PathBuf,

        /// Override register A from the file
        #[arg(short, long, allow_negative_numbers = true)]
        a: Option<i64>,

        /// Override register B from the file
        #[arg(short, long, allow_negative_numbers = true)]
        b: Option<i64>,

        /// Override register C from the file
        #[arg(short, long, allow_negative_numbers = true)]
        c: Option<i64>,

        /// Stop after this many output values
        #[arg(long)]
        max_outputs: Option<usize>,

        /// Maximum number of instructions to execute
        #[arg(long)]
        step_limit: Option<u64>,
    },

    /// Print the program as one instruction per line
    Disasm {
        /// Program file
        file: PathBuf,
    },

    /// Find an initial A that makes the program print itself
    Quine {
        /// Program file; its B and C registers are used for every candidate
        file: PathBuf,

        /// Print every seed instead of only the smallest
        #[arg(long, conflicts_with = "probe")]
        all: bool,

        /// Report how many leading outputs of this A match the program
        #[arg(long)]
        probe: Option<i64>,

        /// Number of threads for `--all`
        #[arg(long)]
        threads: Option<usize>,

        /// Maximum number of instructions per candidate run
        #[arg(long)]
        step_limit: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_negative_register_override() {
        let args = Args::try_parse_from(["computer", "run", "prog.txt", "-b", "-3"]).unwrap();
        match args.command {
            Command::Run { b, .. } => assert_eq!(b, Some(-3)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_all_conflicts_with_probe() {
        let result =
            Args::try_parse_from(["computer", "quine", "prog.txt", "--all", "--probe", "5"]);
        assert!(result.is_err());
    }
}
