//! Output formatting for command results

use aoc_computer::{HaltReason, Output};
use chrono::{DateTime, TimeDelta, Utc};

/// A value together with when computing it started and ended (UTC)
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl<T> Timed<T> {
    /// Run `f` and record its wall-clock span
    pub fn measure(f: impl FnOnce() -> T) -> Self {
        let start = Utc::now();
        let value = f();
        let end = Utc::now();
        Self { value, start, end }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Output formatter for command results
pub struct OutputFormatter {
    quiet: bool,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print the output of a finished run
    pub fn print_run(
        &self,
        output: &Output,
        reason: HaltReason,
        steps: u64,
        parse_time: TimeDelta,
        run_time: TimeDelta,
    ) {
        if self.quiet {
            println!("{}", output);
            return;
        }

        let stop = match reason {
            HaltReason::EndOfProgram => "halted",
            HaltReason::OutputLimit => "output limit reached",
        };
        println!(
            "Output: {} ({}, {} steps; parse: {}, run: {})",
            output,
            stop,
            steps,
            format_duration(parse_time),
            format_duration(run_time)
        );
    }

    /// Print a disassembly listing
    pub fn print_disassembly(&self, listing: &str) {
        println!("{}", listing);
    }

    /// Print quine seeds, smallest first
    pub fn print_seeds(&self, seeds: &[i64], search_time: TimeDelta) {
        if self.quiet {
            for seed in seeds {
                println!("{}", seed);
            }
            return;
        }

        for seed in seeds {
            println!("A = {} (octal {:o})", seed, seed);
        }
        println!(
            "{} seed(s) found (search: {})",
            seeds.len(),
            format_duration(search_time)
        );
    }

    /// Print how many leading outputs of a probed seed match the program
    pub fn print_probe(&self, a: i64, matching: usize, program_len: usize) {
        if self.quiet {
            println!("{}", matching);
        } else {
            println!(
                "A = {}: {}/{} leading outputs match the program",
                a, matching, program_len
            );
        }
    }
}

/// Format a TimeDelta for display
fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}
