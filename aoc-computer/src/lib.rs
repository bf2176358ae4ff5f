//! 3-bit Register Computer
//!
//! An interpreter for a tiny register machine: three integer registers, an
//! instruction pointer, and a program of 3-bit words read in
//! `(opcode, operand)` pairs.
//!
//! # Overview
//!
//! This library provides:
//! - A loader for the `Register A: ... / Program: ...` text format
//! - A [`Machine`] that executes the eight opcodes with explicit halt and
//!   fault states, an instruction budget, and optional early exit after a
//!   number of outputs
//! - A disassembler for inspecting programs
//! - A [`QuineSearch`] that finds initial A values making a program print its
//!   own words
//!
//! # Quick Example
//!
//! ```
//! use aoc_computer::{LoadedProgram, Machine, QuineSearch};
//!
//! let input = "Register A: 729\nRegister B: 0\nRegister C: 0\n\nProgram: 0,1,5,4,3,0";
//! let loaded: LoadedProgram = input.parse().unwrap();
//!
//! let mut machine = Machine::new(&loaded.program, loaded.registers);
//! machine.run().unwrap();
//! assert_eq!(machine.output().to_string(), "4,6,3,5,6,3,5,2,1,0");
//!
//! let quine: aoc_computer::Program = "0,3,5,4,3,0".parse().unwrap();
//! assert_eq!(QuineSearch::new(&quine).find_minimal().unwrap(), Some(117440));
//! ```
//!
//! # Key Concepts
//!
//! ## Operands
//!
//! `bxl` and `jnz` read their operand as a literal. `bxc` ignores it. All other
//! opcodes read a *combo* operand: 0-3 are literal, 4-6 are the current
//! values of A, B and C, and 7 is a fault.
//!
//! ## Halting
//!
//! A run ends in one of:
//! - [`HaltReason::EndOfProgram`]: the instruction pointer moved past the last word
//! - [`HaltReason::OutputLimit`]: the caller's `max_outputs` was reached
//! - a [`MachineError`]: invalid operand, truncated instruction, negative
//!   shift, or the step limit

mod error;
mod instruction;
mod machine;
mod output;
mod program;
mod search;

// Re-export public API
pub use error::{MachineError, ParseError, SearchError};
pub use instruction::{Instruction, Opcode, Operand, OperandKind};
pub use machine::{DEFAULT_STEP_LIMIT, HaltReason, Machine, Registers, State};
pub use output::Output;
pub use program::{LoadedProgram, Program};
pub use search::QuineSearch;
