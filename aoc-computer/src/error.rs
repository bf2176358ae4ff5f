//! Error types for the computer library

use thiserror::Error;

/// Error type for loading program text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input line doesn't match any expected shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// Required data is missing from input
    #[error("Missing data: {0}")]
    MissingData(String),
    /// A program word is outside the 3-bit range
    #[error("Invalid program word {word} at position {position}")]
    InvalidWord { word: i64, position: usize },
}

/// Fault raised while executing a program
///
/// Any of these moves the machine into a terminal faulted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MachineError {
    /// Combo operand 7 is reserved
    #[error("Invalid combo operand {operand} at ip {ip}")]
    InvalidOperand { ip: usize, operand: u8 },
    /// An opcode was fetched from the last word, with no operand after it
    #[error("Truncated instruction at ip {ip}")]
    TruncatedInstruction { ip: usize },
    /// A division exponent resolved to a negative register value
    #[error("Negative shift amount {shift} at ip {ip}")]
    NegativeShift { ip: usize, shift: i64 },
    /// The instruction budget ran out before the program halted
    #[error("Step limit of {limit} instructions exceeded")]
    StepLimitExceeded { limit: u64 },
}

/// Error type for quine searches
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A candidate run hit a fault that no other candidate can avoid
    #[error("Machine fault during search: {0}")]
    Machine(#[from] MachineError),
    /// Extending a matching prefix by another octal digit left the `i64` range
    #[error("Quine seed needs more than 63 bits (prefix {prefix:#o} cannot be extended)")]
    Overflow { prefix: i64 },
}
