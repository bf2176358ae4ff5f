//! Program representation and the text loader
//!
//! Program files look like:
//!
//! ```text
//! Register A: 729
//! Register B: 0
//! Register C: 0
//!
//! Program: 0,1,5,4,3,0
//! ```

use crate::error::{MachineError, ParseError};
use crate::instruction::Instruction;
use crate::machine::Registers;
use anyhow::{anyhow, bail};
use itertools::Itertools;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static REGISTER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Register\s+(\S+)\s*:\s*(\S+)$").unwrap());
static PROGRAM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Program\s*:\s*(.*)$").unwrap());

/// An immutable sequence of 3-bit words, read in `(opcode, operand)` pairs
///
/// Every word is guaranteed to be in `0..=7`. The length may be odd; a
/// machine that fetches the unpaired last word faults with
/// [`MachineError::TruncatedInstruction`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Program {
    words: Vec<u8>,
}

impl Program {
    /// Create a program, rejecting any word above 7
    pub fn new(words: Vec<u8>) -> Result<Self, ParseError> {
        if let Some((position, &word)) = words.iter().find_position(|&&word| word > 7) {
            return Err(ParseError::InvalidWord {
                word: i64::from(word),
                position,
            });
        }
        Ok(Self { words })
    }

    pub fn words(&self) -> &[u8] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Decode the program pairwise, yielding each instruction with its word offset.
    ///
    /// A trailing unpaired word yields a single `TruncatedInstruction` error.
    pub fn instructions(
        &self,
    ) -> impl Iterator<Item = Result<(usize, Instruction), MachineError>> + '_ {
        (0..self.words.len())
            .step_by(2)
            .map(move |ip| {
                Instruction::decode(&self.words, ip).map(|instruction| (ip, instruction))
            })
    }

    /// Render one line per instruction, e.g. `  0: bst A`
    pub fn disassemble(&self) -> String {
        self.instructions()
            .map(|decoded| match decoded {
                Ok((ip, instruction)) => format!("{:>3}: {}", ip, instruction),
                Err(MachineError::TruncatedInstruction { ip }) => {
                    format!("{:>3}: <truncated {}>", ip, self.words[ip])
                }
                Err(e) => format!("<{}>", e),
            })
            .join("\n")
    }
}

impl FromStr for Program {
    type Err = ParseError;

    /// Parse a bare comma-separated word list such as `0,1,5,4,3,0`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }

        s.split(',')
            .map(str::trim)
            .enumerate()
            .map(|(position, token)| {
                let word = token.parse::<i64>().map_err(|e| {
                    ParseError::InvalidFormat(format!(
                        "program word {:?} at position {}: {}",
                        token, position, e
                    ))
                })?;
                u8::try_from(word)
                    .ok()
                    .filter(|&word| word <= 7)
                    .ok_or(ParseError::InvalidWord { word, position })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|words| Self { words })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.iter().join(","))
    }
}

/// Initial register values plus the program, as read from a program file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedProgram {
    pub registers: Registers,
    pub program: Program,
}

enum Line {
    Register(usize, i64),
    Program(Program),
}

const REGISTER_NAMES: [&str; 3] = ["A", "B", "C"];

fn parse_line(line: &str) -> Result<Line, anyhow::Error> {
    if let Some(captures) = REGISTER_LINE.captures(line) {
        let name = &captures[1];
        let index = REGISTER_NAMES
            .iter()
            .position(|&known| known == name)
            .ok_or_else(|| anyhow!("unknown register {:?}", name))?;
        let value = captures[2]
            .parse::<i64>()
            .map_err(|e| anyhow!("register {} value {:?}: {}", name, &captures[2], e))?;
        return Ok(Line::Register(index, value));
    }

    if let Some(captures) = PROGRAM_LINE.captures(line) {
        return Ok(Line::Program(captures[1].parse()?));
    }

    bail!("unrecognized line {:?}", line)
}

impl FromStr for LoadedProgram {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut registers: [Option<i64>; 3] = [None; 3];
        let mut program = None;

        for (line_idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let parsed = parse_line(line).and_then(|parsed| {
                match &parsed {
                    Line::Register(index, _) if registers[*index].is_some() => {
                        bail!("duplicate register {}", REGISTER_NAMES[*index])
                    }
                    Line::Program(_) if program.is_some() => bail!("duplicate program line"),
                    _ => {}
                }
                Ok(parsed)
            });

            match parsed {
                Ok(Line::Register(index, value)) => registers[index] = Some(value),
                Ok(Line::Program(words)) => program = Some(words),
                Err(e) => {
                    return Err(match e.downcast::<ParseError>() {
                        Ok(ParseError::InvalidFormat(message)) => ParseError::InvalidFormat(
                            format!("(line {}) {}", line_idx + 1, message),
                        ),
                        Ok(parse_error) => parse_error,
                        Err(e) => {
                            ParseError::InvalidFormat(format!("(line {}) {}", line_idx + 1, e))
                        }
                    });
                }
            }
        }

        let [a, b, c] = registers;
        let missing = |index: usize| {
            ParseError::MissingData(format!("Register {}", REGISTER_NAMES[index]))
        };

        Ok(LoadedProgram {
            registers: Registers {
                a: a.ok_or_else(|| missing(0))?,
                b: b.ok_or_else(|| missing(1))?,
                c: c.ok_or_else(|| missing(2))?,
            },
            program: program.ok_or_else(|| ParseError::MissingData("Program".to_string()))?,
        })
    }
}
