//! Opcodes, operands and decoded instructions

use crate::error::MachineError;
use std::fmt;

/// The eight operations of the computer, one per 3-bit opcode word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// A ← A >> combo
    Adv = 0,
    /// B ← B ^ literal
    Bxl = 1,
    /// B ← combo mod 8
    Bst = 2,
    /// Jump to literal when A ≠ 0
    Jnz = 3,
    /// B ← B ^ C
    Bxc = 4,
    /// Emit combo mod 8
    Out = 5,
    /// B ← A >> combo
    Bdv = 6,
    /// C ← A >> combo
    Cdv = 7,
}

/// How an opcode interprets the word that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Literal,
    Combo,
    Ignored,
}

impl Opcode {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Adv => "adv",
            Opcode::Bxl => "bxl",
            Opcode::Bst => "bst",
            Opcode::Jnz => "jnz",
            Opcode::Bxc => "bxc",
            Opcode::Out => "out",
            Opcode::Bdv => "bdv",
            Opcode::Cdv => "cdv",
        }
    }

    pub const fn operand_kind(self) -> OperandKind {
        match self {
            Opcode::Bxl | Opcode::Jnz => OperandKind::Literal,
            Opcode::Bxc => OperandKind::Ignored,
            Opcode::Adv | Opcode::Bst | Opcode::Out | Opcode::Bdv | Opcode::Cdv => {
                OperandKind::Combo
            }
        }
    }
}

/// Only the low three bits of the word are read.
impl From<u8> for Opcode {
    fn from(word: u8) -> Self {
        match word & 0b111 {
            0 => Opcode::Adv,
            1 => Opcode::Bxl,
            2 => Opcode::Bst,
            3 => Opcode::Jnz,
            4 => Opcode::Bxc,
            5 => Opcode::Out,
            6 => Opcode::Bdv,
            _ => Opcode::Cdv,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// An operand word tagged with the way its opcode reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Literal(u8),
    Combo(u8),
    Ignored(u8),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Combo(value @ 0..=3) => write!(f, "{}", value),
            Operand::Combo(4) => f.write_str("A"),
            Operand::Combo(5) => f.write_str("B"),
            Operand::Combo(6) => f.write_str("C"),
            Operand::Combo(value) => write!(f, "?{}", value),
            Operand::Ignored(_) => Ok(()),
        }
    }
}

/// One decoded `(opcode, operand)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: u8,
}

impl Instruction {
    /// Decode the pair starting at `ip`.
    ///
    /// Fails with [`MachineError::TruncatedInstruction`] when fewer than two
    /// words are left at `ip`, including when `ip` is past the end.
    pub fn decode(words: &[u8], ip: usize) -> Result<Self, MachineError> {
        match words.get(ip..).and_then(|rest| rest.get(..2)) {
            Some(&[opcode, operand]) => Ok(Self {
                opcode: Opcode::from(opcode),
                operand,
            }),
            _ => Err(MachineError::TruncatedInstruction { ip }),
        }
    }

    pub fn operand(&self) -> Operand {
        match self.opcode.operand_kind() {
            OperandKind::Literal => Operand::Literal(self.operand),
            OperandKind::Combo => Operand::Combo(self.operand),
            OperandKind::Ignored => Operand::Ignored(self.operand),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand() {
            Operand::Ignored(_) => write!(f, "{}", self.opcode),
            operand => write!(f, "{} {}", self.opcode, operand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_from_word_covers_all_eight() {
        let opcodes: Vec<Opcode> = (0u8..8).map(Opcode::from).collect();
        assert_eq!(
            opcodes,
            vec![
                Opcode::Adv,
                Opcode::Bxl,
                Opcode::Bst,
                Opcode::Jnz,
                Opcode::Bxc,
                Opcode::Out,
                Opcode::Bdv,
                Opcode::Cdv,
            ]
        );
        for word in 0u8..8 {
            assert_eq!(Opcode::from(word) as u8, word);
        }
    }

    #[test]
    fn test_instruction_display() {
        let render = |opcode: u8, operand: u8| {
            Instruction::decode(&[opcode, operand], 0).unwrap().to_string()
        };
        assert_eq!(render(0, 4), "adv A");
        assert_eq!(render(1, 5), "bxl 5");
        assert_eq!(render(2, 6), "bst C");
        assert_eq!(render(3, 0), "jnz 0");
        assert_eq!(render(4, 3), "bxc");
        assert_eq!(render(5, 5), "out B");
        assert_eq!(render(6, 2), "bdv 2");
        assert_eq!(render(7, 7), "cdv ?7");
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(
            Instruction::decode(&[0, 1, 5], 2),
            Err(MachineError::TruncatedInstruction { ip: 2 })
        );
    }

    #[test]
    fn test_decode_past_end() {
        assert_eq!(
            Instruction::decode(&[0, 1], 4),
            Err(MachineError::TruncatedInstruction { ip: 4 })
        );
        assert_eq!(
            Instruction::decode(&[0, 1], usize::MAX),
            Err(MachineError::TruncatedInstruction { ip: usize::MAX })
        );
    }

    #[test]
    fn test_operand_kinds() {
        assert_eq!(Opcode::Bxl.operand_kind(), OperandKind::Literal);
        assert_eq!(Opcode::Jnz.operand_kind(), OperandKind::Literal);
        assert_eq!(Opcode::Bxc.operand_kind(), OperandKind::Ignored);
        assert_eq!(Opcode::Out.operand_kind(), OperandKind::Combo);
    }
}
