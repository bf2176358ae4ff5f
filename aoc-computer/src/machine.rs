//! The register machine

use crate::error::MachineError;
use crate::instruction::{Instruction, Opcode};
use crate::output::Output;
use crate::program::Program;
use tracing::trace;

/// Default instruction budget for a single run
pub const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

/// The three general purpose registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Registers {
    pub a: i64,
    pub b: i64,
    pub c: i64,
}

impl Registers {
    pub const fn new(a: i64, b: i64, c: i64) -> Self {
        Self { a, b, c }
    }
}

/// Why a machine stopped without faulting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The instruction pointer moved past the last word
    EndOfProgram,
    /// The requested number of outputs was reached
    OutputLimit,
}

/// Execution state of a [`Machine`]
///
/// `Halted` and `Faulted` are terminal: further calls to [`Machine::step`]
/// return the same state until the next run resets the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted(HaltReason),
    Faulted(MachineError),
}

impl State {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, State::Running)
    }
}

/// A 3-bit computer executing one borrowed [`Program`]
///
/// Each machine owns its registers and output buffer, so independent machines
/// can run on separate threads over the same program.
///
/// # Example
///
/// ```
/// use aoc_computer::{Machine, Program, Registers};
///
/// let program: Program = "0,1,5,4,3,0".parse().unwrap();
/// let mut machine = Machine::new(&program, Registers::new(729, 0, 0));
/// machine.run().unwrap();
/// assert_eq!(machine.output().to_string(), "4,6,3,5,6,3,5,2,1,0");
/// ```
#[derive(Debug, Clone)]
pub struct Machine<'p> {
    program: &'p Program,
    registers: Registers,
    ip: usize,
    outputs: Vec<u8>,
    steps: u64,
    step_limit: u64,
    max_outputs: Option<usize>,
    state: State,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p Program, registers: Registers) -> Self {
        Self {
            program,
            registers,
            ip: 0,
            outputs: Vec::new(),
            steps: 0,
            step_limit: DEFAULT_STEP_LIMIT,
            max_outputs: None,
            state: State::Running,
        }
    }

    /// Set the number of instructions a run may execute before faulting
    /// with [`MachineError::StepLimitExceeded`]
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn registers(&self) -> Registers {
        self.registers
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn outputs(&self) -> &[u8] {
        &self.outputs
    }

    pub fn output(&self) -> Output {
        Output::from(self.outputs.as_slice())
    }

    /// Instructions executed since the last reset
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Load new registers and rewind to the start of the program
    pub fn reset(&mut self, registers: Registers) {
        self.registers = registers;
        self.rewind();
    }

    fn rewind(&mut self) {
        self.ip = 0;
        self.outputs.clear();
        self.steps = 0;
        self.max_outputs = None;
        self.state = State::Running;
    }

    /// Run from the start of the program until it halts or faults.
    ///
    /// The instruction pointer and output buffer are reset first; registers keep
    /// whatever values they currently hold.
    pub fn run(&mut self) -> Result<HaltReason, MachineError> {
        self.run_until(None)
    }

    /// Like [`Machine::run`], but stop as soon as `max_outputs` values have
    /// been emitted. No instruction after the `out` that reached the limit is
    /// executed, and a limit of zero stops before the first instruction.
    pub fn run_until(&mut self, max_outputs: Option<usize>) -> Result<HaltReason, MachineError> {
        self.rewind();
        self.max_outputs = max_outputs;
        loop {
            match self.step() {
                State::Running => continue,
                State::Halted(reason) => return Ok(reason),
                State::Faulted(e) => return Err(e),
            }
        }
    }

    /// Execute a single instruction and return the resulting state
    pub fn step(&mut self) -> State {
        if self.state.is_terminal() {
            return self.state;
        }
        self.state = self.execute().unwrap_or_else(State::Faulted);
        self.state
    }

    fn execute(&mut self) -> Result<State, MachineError> {
        if self.max_outputs.is_some_and(|max| self.outputs.len() >= max) {
            return Ok(State::Halted(HaltReason::OutputLimit));
        }
        if self.ip >= self.program.len() {
            return Ok(State::Halted(HaltReason::EndOfProgram));
        }
        if self.steps >= self.step_limit {
            return Err(MachineError::StepLimitExceeded {
                limit: self.step_limit,
            });
        }

        let instruction = Instruction::decode(self.program.words(), self.ip)?;
        trace!(
            ip = self.ip,
            instruction = %instruction,
            a = self.registers.a,
            b = self.registers.b,
            c = self.registers.c,
            "execute"
        );

        self.ip = self.apply(instruction)?;
        self.steps += 1;
        Ok(State::Running)
    }

    /// Apply one instruction and return the next instruction pointer
    fn apply(&mut self, instruction: Instruction) -> Result<usize, MachineError> {
        let operand = instruction.operand;
        match instruction.opcode {
            Opcode::Adv => self.registers.a = self.shifted_a(operand)?,
            Opcode::Bxl => self.registers.b ^= i64::from(operand),
            Opcode::Bst => self.registers.b = self.combo(operand)?.rem_euclid(8),
            Opcode::Jnz => {
                if self.registers.a != 0 {
                    return Ok(usize::from(operand));
                }
            }
            Opcode::Bxc => self.registers.b ^= self.registers.c,
            Opcode::Out => {
                let value = self.combo(operand)?.rem_euclid(8);
                self.outputs.push(value as u8);
            }
            Opcode::Bdv => self.registers.b = self.shifted_a(operand)?,
            Opcode::Cdv => self.registers.c = self.shifted_a(operand)?,
        }
        Ok(self.ip + 2)
    }

    /// Resolve a combo operand: 0-3 are literal, 4-6 read A, B and C
    fn combo(&self, operand: u8) -> Result<i64, MachineError> {
        match operand {
            0..=3 => Ok(i64::from(operand)),
            4 => Ok(self.registers.a),
            5 => Ok(self.registers.b),
            6 => Ok(self.registers.c),
            _ => Err(MachineError::InvalidOperand {
                ip: self.ip,
                operand,
            }),
        }
    }

    /// `floor(A / 2^combo)` as an arithmetic shift.
    ///
    /// Shifts of 63 or more saturate to 0 or -1 depending on the sign of A.
    fn shifted_a(&self, operand: u8) -> Result<i64, MachineError> {
        let shift = self.combo(operand)?;
        if shift < 0 {
            return Err(MachineError::NegativeShift { ip: self.ip, shift });
        }
        Ok(self.registers.a >> shift.min(63))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(words: &str) -> Program {
        words.parse().unwrap()
    }

    fn run(words: &str, registers: Registers) -> (Registers, Vec<u8>) {
        let program = program(words);
        let mut machine = Machine::new(&program, registers);
        assert_eq!(machine.run(), Ok(HaltReason::EndOfProgram));
        (machine.registers(), machine.outputs().to_vec())
    }

    #[test]
    fn test_sample_program() {
        let (_, outputs) = run("0,1,5,4,3,0", Registers::new(729, 0, 0));
        assert_eq!(Output::from(outputs).to_string(), "4,6,3,5,6,3,5,2,1,0");
    }

    #[test]
    fn test_small_examples() {
        let (registers, _) = run("2,6", Registers::new(0, 0, 9));
        assert_eq!(registers.b, 1);

        let (_, outputs) = run("5,0,5,1,5,4", Registers::new(10, 0, 0));
        assert_eq!(outputs, vec![0, 1, 2]);

        let (registers, outputs) = run("0,1,5,4,3,0", Registers::new(2024, 0, 0));
        assert_eq!(outputs, vec![4, 2, 5, 6, 7, 7, 7, 7, 3, 1, 0]);
        assert_eq!(registers.a, 0);

        let (registers, _) = run("1,7", Registers::new(0, 29, 0));
        assert_eq!(registers.b, 26);

        let (registers, _) = run("4,0", Registers::new(0, 2024, 43690));
        assert_eq!(registers.b, 44354);
    }

    #[test]
    fn test_bxl_halts_past_end() {
        let program = program("1,7");
        let mut machine = Machine::new(&program, Registers::default());
        assert_eq!(machine.step(), State::Running);
        assert_eq!(machine.registers().b, 7);
        assert_eq!(machine.ip(), 2);
        assert_eq!(machine.step(), State::Halted(HaltReason::EndOfProgram));
        assert_eq!(machine.steps(), 1);
    }

    #[test]
    fn test_step_limit_on_self_jump() {
        let program = program("3,0");
        let mut machine = Machine::new(&program, Registers::new(5, 0, 0)).with_step_limit(1_000);
        assert_eq!(machine.step_limit(), 1_000);
        assert_eq!(machine.program(), &program);
        assert_eq!(
            machine.run(),
            Err(MachineError::StepLimitExceeded { limit: 1_000 })
        );
        assert_eq!(machine.steps(), 1_000);
        assert!(matches!(machine.state(), State::Faulted(_)));
    }

    #[test]
    fn test_default_step_limit() {
        let program = program("3,0");
        let mut machine = Machine::new(&program, Registers::new(5, 0, 0));
        assert_eq!(
            machine.run(),
            Err(MachineError::StepLimitExceeded {
                limit: DEFAULT_STEP_LIMIT
            })
        );
    }

    #[test]
    fn test_program_finishing_exactly_at_limit_halts() {
        let program = program("1,1,1,1");
        let mut machine = Machine::new(&program, Registers::default()).with_step_limit(2);
        assert_eq!(machine.run(), Ok(HaltReason::EndOfProgram));
    }

    #[test]
    fn test_max_outputs_stops_after_limit() {
        let program = program("5,0,5,1,5,2,5,3,5,3");
        let mut machine = Machine::new(&program, Registers::default());
        assert_eq!(machine.run_until(Some(2)), Ok(HaltReason::OutputLimit));
        assert_eq!(machine.outputs(), &[0, 1]);
        assert_eq!(machine.ip(), 4);
        assert_eq!(machine.steps(), 2);

        assert_eq!(machine.run_until(None), Ok(HaltReason::EndOfProgram));
        assert_eq!(machine.outputs(), &[0, 1, 2, 3, 3]);
    }

    #[test]
    fn test_max_outputs_zero_executes_nothing() {
        let program = program("1,7,5,5");
        let mut machine = Machine::new(&program, Registers::default());
        assert_eq!(machine.run_until(Some(0)), Ok(HaltReason::OutputLimit));
        assert_eq!(machine.steps(), 0);
        assert_eq!(machine.registers().b, 0);
    }

    #[test]
    fn test_invalid_combo_operand_faults() {
        let program = program("1,1,5,7");
        let mut machine = Machine::new(&program, Registers::default());
        let expected = MachineError::InvalidOperand { ip: 2, operand: 7 };
        assert_eq!(machine.run(), Err(expected));
        assert_eq!(machine.state(), State::Faulted(expected));
        // Terminal states are sticky.
        assert_eq!(machine.step(), State::Faulted(expected));
        assert_eq!(machine.steps(), 1);
    }

    #[test]
    fn test_literal_operand_seven_is_valid() {
        let (registers, _) = run("1,7,3,7", Registers::default());
        assert_eq!(registers.b, 7);
    }

    #[test]
    fn test_truncated_instruction() {
        let program = program("5,0,5");
        let mut machine = Machine::new(&program, Registers::default());
        assert_eq!(
            machine.run(),
            Err(MachineError::TruncatedInstruction { ip: 2 })
        );
        assert_eq!(machine.outputs(), &[0]);
    }

    #[test]
    fn test_negative_shift_faults() {
        let program = program("0,5");
        let mut machine = Machine::new(&program, Registers::new(8, -1, 0));
        assert_eq!(
            machine.run(),
            Err(MachineError::NegativeShift { ip: 0, shift: -1 })
        );
    }

    #[test]
    fn test_division_is_floor_and_saturates() {
        let (registers, _) = run("0,6", Registers::new(5, 0, 100));
        assert_eq!(registers.a, 0);

        let (registers, _) = run("0,6", Registers::new(-5, 0, 100));
        assert_eq!(registers.a, -1);

        let (registers, _) = run("0,1", Registers::new(-5, 0, 0));
        assert_eq!(registers.a, -3);

        let (registers, _) = run("6,2,7,3", Registers::new(1 << 40, 0, 0));
        assert_eq!(registers, Registers::new(1 << 40, 1 << 38, 1 << 37));
    }

    #[test]
    fn test_negative_values_emit_euclidean_remainder() {
        let (registers, outputs) = run("2,4,5,4", Registers::new(-1, 0, 0));
        assert_eq!(registers.b, 7);
        assert_eq!(outputs, vec![7]);
    }

    #[test]
    fn test_values_beyond_32_bits() {
        let a = 202_322_936_867_370_i64;
        let (registers, outputs) = run("0,3,5,4", Registers::new(a, 0, 0));
        assert_eq!(registers.a, a >> 3);
        assert_eq!(outputs, vec![((a >> 3) % 8) as u8]);
    }

    #[test]
    fn test_rerun_clears_outputs() {
        let program = program("5,4");
        let mut machine = Machine::new(&program, Registers::new(3, 0, 0));
        machine.run().unwrap();
        machine.run().unwrap();
        assert_eq!(machine.outputs(), &[3]);

        machine.reset(Registers::new(6, 0, 0));
        machine.run().unwrap();
        assert_eq!(machine.output().to_string(), "6");
    }

    #[test]
    fn test_empty_program_halts_immediately() {
        let program = Program::default();
        let mut machine = Machine::new(&program, Registers::default());
        assert_eq!(machine.run(), Ok(HaltReason::EndOfProgram));
        assert_eq!(machine.steps(), 0);
    }
}
