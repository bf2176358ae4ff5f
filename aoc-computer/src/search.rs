//! Search for initial A values that make a program print itself
//!
//! Programs of this family consume A three bits per loop iteration and emit
//! one value per iteration, so the last output depends only on the highest
//! octal digits of A. The search builds A from the most significant octal
//! digit down: a candidate `prefix * 8 + digit` survives when its output
//! equals the matching suffix of the program. Runs are capped one output past
//! the expected length so overly long outputs are rejected early.

use crate::error::{MachineError, SearchError};
use crate::machine::{DEFAULT_STEP_LIMIT, HaltReason, Machine, Registers};
use crate::program::Program;
use rayon::prelude::*;
use tracing::debug;

/// Quine search over one program with fixed B and C registers
#[derive(Debug, Clone)]
pub struct QuineSearch<'p> {
    program: &'p Program,
    b: i64,
    c: i64,
    step_limit: u64,
}

/// State of one depth-first walk over the digit tree
struct Walk {
    found: Vec<i64>,
    /// First matching prefix whose children left the `i64` range
    overflow: Option<i64>,
    first_only: bool,
}

impl Walk {
    fn new(first_only: bool) -> Self {
        Self {
            found: Vec::new(),
            overflow: None,
            first_only,
        }
    }
}

impl<'p> QuineSearch<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            b: 0,
            c: 0,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Use these B and C values for every candidate run
    pub fn with_registers(mut self, b: i64, c: i64) -> Self {
        self.b = b;
        self.c = c;
        self
    }

    /// Instruction budget per candidate; candidates that exceed it are pruned
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    fn machine(&self) -> Machine<'p> {
        Machine::new(self.program, Registers::new(0, self.b, self.c))
            .with_step_limit(self.step_limit)
    }

    /// Whether running with A = `a` reproduces the program exactly
    pub fn verify(&self, a: i64) -> Result<bool, SearchError> {
        self.produces(&mut self.machine(), a, self.program.words())
    }

    /// Number of leading outputs for A = `a` that match the program words.
    ///
    /// The run stops once as many values as the program has words were
    /// emitted. A run that exceeds the step limit still counts what it emitted.
    pub fn matching_prefix_len(&self, a: i64) -> Result<usize, SearchError> {
        let words = self.program.words();
        let mut machine = self.machine();
        machine.reset(Registers::new(a, self.b, self.c));
        match machine.run_until(Some(words.len())) {
            Ok(_) | Err(MachineError::StepLimitExceeded { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(machine
            .outputs()
            .iter()
            .zip(words)
            .take_while(|(output, word)| output == word)
            .count())
    }

    /// The smallest A that reproduces the program, if the digit-wise
    /// construction finds one.
    ///
    /// Fails with [`SearchError::Overflow`] when nothing was found but some
    /// matching prefix could not be extended within `i64`.
    pub fn find_minimal(&self) -> Result<Option<i64>, SearchError> {
        if self.program.is_empty() {
            return Ok(self.verify(0)?.then_some(0));
        }

        let mut machine = self.machine();
        let mut walk = Walk::new(true);
        for digit in 0..8 {
            if self.visit(&mut machine, digit, 0, &mut walk)? {
                break;
            }
        }
        match (walk.found.first(), walk.overflow) {
            (Some(&seed), _) => Ok(Some(seed)),
            (None, Some(prefix)) => Err(SearchError::Overflow { prefix }),
            (None, None) => Ok(None),
        }
    }

    /// Every A the digit-wise construction finds, in ascending order.
    ///
    /// The eight top-level digits are explored in parallel on the current
    /// rayon pool, each with its own machine. Any prefix that cannot be
    /// extended within `i64` fails the whole search with
    /// [`SearchError::Overflow`], since the list would be incomplete.
    pub fn find_all(&self) -> Result<Vec<i64>, SearchError> {
        if self.program.is_empty() {
            return Ok(self.find_minimal()?.into_iter().collect());
        }

        let walks = (0..8i64)
            .into_par_iter()
            .map(|digit| -> Result<Walk, SearchError> {
                let mut machine = self.machine();
                let mut walk = Walk::new(false);
                self.visit(&mut machine, digit, 0, &mut walk)?;
                Ok(walk)
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        if let Some(prefix) = walks.iter().find_map(|walk| walk.overflow) {
            return Err(SearchError::Overflow { prefix });
        }

        let mut seeds: Vec<i64> = walks.into_iter().flat_map(|walk| walk.found).collect();
        seeds.sort_unstable();
        seeds.dedup();
        Ok(seeds)
    }

    /// Check candidate `a` against the last `depth + 1` words and descend.
    ///
    /// Returns `true` when the search should stop.
    fn visit(
        &self,
        machine: &mut Machine<'p>,
        a: i64,
        depth: usize,
        walk: &mut Walk,
    ) -> Result<bool, SearchError> {
        let words = self.program.words();
        let suffix = &words[words.len() - depth - 1..];
        if !self.produces(machine, a, suffix)? {
            return Ok(false);
        }

        if suffix.len() == words.len() {
            debug!(a, "found quine seed");
            walk.found.push(a);
            return Ok(walk.first_only);
        }

        for digit in 0..8 {
            let Some(child) = a.checked_mul(8).and_then(|prefix| prefix.checked_add(digit)) else {
                debug!(a, "prefix cannot be extended within i64");
                walk.overflow.get_or_insert(a);
                break;
            };
            if self.visit(machine, child, depth + 1, walk)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether A = `a` halts with exactly `expected` as its output
    fn produces(
        &self,
        machine: &mut Machine<'p>,
        a: i64,
        expected: &[u8],
    ) -> Result<bool, SearchError> {
        machine.reset(Registers::new(a, self.b, self.c));
        match machine.run_until(Some(expected.len() + 1)) {
            Ok(HaltReason::EndOfProgram) => Ok(machine.outputs() == expected),
            Ok(HaltReason::OutputLimit) => Ok(false),
            Err(MachineError::StepLimitExceeded { limit }) => {
                debug!(a, limit, "candidate exceeded step limit, pruning");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
