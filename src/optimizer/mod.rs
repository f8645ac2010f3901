pub mod passes;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use crate::BrainfuckError;
use crate::parser::Token;

/// A single optimized Brainfuck instruction.
///
/// The four repeatable kinds carry a repeat count (at least 1).
/// Brackets carry the index of their partner once the program has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Right(usize),
    Left(usize),
    Add(usize),
    Sub(usize),
    Output,
    Input,
    LoopStart(usize),
    LoopEnd(usize),
    /// Collapsed `[-]`.
    SetZero
}

impl From<Token> for Instruction {
    fn from(token: Token) -> Self {
        match token {
            Token::Right => Instruction::Right(1),
            Token::Left => Instruction::Left(1),
            Token::Add => Instruction::Add(1),
            Token::Sub => Instruction::Sub(1),
            Token::Output => Instruction::Output,
            Token::Input => Instruction::Input,
            Token::LoopStart => Instruction::LoopStart(0),
            Token::LoopEnd => Instruction::LoopEnd(0)
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;
        match self {
            Right(n) => write!(f, "RIGHT\t{}", n),
            Left(n) => write!(f, "LEFT\t{}", n),
            Add(n) => write!(f, "ADD\t{}", n),
            Sub(n) => write!(f, "SUB\t{}", n),
            Output => write!(f, "OUT"),
            Input => write!(f, "IN"),
            LoopStart(end) => write!(f, "BEGIN\t0x{:04X}", end),
            LoopEnd(start) => write!(f, "END\t0x{:04X}", start),
            SetZero => write!(f, "ZERO")
        }
    }
}

/// An optimized program whose brackets have been paired.
///
/// Every `LoopStart` points to its `LoopEnd` and vice versa.
/// Once built, a program is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>
}

impl Program {

    /// Resolves the jump targets of the given instructions.
    /// Any bracket payload already present is overwritten.
    pub fn new(instructions: Vec<Instruction>) -> Result<Program, BrainfuckError> {
        let mut instructions = instructions;
        let mut pending: Vec<usize> = Vec::new();

        for index in 0..instructions.len() {
            match instructions[index] {
                Instruction::LoopStart(_) => pending.push(index),
                Instruction::LoopEnd(_) => {
                    let start = pending.pop()
                        .ok_or(BrainfuckError::UnmatchedBracket { bracket: ']', index })?;
                    instructions[start] = Instruction::LoopStart(index);
                    instructions[index] = Instruction::LoopEnd(start);
                },
                _ => {}
            }
        }

        // Report the innermost unclosed loop
        if let Some(index) = pending.pop() {
            return Err(BrainfuckError::UnmatchedBracket { bracket: '[', index });
        }

        Ok(Program {
            instructions
        })
    }

    /// Returns the instructions of this program.
    pub fn instructions(&self) -> &[Instruction] {
        &*self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, inst) in self.instructions.iter().enumerate() {
            writeln!(f, "0x{:04X}\t{}", i, inst)?;
        }
        Ok(())
    }
}

/// An optimization pass.
pub trait Pass {

    /// Name of the pass.
    fn name(&self) -> &str;

    /// Executes the pass on the given set of instructions.
    /// Returns the new set of optimized instructions.
    fn run(&self, instructions: Vec<Instruction>) -> Vec<Instruction>;

}

/// Upper bound on the rounds of the pass pipeline.
const MAX_ROUNDS: usize = 10;

/// Brainfuck IR optimizer.
pub struct Optimizer {
    passes: Vec<Arc<dyn Pass + Sync + Send>>
}

impl Default for Optimizer {
    fn default() -> Self {
        Optimizer::with_passes(DEFAULT_OPTIMIZATION_PASSES.iter().cloned().collect())
    }
}

impl Optimizer {

    /// Constructs a new optimizer with the given set of passes.
    pub fn with_passes(passes: Vec<Arc<dyn Pass + Sync + Send>>) -> Optimizer {
        Optimizer {
            passes
        }
    }

    /// Constructs a new optimizer with the given set of passes.
    /// The passes are specified as a comma-separated string of names
    pub fn with_passes_str(s: &str) -> Result<Optimizer, BrainfuckError> {

        let mut passes = Vec::new();

        match s {
            "none" => {
                // Do nothing, the vector of passes will be empty
            },
            "all" => {
                // All the passes
                passes.extend(DEFAULT_OPTIMIZATION_PASSES.iter().cloned());
            },
            _ => {
                // Each pass is separated by `,`
                for name in s.split(',') {
                    if let Some(arc) = ALL_OPTIMIZATIONS.get(name.trim()) {
                        passes.push(Arc::clone(arc));
                    } else {
                        return Err(BrainfuckError::UnknownOptimizationPass(name.to_owned()));
                    }
                }
            }
        }

        Ok(Optimizer {
            passes
        })
    }

    /// Returns a slice containing the passes configured for this optimizer.
    pub fn passes(&self) -> &[Arc<dyn Pass + Sync + Send>] {
        &*self.passes
    }

    /// Runs all the passes on the given set of instructions,
    /// repeating the pipeline until nothing changes anymore.
    pub fn run(&self, instructions: Vec<Instruction>) -> Vec<Instruction> {
        let mut accum = instructions;

        for round in 0..MAX_ROUNDS {
            let before = accum.clone();
            for pass in &self.passes {
                let len = accum.len();
                accum = pass.run(accum);
                trace!("Pass {} (round {}): {} -> {} instructions.", pass.name(), round, len, accum.len());
            }
            if accum == before {
                break;
            }
        }

        accum
    }

    /// Optimizes a raw program and resolves its jumps.
    pub fn optimize(&self, tokens: &[Token]) -> Result<Program, BrainfuckError> {
        let instructions = tokens.iter().cloned().map(Instruction::from).collect();
        let instructions = self.run(instructions);
        debug!("Optimized {} commands into {} instructions.", tokens.len(), instructions.len());
        Program::new(instructions)
    }

}

// Builds a static maps of all the passes
lazy_static! {

    /// [`HashMap`](std::collections::HashMap) containing all the registered optimization passes.
    pub static ref ALL_OPTIMIZATIONS: HashMap<&'static str, Arc<dyn Pass + Sync + Send>> = {
        use passes::*;
        let mut map: HashMap<_, Arc<dyn Pass + Sync + Send>> = HashMap::new();
        map.insert("clear-loops", Arc::new(ClearLoops));
        map.insert("collapse-increments", Arc::new(CollapseIncrements));
        map
    };

    /// Order of the default optimization passes.
    /// Clear loops must be recognized before the increments inside them get merged.
    pub static ref DEFAULT_OPTIMIZATION_PASSES: Vec<Arc<dyn Pass + Sync + Send>> = vec![
        Arc::clone(&ALL_OPTIMIZATIONS["clear-loops"]),
        Arc::clone(&ALL_OPTIMIZATIONS["collapse-increments"])
    ];

}
