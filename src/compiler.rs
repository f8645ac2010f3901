use std::io::{Read, Write};
use crate::BrainfuckError;
use crate::io::{ByteIo, Channels};
use crate::optimizer::{Instruction, Program};
use crate::tape::{Tape, TapePolicy};

/// A single compiled operation. It runs directly against the tape, without any instruction dispatch.
type Op = Box<dyn Fn(&mut Tape, &mut dyn ByteIo) -> Result<(), BrainfuckError>>;

/// Deepest loop nesting accepted by [`Compiler::compile`](crate::compiler::Compiler::compile).
/// Every level of nesting costs a few native stack frames when the program runs.
pub const MAX_LOOP_DEPTH: usize = 512;

fn emit<F>(f: F) -> Op
    where F: Fn(&mut Tape, &mut dyn ByteIo) -> Result<(), BrainfuckError> + 'static
{
    Box::new(f)
}

/// Compiler from an optimized Brainfuck [`Program`](crate::optimizer::Program) to a tree of native closures.
///
/// Straight-line instructions become one closure each, while every loop becomes a single closure
/// running a native `while` over its compiled body. Jump targets are never looked at.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    policy: TapePolicy
}

impl Compiler {

    /// Creates a new compiler whose programs run on the default tape.
    pub fn new() -> Compiler {
        Compiler::default()
    }

    /// Creates a new compiler whose programs run on a tape with the given policy.
    pub fn with_tape(policy: TapePolicy) -> Compiler {
        Compiler {
            policy
        }
    }

    /// Compiles the given program.
    /// Fails with [`LoopNestingTooDeep`](crate::BrainfuckError::LoopNestingTooDeep) if its loops
    /// are nested more than [`MAX_LOOP_DEPTH`](crate::compiler::MAX_LOOP_DEPTH) levels deep.
    pub fn compile(&self, program: &Program) -> Result<CompiledProgram, BrainfuckError> {

        // Bodies of the loops still open, the outermost one being the program itself
        let mut blocks: Vec<Vec<Op>> = vec![Vec::new()];
        let mut count = 0usize;

        for instruction in program.instructions() {
            let op: Op = match *instruction {

                Instruction::Right(amount) => emit(move |tape, _| tape.move_right(amount)),

                Instruction::Left(amount) => emit(move |tape, _| tape.move_left(amount)),

                Instruction::Add(amount) => emit(move |tape, _| {
                    tape.add(amount);
                    Ok(())
                }),

                Instruction::Sub(amount) => emit(move |tape, _| {
                    tape.sub(amount);
                    Ok(())
                }),

                Instruction::SetZero => emit(|tape, _| {
                    tape.clear();
                    Ok(())
                }),

                Instruction::Output => emit(|tape, io| io.put(tape.get())),

                Instruction::Input => emit(|tape, io| {
                    tape.set(io.get()?);
                    Ok(())
                }),

                Instruction::LoopStart(_) => {
                    // Open a new body and keep emitting there
                    if blocks.len() > MAX_LOOP_DEPTH {
                        return Err(BrainfuckError::LoopNestingTooDeep { limit: MAX_LOOP_DEPTH });
                    }
                    blocks.push(Vec::new());
                    continue;
                },

                Instruction::LoopEnd(_) => {
                    // A resolved program never closes more loops than it opens
                    let body = match blocks.pop() {
                        Some(body) if !blocks.is_empty() => body,
                        _ => unreachable!("Unbalanced loops in a resolved program")
                    };
                    emit(move |tape, io| {
                        while tape.get() != 0 {
                            run_block(&body, tape, io)?;
                        }
                        Ok(())
                    })
                }

            };

            count += 1;
            if let Some(block) = blocks.last_mut() {
                block.push(op);
            }
        }

        let body = blocks.pop().unwrap_or_default();
        debug!("Compiled {} instructions into {} closures.", program.len(), count);

        Ok(CompiledProgram {
            body,
            policy: self.policy
        })
    }

}

#[inline]
fn run_block(block: &[Op], tape: &mut Tape, io: &mut dyn ByteIo) -> Result<(), BrainfuckError> {
    for op in block {
        op(&mut *tape, &mut *io)?;
    }
    Ok(())
}

/// Compiled Brainfuck program, ready to be run.
pub struct CompiledProgram {
    body: Vec<Op>,
    policy: TapePolicy
}

impl CompiledProgram {

    /// Runs the compiled program on a fresh tape, and returns the tape as the program left it.
    /// Pending output is flushed when the program stops, even when it stops with an error.
    pub fn run<R, W>(&self, input: R, output: W) -> Result<Tape, BrainfuckError>
        where R: Read,
              W: Write
    {
        let mut tape = Tape::new(self.policy);
        let mut channels = Channels::new(Some(input), Some(output));

        debug!("Running compiled program.");
        let res = run_block(&self.body, &mut tape, &mut channels);
        let flushed = channels.flush();
        res.and(flushed)?;

        Ok(tape)
    }

}
