use std::io::{Read, Write};
use crate::BrainfuckError;
use crate::io::{ByteIo, Channels};
use crate::optimizer::{Instruction, Program};
use crate::tape::{Tape, TapePolicy};

/// Builder for the [`Interpreter`](crate::interpreter::Interpreter) struct.
pub struct InterpreterBuilder<R, W>
    where R: Read,
          W: Write
{
    policy: TapePolicy,
    input: Option<R>,
    output: Option<W>
}

impl<R, W> Default for InterpreterBuilder<R, W>
    where R: Read,
          W: Write
{
    fn default() -> Self {
        InterpreterBuilder::new()
    }
}

impl<R, W> InterpreterBuilder<R, W>
    where R: Read,
          W: Write
{

    /// Creates a new [`InterpreterBuilder`](crate::interpreter::InterpreterBuilder) with the default settings.
    pub fn new() -> InterpreterBuilder<R, W> {
        InterpreterBuilder {
            policy: TapePolicy::default(),
            input: None,
            output: None
        }
    }

    /// Sets the growth policy of the tape.
    pub fn tape(&mut self, policy: TapePolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    /// Sets a fixed tape of the given size.
    /// Panics if the size is set to zero.
    pub fn tape_size(&mut self, tape_size: usize) -> &mut Self {
        if tape_size == 0 {
            panic!("Tape size must be at least 1.");
        }
        self.tape(TapePolicy::Fixed(tape_size))
    }

    /// Sets the stream that will be used as input for the `,` instruction.
    pub fn input(&mut self, input: R) -> &mut Self {
        self.input = Some(input);
        self
    }

    /// Sets the stream that will be used as output for the `.` instruction.
    pub fn output(&mut self, output: W) -> &mut Self {
        self.output = Some(output);
        self
    }

    /// Builds the actual [`Interpreter`](crate::interpreter::Interpreter).
    pub fn build(&mut self) -> Interpreter<R, W> {
        Interpreter {
            tape: Tape::new(self.policy),
            channels: Channels::new(self.input.take(), self.output.take())
        }
    }

}

/// Executes an optimized [`Program`](crate::optimizer::Program) one instruction at a time,
/// following the precomputed jump targets of its loops.
pub struct Interpreter<R, W>
    where R: Read,
          W: Write
{
    tape: Tape,
    channels: Channels<R, W>
}

impl<R, W> Default for Interpreter<R, W>
    where R: Read,
          W: Write
{
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<R, W> Interpreter<R, W>
    where R: Read,
          W: Write
{

    /// Builds an [`Interpreter`](crate::interpreter::Interpreter) with the default settings.
    pub fn new() -> Interpreter<R, W> {
        InterpreterBuilder::new().build()
    }

    /// Creates an [`InterpreterBuilder`](crate::interpreter::InterpreterBuilder) to configure
    /// a new [`Interpreter`](crate::interpreter::Interpreter).
    pub fn builder() -> InterpreterBuilder<R, W> {
        InterpreterBuilder::new()
    }

    /// Returns the tape left by the last run.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns a reference to the input stream used by this [`Interpreter`](crate::interpreter::Interpreter).
    pub fn input(&self) -> Option<&R> {
        self.channels.input()
    }

    /// Returns a reference to the output stream used by this [`Interpreter`](crate::interpreter::Interpreter).
    pub fn output(&self) -> Option<&W> {
        self.channels.output()
    }

    /// Executes the given program on a fresh tape.
    /// Pending output is flushed when the program stops, even when it stops with an error.
    pub fn run(&mut self, program: &Program) -> Result<(), BrainfuckError> {
        self.tape = Tape::new(self.tape.policy());

        debug!("Interpreting {} instructions.", program.len());
        let res = self.execute(program.instructions());
        let flushed = self.channels.flush();
        res.and(flushed)
    }

    fn execute(&mut self, instructions: &[Instruction]) -> Result<(), BrainfuckError> {
        let tape = &mut self.tape;
        let channels = &mut self.channels;
        let mut pc = 0;

        while pc < instructions.len() {
            match instructions[pc] {

                Instruction::Right(amount) => tape.move_right(amount)?,

                Instruction::Left(amount) => tape.move_left(amount)?,

                Instruction::Add(amount) => tape.add(amount),

                Instruction::Sub(amount) => tape.sub(amount),

                Instruction::SetZero => tape.clear(),

                Instruction::Output => channels.put(tape.get())?,

                Instruction::Input => tape.set(channels.get()?),

                // Jumping onto the bracket itself is enough, since `pc` is incremented right after
                Instruction::LoopStart(end) => {
                    if tape.get() == 0 {
                        pc = end;
                    }
                },

                Instruction::LoopEnd(start) => {
                    if tape.get() != 0 {
                        pc = start;
                    }
                }

            }
            pc += 1;
        }

        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use crate::optimizer::Optimizer;
    use crate::parser::tokenize;

    fn optimize(prog: &str) -> Program {
        Optimizer::default().optimize(&tokenize(prog)).unwrap()
    }

    fn run_prog(prog: &str, input: &[u8]) -> (Vec<u8>, Tape) {
        let mut interpreter = Interpreter::builder()
            .input(Cursor::new(input))
            .output(Vec::new())
            .build();
        interpreter.run(&optimize(prog)).unwrap();
        (interpreter.output().unwrap().clone(), interpreter.tape().clone())
    }

    fn assert_prog(prog: &str, input: &str, expected_output: &str) {
        let (output, _) = run_prog(prog, input.as_bytes());
        assert_eq!(output.as_slice(), expected_output.as_bytes());
    }

    #[test]
    fn test_simple1() {
        // Taken from: https://en.wikipedia.org/wiki/Brainfuck
        let prog = r#"
            ++       Cell c0 = 2
            > +++++  Cell c1 = 5

            [            Start your loops with your cell pointer on the loop counter (c1 in our case)
                < +      Add 1 to c0
                > -      Subtract 1 from c1
            ]            End your loops with the cell pointer on the loop counter

            At this point our program has added 5 to 2 leaving 7 in c0 and 0 in c1
            but we cannot output this value to the terminal since it is not ASCII encoded!

            To display the ASCII character "7" we must add 48 to the value 7
            48 = 6 * 8 so let's use another loop to help us!

            ++++ ++++      c1 = 8 and this will be our loop counter again
            [
                < +++ +++  Add 6 to c0
                > -        Subtract 1 from c1
            ]
            < .            Print out c0 which has the value 55 which translates to "7"!
        "#;

        assert_prog(prog, "", "7");
    }

    #[test]
    fn test_input() {
        let prog = ",+.,+.";
        assert_prog(prog, "AB", "BC");
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(run_prog("++.", b"").0, vec![0x02]);
        assert_eq!(run_prog("+[-]+.", b"").0, vec![0x01]);
        assert_eq!(run_prog(",.", b"A").0, vec![0x41]);
        assert_eq!(run_prog(",.", b"").0, vec![0x00]);
        assert_eq!(run_prog("++[>++++<-]>.", b"").0, vec![8]);
    }

    #[test]
    fn test_wraparound() {
        assert_eq!(run_prog("-.+.", b"").0, vec![255, 0]);
    }

    #[test]
    fn test_skipped_loop() {
        let (output, tape) = run_prog("[.>+<]>+.", b"");
        assert_eq!(output, vec![1]);
        assert_eq!(tape.position(), 1);
    }

    #[test]
    fn test_final_state() {
        let (_, tape) = run_prog("+++>++>+<", b"");
        assert_eq!(&tape.cells()[..4], &[3, 2, 1, 0]);
        assert_eq!(tape.position(), 1);
    }

    #[test]
    fn test_input_consumed_one_byte_at_a_time() {
        let mut interpreter = Interpreter::builder()
            .input(Cursor::new(&b"abcdef"[..]))
            .output(Vec::new())
            .build();
        interpreter.run(&optimize(",.,.,")).unwrap();
        assert_eq!(interpreter.input().unwrap().position(), 3);
        assert_eq!(interpreter.output().unwrap(), b"ab");
    }

    #[test]
    fn test_fresh_tape_on_each_run() {
        let mut interpreter = Interpreter::<Cursor<&[u8]>, Vec<u8>>::builder()
            .output(Vec::new())
            .build();
        let prog = optimize("+.");
        interpreter.run(&prog).unwrap();
        interpreter.run(&prog).unwrap();
        assert_eq!(interpreter.output().unwrap(), &[1, 1]);
    }

    #[test]
    fn test_underflow() {
        let prog = optimize("<");
        match Interpreter::<Cursor<&[u8]>, Vec<u8>>::new().run(&prog) {
            Err(BrainfuckError::TapeUnderflow) => {},
            r => panic!("Expected underflow. Got: {:?}", r)
        }
    }

    #[test]
    fn test_overflow() {
        let prog = optimize(">>");
        assert!(
            Interpreter::<Cursor<&[u8]>, Vec<u8>>::builder()
            .tape_size(2)
            .build()
            .run(&prog)
            .is_err()
        );
    }

    #[test]
    fn test_growable_tape() {
        let mut interpreter = Interpreter::<Cursor<&[u8]>, Vec<u8>>::builder()
            .tape(TapePolicy::Growable)
            .output(Vec::new())
            .build();
        interpreter.run(&optimize(">>>>+.")).unwrap();
        assert_eq!(interpreter.tape().cells(), &[0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_output_flushed_on_error() {
        let mut interpreter = Interpreter::<Cursor<&[u8]>, Vec<u8>>::builder()
            .output(Vec::new())
            .build();
        assert!(interpreter.run(&optimize("+.<")).is_err());
        assert_eq!(interpreter.output().unwrap(), &[1]);
    }
}
