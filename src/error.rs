use std::error::Error;
use std::{fmt, io};

#[derive(Debug)]
pub enum BrainfuckError {
    /// Generic message
    Message(String),
    /// I/O error.
    IoError(io::Error),
    /// A bracket without its partner. `index` is the position of the bracket
    /// in the instruction sequence being resolved.
    UnmatchedBracket { bracket: char, index: usize },
    /// Unknown optimization pass.
    UnknownOptimizationPass(String),
    /// The data pointer underflowed the available tape.
    TapeUnderflow,
    /// The data pointer overflowed the available tape.
    TapeOverflow,
    /// Loops nested deeper than what the compiled closures can run.
    LoopNestingTooDeep { limit: usize }
}

impl Error for BrainfuckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BrainfuckError::IoError(ref e) => Some(e),
            _ => None
        }
    }
}

impl fmt::Display for BrainfuckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BrainfuckError::*;
        match self {
            Message(ref m) => {
                write!(f, "{}", m)
            },
            IoError(ref e) => {
                write!(f, "I/O error: {}", e)
            },
            UnmatchedBracket { bracket, index } => {
                write!(f, "Malformed Brainfuck program: unmatched '{}' at instruction {}", bracket, index)
            },
            UnknownOptimizationPass(ref name) => {
                write!(f, "Unknown optimization pass: {}", name)
            },
            TapeUnderflow => {
                write!(f, "Tape underflow")
            },
            TapeOverflow => {
                write!(f, "Tape overflow")
            },
            LoopNestingTooDeep { limit } => {
                write!(f, "Loops nested more than {} levels deep cannot be compiled", limit)
            }
        }
    }
}

impl From<&str> for BrainfuckError {
    fn from(s: &str) -> Self {
        BrainfuckError::Message(s.to_owned())
    }
}

impl From<String> for BrainfuckError {
    fn from(s: String) -> Self {
        BrainfuckError::Message(s)
    }
}

impl From<io::Error> for BrainfuckError {
    fn from(e: io::Error) -> Self {
        BrainfuckError::IoError(e)
    }
}
