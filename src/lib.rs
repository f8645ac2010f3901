#[macro_use] extern crate log;
#[macro_use] extern crate lazy_static;

pub mod error;
pub mod parser;
pub mod optimizer;
pub mod tape;
pub mod io;
pub mod interpreter;
pub mod compiler;
pub mod codegen;

pub use error::BrainfuckError;
pub use parser::{Token, parse, tokenize};
pub use optimizer::{Instruction, Optimizer, Program};
pub use tape::{Tape, TapePolicy};
pub use interpreter::Interpreter;
pub use compiler::{Compiler, CompiledProgram};
pub use codegen::generate_c;
