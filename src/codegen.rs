//! Ahead-of-time backend: turns an optimized program into a standalone C file.
//!
//! The generated program follows the same rules as the engines of this crate:
//! cells wrap around 256, output is flushed on newlines and before every read,
//! end of input reads as `0`, and moving off the tape stops the program with status 1.

use std::fmt::Write;
use crate::optimizer::{Instruction, Program};

const PRELUDE: &str = "\
#include <stdio.h>
#include <stdlib.h>

static void fail(const char *message) {
    fflush(stdout);
    fprintf(stderr, \"%s\\n\", message);
    exit(1);
}

static void put(unsigned char c) {
    putchar(c);
    if (c == '\\n') {
        fflush(stdout);
    }
}

static unsigned char get(void) {
    fflush(stdout);
    int c = getchar();
    return c == EOF ? 0 : (unsigned char) c;
}
";

/// Generates the C source of the given program, running on a fixed tape of `tape_size` cells.
/// Panics if the size is zero.
pub fn generate_c(program: &Program, tape_size: usize) -> String {
    if tape_size == 0 {
        panic!("Tape size must be at least 1.");
    }

    let mut c = String::from(PRELUDE);
    let _ = writeln!(c);
    let _ = writeln!(c, "static unsigned char tape[{}];", tape_size);
    let _ = writeln!(c);
    let _ = writeln!(c, "int main(void) {{");
    let _ = writeln!(c, "    size_t ptr = 0;");

    let mut indent = 1;
    for instruction in program.instructions() {
        if let Instruction::LoopEnd(_) = instruction {
            indent -= 1;
        }
        let pad = "    ".repeat(indent);

        // Writing to a `String` never fails
        let _ = match *instruction {
            Instruction::Right(n) => writeln!(c, "{}if (ptr + {} >= {}) fail(\"Tape overflow\"); ptr += {};", pad, n, tape_size, n),
            Instruction::Left(n) => writeln!(c, "{}if (ptr < {}) fail(\"Tape underflow\"); ptr -= {};", pad, n, n),
            Instruction::Add(n) => writeln!(c, "{}tape[ptr] += {};", pad, n % 256),
            Instruction::Sub(n) => writeln!(c, "{}tape[ptr] -= {};", pad, n % 256),
            Instruction::SetZero => writeln!(c, "{}tape[ptr] = 0;", pad),
            Instruction::Output => writeln!(c, "{}put(tape[ptr]);", pad),
            Instruction::Input => writeln!(c, "{}tape[ptr] = get();", pad),
            Instruction::LoopStart(_) => writeln!(c, "{}while (tape[ptr]) {{", pad),
            Instruction::LoopEnd(_) => writeln!(c, "{}}}", pad)
        };

        if let Instruction::LoopStart(_) = instruction {
            indent += 1;
        }
    }

    let _ = writeln!(c, "    fflush(stdout);");
    let _ = writeln!(c, "    return 0;");
    let _ = writeln!(c, "}}");

    debug!("Generated {} bytes of C for {} instructions.", c.len(), program.len());
    c
}
