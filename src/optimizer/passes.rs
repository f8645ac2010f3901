use itertools::Itertools;
use crate::optimizer::{Instruction, Pass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseIncrements;

impl Pass for CollapseIncrements {

    fn name(&self) -> &str {
        "collapse-increments"
    }

    fn run(&self, instructions: Vec<Instruction>) -> Vec<Instruction> {
        use Instruction::*;
        instructions.into_iter().coalesce(|a, b| {
            match (a, b) {

                // Merge consecutive adds together
                (Add(x), Add(y)) => Ok(Add(x + y)),

                // Merge consecutive subs together
                (Sub(x), Sub(y)) => Ok(Sub(x + y)),

                // Merge consecutive lefts together
                (Left(x), Left(y)) => Ok(Left(x + y)),

                // Merge consecutive rights together
                (Right(x), Right(y)) => Ok(Right(x + y)),

                // Everything else ends the current run
                (a, b) => Err((a, b))

            }
        })
        .collect()
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearLoops;

impl Pass for ClearLoops {

    fn name(&self) -> &str {
        "clear-loops"
    }

    fn run(&self, instructions: Vec<Instruction>) -> Vec<Instruction> {
        use Instruction::*;

        // `[-]` is a very common idiom to clear the current cell.
        // It runs exactly `cell` times whatever the starting value, so it can be replaced by a store.
        let mut res = Vec::with_capacity(instructions.len());
        let mut i = 0;
        while i < instructions.len() {
            match &instructions[i..] {
                [LoopStart(_), Sub(1), LoopEnd(_), ..] => {
                    res.push(SetZero);
                    i += 3;
                },
                _ => {
                    res.push(instructions[i]);
                    i += 1;
                }
            }
        }
        res
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenize;
    use Instruction::*;

    fn p(s: &str) -> Vec<Instruction> {
        tokenize(s).into_iter().map(Instruction::from).collect()
    }

    #[test]
    fn test_collapse_increments() {
        assert_eq!(CollapseIncrements.run(p("")), vec![]);
        assert_eq!(CollapseIncrements.run(p("+++")), vec![Add(3)]);
        assert_eq!(CollapseIncrements.run(p(">>><<--++")), vec![Right(3), Left(2), Sub(2), Add(2)]);
        assert_eq!(CollapseIncrements.run(p("+>+")), vec![Add(1), Right(1), Add(1)]);
    }

    #[test]
    fn test_collapse_keeps_singletons() {
        assert_eq!(
            CollapseIncrements.run(p("..,,++[[]]")),
            vec![Output, Output, Input, Input, Add(2), LoopStart(0), LoopStart(0), LoopEnd(0), LoopEnd(0)]
        );
        assert_eq!(CollapseIncrements.run(vec![SetZero, SetZero]), vec![SetZero, SetZero]);
        assert_eq!(CollapseIncrements.run(vec![Add(2), SetZero, Add(3)]), vec![Add(2), SetZero, Add(3)]);
    }

    #[test]
    fn test_collapse_large_runs() {
        // Counts are not reduced, wrapping happens on the tape
        let source: String = std::iter::repeat('+').take(300).collect();
        assert_eq!(CollapseIncrements.run(p(&source)), vec![Add(300)]);
    }

    #[test]
    fn test_clear_loops() {
        assert_eq!(ClearLoops.run(p("[-]")), vec![SetZero]);
        assert_eq!(ClearLoops.run(p("+[-]+")), vec![Add(1), SetZero, Add(1)]);
        assert_eq!(ClearLoops.run(p("[-][-]")), vec![SetZero, SetZero]);
        assert_eq!(ClearLoops.run(p("[[-]]")), vec![LoopStart(0), SetZero, LoopEnd(0)]);
    }

    #[test]
    fn test_clear_loops_exact_pattern() {
        // Only a single decrement is the zero idiom
        assert_eq!(ClearLoops.run(p("[+]")), p("[+]"));
        assert_eq!(ClearLoops.run(p("[--]")), p("[--]"));
        assert_eq!(ClearLoops.run(vec![LoopStart(0), Sub(2), LoopEnd(0)]), vec![LoopStart(0), Sub(2), LoopEnd(0)]);
        assert_eq!(ClearLoops.run(p("[-")), p("[-"));
        assert_eq!(ClearLoops.run(p("-]")), p("-]"));
    }

}
