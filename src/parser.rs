use std::io::Read;
use crate::BrainfuckError;

/// A single raw Brainfuck command, as found in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Right,
    Left,
    Add,
    Sub,
    Output,
    Input,
    LoopStart,
    LoopEnd
}

impl Token {

    /// Maps a source byte to its command, if any.
    pub fn from_byte(b: u8) -> Option<Token> {
        match b {
            b'>' => Some(Token::Right),
            b'<' => Some(Token::Left),
            b'+' => Some(Token::Add),
            b'-' => Some(Token::Sub),
            b'.' => Some(Token::Output),
            b',' => Some(Token::Input),
            b'[' => Some(Token::LoopStart),
            b']' => Some(Token::LoopEnd),
            _ => None
        }
    }

    /// The source character of this command.
    pub fn as_char(self) -> char {
        match self {
            Token::Right => '>',
            Token::Left => '<',
            Token::Add => '+',
            Token::Sub => '-',
            Token::Output => '.',
            Token::Input => ',',
            Token::LoopStart => '[',
            Token::LoopEnd => ']'
        }
    }

}

/// Splits the given source text into commands. Every other character is a comment.
pub fn tokenize(source: &str) -> Vec<Token> {
    // All the commands are ASCII, so scanning bytes never splits one
    source.bytes().filter_map(Token::from_byte).collect()
}

/// Reads a Brainfuck program from the given stream.
/// Brackets are not checked here, they are matched when the program is optimized.
pub fn parse(r: impl Read) -> Result<Vec<Token>, BrainfuckError> {
    let mut v = Vec::new();
    for b in r.bytes() {
        if let Some(token) = Token::from_byte(b?) {
            v.push(token);
        }
    }
    trace!("Read {} commands.", v.len());
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use quickcheck::quickcheck;

    #[test]
    fn test_empty_program() {
        let prog = Cursor::new("");
        assert_eq!(parse(prog).unwrap(), vec![]);
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn test_simple_parse() {
        let prog = Cursor::new("+-><.,[]");
        assert_eq!(parse(prog).unwrap(), vec![
            Token::Add,
            Token::Sub,
            Token::Right,
            Token::Left,
            Token::Output,
            Token::Input,
            Token::LoopStart,
            Token::LoopEnd
        ]);
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(tokenize("c0 = 2 ++ \n next > ! é"), vec![
            Token::Add,
            Token::Add,
            Token::Right
        ]);
    }

    #[test]
    fn test_unbalanced_brackets_are_tokenized() {
        assert_eq!(tokenize("]["), vec![Token::LoopEnd, Token::LoopStart]);
    }

    #[test]
    fn test_char_roundtrip() {
        for c in "><+-.,[]".chars() {
            assert_eq!(Token::from_byte(c as u8).unwrap().as_char(), c);
        }
    }

    quickcheck! {
        fn prop_tokens_come_from_source(source: String) -> bool {
            let tokens = tokenize(&source);
            let commands: String = source.chars().filter(|c| "><+-.,[]".contains(*c)).collect();
            let rebuilt: String = tokens.iter().map(|t| t.as_char()).collect();
            tokens.len() <= source.len() && rebuilt == commands
        }
    }

}
