use std::io::{Read, Write};
use crate::BrainfuckError;

/// Byte-level I/O as seen by a running program.
///
/// This trait is object safe, so that compiled code does not need to be generic over the streams.
pub trait ByteIo {

    /// Queues a byte for output. A newline flushes the queue.
    fn put(&mut self, byte: u8) -> Result<(), BrainfuckError>;

    /// Flushes pending output, then reads one byte. End of input reads as `0`.
    fn get(&mut self) -> Result<u8, BrainfuckError>;

    /// Writes out all the pending output.
    fn flush(&mut self) -> Result<(), BrainfuckError>;

}

/// Input and output streams of a program, with the pending output buffer.
///
/// A missing input behaves like an empty one, a missing output discards everything.
pub struct Channels<R, W>
    where R: Read,
          W: Write
{
    input: Option<R>,
    output: Option<W>,
    pending: Vec<u8>
}

impl<R, W> Channels<R, W>
    where R: Read,
          W: Write
{

    pub fn new(input: Option<R>, output: Option<W>) -> Channels<R, W> {
        Channels {
            input,
            output,
            pending: Vec::new()
        }
    }

    pub fn input(&self) -> Option<&R> {
        self.input.as_ref()
    }

    pub fn output(&self) -> Option<&W> {
        self.output.as_ref()
    }

    /// Bytes written by the program and not flushed yet.
    pub fn pending(&self) -> &[u8] {
        &*self.pending
    }

}

impl<R, W> ByteIo for Channels<R, W>
    where R: Read,
          W: Write
{

    fn put(&mut self, byte: u8) -> Result<(), BrainfuckError> {
        self.pending.push(byte);
        if byte == b'\n' {
            self.flush()?;
        }
        Ok(())
    }

    fn get(&mut self) -> Result<u8, BrainfuckError> {
        self.flush()?;
        match self.input {
            Some(ref mut input) => {
                // `bytes()` already retries interrupted reads
                match input.by_ref().bytes().next() {
                    Some(b) => Ok(b?),
                    None => Ok(0)
                }
            },
            None => Ok(0)
        }
    }

    fn flush(&mut self) -> Result<(), BrainfuckError> {
        if let Some(ref mut output) = self.output {
            output.write_all(&self.pending)?;
            output.flush()?;
        }
        self.pending.clear();
        Ok(())
    }

}
