//! Serial command line assembly.
//!
//! Bytes arrive one at a time from the UART receive interrupt. Printable
//! command characters (`0-9 A-Z : - .`) accumulate; `\r` submits the line.
//! Any other byte, or a line longer than the buffer, throws the partial line
//! away. Only `ON` and `START` are accepted on this channel.

use heapless::Vec;

use crate::command::{self, Command, CommandError};

/// Serial line buffer capacity.
pub const SERIAL_LINE_CAPACITY: usize = 32;

/// Accumulates UART bytes into command lines.
#[derive(Debug, Default)]
pub struct LineAssembler {
    line: Vec<u8, SERIAL_LINE_CAPACITY>,
    overflowed: bool,
}

impl LineAssembler {
    /// Create an empty assembler.
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one received byte.
    ///
    /// Returns `Some` when `\r` completes a line: the parsed command, or why
    /// the line was rejected.
    pub fn feed(&mut self, byte: u8) -> Option<Result<Command, CommandError>> {
        match byte {
            b'\r' => {
                let result = if self.overflowed {
                    Err(CommandError::TooLong)
                } else {
                    parse_serial(&self.line)
                };
                self.reset();
                Some(result)
            }
            b'0'..=b'9' | b'A'..=b'Z' | b':' | b'-' | b'.' => {
                if !self.overflowed && self.line.push(byte).is_err() {
                    self.overflowed = true;
                    self.line.clear();
                }
                None
            }
            _ => {
                if !self.line.is_empty() {
                    trace!("serial: byte {} discarded partial line", byte);
                }
                self.reset();
                None
            }
        }
    }

    /// Bytes buffered for the current line.
    pub fn pending(&self) -> &[u8] {
        &self.line
    }

    fn reset(&mut self) {
        self.line.clear();
        self.overflowed = false;
    }
}

/// Parse a complete serial line; only phase requests are accepted.
pub fn parse_serial(line: &[u8]) -> Result<Command, CommandError> {
    match command::parse(line)? {
        cmd @ (Command::PowerOn | Command::Start) => Ok(cmd),
        _ => Err(CommandError::Unrecognized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(asm: &mut LineAssembler, bytes: &[u8]) -> Option<Result<Command, CommandError>> {
        let mut last = None;
        for &b in bytes {
            if let Some(r) = asm.feed(b) {
                last = Some(r);
            }
        }
        last
    }

    #[test]
    fn test_line_completes_on_carriage_return() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, b"ON"), None);
        assert_eq!(asm.feed(b'\r'), Some(Ok(Command::PowerOn)));
        assert!(asm.pending().is_empty());
    }

    #[test]
    fn test_configuration_tokens_are_not_serial_commands() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, b"M:3\r"), Some(Err(CommandError::Unrecognized)));
        assert_eq!(feed_all(&mut asm, b"OFF\r"), Some(Err(CommandError::Unrecognized)));
    }

    #[test]
    fn test_foreign_byte_discards_partial_line() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, b"STA\nRT\r"), Some(Err(CommandError::Unrecognized)));
        assert_eq!(feed_all(&mut asm, b"xSTART\r"), Some(Ok(Command::Start)));
    }

    #[test]
    fn test_overlong_line_is_rejected() {
        let mut asm = LineAssembler::new();
        let long = [b'A'; SERIAL_LINE_CAPACITY + 1];
        assert_eq!(feed_all(&mut asm, &long), None);
        assert_eq!(asm.feed(b'\r'), Some(Err(CommandError::TooLong)));
        assert_eq!(feed_all(&mut asm, b"START\r"), Some(Ok(Command::Start)));
    }
}
