//! The byte source and sink a machine runs against.
//!
//! Two variants: [`InteractiveChannel`] reads live keystrokes and writes to
//! stdout, [`BufferedChannel`] reads from a fixed string and accumulates
//! output for the caller to inspect. The machine only ever sees the trait.

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

pub trait IoChannel {
    /// Prepare the channel for a fresh run. Buffered channels seed their
    /// input cursor and clear accumulated output; the interactive channel
    /// has nothing to reset.
    fn reset(&mut self, input: &str);

    /// The next input byte, or `None` once the input source is exhausted.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Emit one byte as a character.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
}

/// In-memory channel for deterministic, non-interactive runs.
///
/// Input comes from the string handed to [`IoChannel::reset`]; output
/// accumulates in a buffer read back via [`BufferedChannel::output`] after
/// the run. An exhausted input reads as `None`, which the machine treats as
/// a halt request rather than an error.
#[derive(Debug, Default)]
pub struct BufferedChannel {
    input: Vec<u8>,
    cursor: usize,
    output: String,
}

impl BufferedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything the program has written during the last run.
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl IoChannel for BufferedChannel {
    fn reset(&mut self, input: &str) {
        self.input = input.as_bytes().to_vec();
        self.cursor = 0;
        self.output.clear();
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.input.get(self.cursor).copied() {
            Some(byte) => {
                self.cursor += 1;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte as char);
        Ok(())
    }
}

/// Live channel: one raw keystroke per read, one character per write.
///
/// Reads put the terminal in raw mode for the duration of a single
/// keystroke. A carriage return is stored as newline (10), which is what
/// most Brainfuck programs expect for end-of-line. Ctrl+C surfaces as an
/// [`io::ErrorKind::Interrupted`] error so the driver can abort the whole
/// process; raw mode suppresses the usual SIGINT delivery.
#[derive(Debug, Default)]
pub struct InteractiveChannel;

impl InteractiveChannel {
    pub fn new() -> Self {
        Self
    }

    fn next_keystroke(&mut self) -> io::Result<Option<u8>> {
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "ctrl+c"));
                }
                KeyCode::Enter => return Ok(Some(b'\n')),
                KeyCode::Char(c) if c.is_ascii() => return Ok(Some(c as u8)),
                _ => {}
            }
        }
    }
}

impl IoChannel for InteractiveChannel {
    fn reset(&mut self, _input: &str) {}

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        terminal::enable_raw_mode()?;
        let result = self.next_keystroke();
        terminal::disable_raw_mode()?;
        result
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        let mut out = io::stdout();
        write!(out, "{}", byte as char)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_reads_input_in_order_then_signals_exhaustion() {
        let mut ch = BufferedChannel::new();
        ch.reset("ab");
        assert_eq!(ch.read_byte().unwrap(), Some(b'a'));
        assert_eq!(ch.read_byte().unwrap(), Some(b'b'));
        assert_eq!(ch.read_byte().unwrap(), None);
        assert_eq!(ch.read_byte().unwrap(), None);
    }

    #[test]
    fn buffered_accumulates_output_as_characters() {
        let mut ch = BufferedChannel::new();
        ch.reset("");
        ch.write_byte(64).unwrap();
        ch.write_byte(b'!').unwrap();
        assert_eq!(ch.output(), "@!");
    }

    #[test]
    fn reset_rewinds_cursor_and_clears_output() {
        let mut ch = BufferedChannel::new();
        ch.reset("x");
        assert_eq!(ch.read_byte().unwrap(), Some(b'x'));
        ch.write_byte(b'y').unwrap();

        ch.reset("z");
        assert_eq!(ch.output(), "");
        assert_eq!(ch.read_byte().unwrap(), Some(b'z'));
    }
}
