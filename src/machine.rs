//! The tape machine: a fixed-size byte tape, a data pointer, a program
//! counter, and the fetch-decode-execute loop that drives them.

use std::io;

use crate::brackets::{BracketIndex, BracketSide};
use crate::channel::IoChannel;
use crate::op::Op;

/// Tape length used when none is configured.
pub const DEFAULT_TAPE_LEN: usize = 30_000;

/// Errors that can occur while interpreting a program.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// Loops were not balanced; detected before any instruction executes.
    #[error("unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: BracketSide },

    /// The data pointer attempted to move left of cell 0 or beyond the last
    /// cell. Boundary policy: moves past either end are fatal, never
    /// wrapped or clamped.
    #[error("pointer out of bounds at instruction {ip} (ptr={ptr}, op='{op}')")]
    PointerOutOfBounds { ip: usize, ptr: usize, op: char },

    /// The underlying I/O channel failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// Ctrl+C during an interactive read; the driver aborts the process.
    #[error("interrupted")]
    Interrupted,
}

/// A Brainfuck tape machine.
///
/// Constructed once with a tape length and an I/O channel, then reused for
/// any number of independent programs via [`Machine::run`]; every run fully
/// resets the tape, pointer, counter, halted flag, and channel cursors.
///
/// Not safe for concurrent use: all state is mutated in place through
/// `&mut self`.
pub struct Machine<C> {
    tape: Vec<u8>,
    pointer: usize,
    pc: usize,
    halted: bool,
    channel: C,
}

impl<C: IoChannel> Machine<C> {
    /// A machine with the default 30,000-cell tape.
    pub fn new(channel: C) -> Self {
        Self::with_tape_len(channel, DEFAULT_TAPE_LEN)
    }

    /// A machine with a custom tape length. The length must be positive and
    /// stays fixed for the lifetime of the machine.
    pub fn with_tape_len(channel: C, tape_len: usize) -> Self {
        Self {
            tape: vec![0; tape_len],
            pointer: 0,
            pc: 0,
            halted: false,
            channel,
        }
    }

    /// Mark the machine as halted. Idempotent; takes effect at the top of
    /// the next dispatch iteration, so the instruction currently executing
    /// always completes first.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    fn reset(&mut self, input: &str) {
        self.tape.fill(0);
        self.pointer = 0;
        self.pc = 0;
        self.halted = false;
        self.channel.reset(input);
    }

    /// Execute `program` to completion against this machine's channel.
    ///
    /// `input` seeds a buffered channel and is ignored by the interactive
    /// one. The bracket index is built up front, so a malformed program
    /// fails before any instruction executes or any output is produced.
    pub fn run(&mut self, program: &str, input: &str) -> Result<(), MachineError> {
        self.reset(input);

        let chars: Vec<char> = program.chars().collect();
        let brackets = BracketIndex::build(&chars)?;

        while self.pc < chars.len() && !self.halted {
            if let Some(op) = Op::from_char(chars[self.pc]) {
                self.step(op, &brackets)?;
            }
            // Loop instructions park the counter on their partner bracket;
            // this uniform advance is what resumes execution one position
            // past the jump target.
            self.pc += 1;
        }

        self.halt();
        Ok(())
    }

    fn step(&mut self, op: Op, brackets: &BracketIndex) -> Result<(), MachineError> {
        match op {
            Op::MoveRight => {
                if self.pointer + 1 >= self.tape.len() {
                    return Err(self.out_of_bounds(op));
                }
                self.pointer += 1;
            }
            Op::MoveLeft => {
                if self.pointer == 0 {
                    return Err(self.out_of_bounds(op));
                }
                self.pointer -= 1;
            }
            Op::Increment => {
                self.tape[self.pointer] = self.tape[self.pointer].wrapping_add(1);
            }
            Op::Decrement => {
                self.tape[self.pointer] = self.tape[self.pointer].wrapping_sub(1);
            }
            Op::Output => {
                let byte = self.tape[self.pointer];
                self.channel.write_byte(byte).map_err(|e| self.io_error(e))?;
            }
            Op::Input => match self.channel.read_byte() {
                Ok(Some(byte)) => self.tape[self.pointer] = byte,
                // Exhausted input is an implicit halt, not a failure; the
                // current cell keeps its value.
                Ok(None) => self.halt(),
                Err(e) => return Err(self.io_error(e)),
            },
            Op::LoopOpen => {
                if self.tape[self.pointer] == 0 {
                    self.pc = brackets.partner(self.pc).expect("validated bracket");
                }
            }
            Op::LoopClose => {
                if self.tape[self.pointer] != 0 {
                    self.pc = brackets.partner(self.pc).expect("validated bracket");
                }
            }
        }
        Ok(())
    }

    fn out_of_bounds(&self, op: Op) -> MachineError {
        MachineError::PointerOutOfBounds {
            ip: self.pc,
            ptr: self.pointer,
            op: op.as_char(),
        }
    }

    fn io_error(&self, source: io::Error) -> MachineError {
        if source.kind() == io::ErrorKind::Interrupted {
            MachineError::Interrupted
        } else {
            MachineError::Io { ip: self.pc, source }
        }
    }
}
