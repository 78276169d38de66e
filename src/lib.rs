//! A tape-machine Brainfuck interpreter.
//!
//! Programs execute directly on a fixed-size byte tape (default 30,000
//! cells) with a single data pointer; there is no intermediate
//! representation and no optimization pass.
//!
//! Behaviors:
//! - Cells wrap modulo 256 on increment and decrement.
//! - Moving the pointer past either end of the tape is an error (never
//!   wrapped or clamped).
//! - Any character outside `><+-.,[]` is a comment and is skipped.
//! - Bracket pairs are matched once per run, before execution; unmatched
//!   brackets fail before any instruction runs.
//! - I/O goes through a channel chosen at construction: live keystrokes
//!   and stdout, or in-memory strings for deterministic runs. A buffered
//!   channel that runs out of input halts the machine instead of erroring.
//!
//! Quick start:
//!
//! ```
//! use bfi::{BufferedChannel, Machine};
//!
//! let mut machine = Machine::new(BufferedChannel::new());
//! machine.run("++++++++[>++++++++<-]>.", "").expect("program should run");
//! assert_eq!(machine.channel().output(), "@");
//! ```

pub mod brackets;
pub mod channel;
pub mod cli_util;
pub mod commands;
pub mod config;
pub mod harness;
pub mod machine;
pub mod op;
pub mod prompt;
pub mod theme;

pub use brackets::{BracketIndex, BracketSide};
pub use channel::{BufferedChannel, InteractiveChannel, IoChannel};
pub use harness::{CaseOutcome, CaseSpec, SuiteError, SuiteReport, SuiteRunner, SuiteSpec};
pub use machine::{DEFAULT_TAPE_LEN, Machine, MachineError};
pub use op::Op;
