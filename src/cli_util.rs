//! Error rendering for the CLI: a one-line message plus a caret pointing at
//! the offending instruction in the program text.

use std::io::{self, IsTerminal, Write};

use crate::machine::MachineError;
use crate::theme::palette;

/// Pretty-print a [`MachineError`] with caret positioning.
/// With `program = Some("bfi")` messages get a "bfi: ..." prefix.
pub fn print_machine_error(program: Option<&str>, code: &str, err: &MachineError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        MachineError::UnmatchedBracket { ip, kind } => {
            let msg = prefix_program(&format!(
                "{}: unmatched bracket {kind}",
                header("Parse error")
            ));
            print_error_with_context(&msg, code, *ip);
        }
        MachineError::PointerOutOfBounds { ip, ptr, op } => {
            let msg = prefix_program(&format!(
                "{}: pointer out of bounds (ptr={ptr}, op='{op}')",
                header("Runtime error")
            ));
            print_error_with_context(&msg, code, *ip);
        }
        MachineError::Io { ip, source } => {
            let msg = prefix_program(&format!("{}: {source}", header("I/O error")));
            print_error_with_context(&msg, code, *ip);
        }
        MachineError::Interrupted => {
            eprintln!("{}", prefix_program("interrupted"));
            let _ = io::stderr().flush();
        }
    }
}

/// Tint the message header when stderr is a terminal; keep pipelines clean.
fn header(text: &str) -> String {
    if io::stderr().is_terminal() {
        palette::RED.bold().paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    let slice = &code[start_byte..end_byte];

    eprintln!("  {}", slice);

    // Caret under the exact position
    let caret_offset_chars = pos.saturating_sub(start_char);
    let mut underline = String::new();
    for _ in 0..caret_offset_chars {
        underline.push(' ');
    }
    underline.push('^');
    eprintln!("  {}", underline);
    let _ = io::stderr().flush();
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }

    let mut count = 0usize;
    let mut byte_idx = 0usize;

    for ch in s.chars() {
        if count == char_idx {
            break;
        }
        byte_idx += ch.len_utf8();
        count += 1;
    }

    byte_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_to_byte_index_handles_multibyte_text() {
        let s = "äbc";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 2);
        assert_eq!(char_to_byte_index(s, 2), 3);
        assert_eq!(char_to_byte_index(s, 10), s.len());
    }
}
