//! Obtaining a program interactively: a reedline prompt with Brainfuck
//! syntax highlighting when stdin is a terminal, a plain read-to-EOF
//! fallback when it is not.

use std::env;
use std::io::{self, IsTerminal};

use nu_ansi_term::Style;
use reedline::{
    DefaultPrompt, DefaultPromptSegment, Highlighter, Reedline, Signal, StyledText,
};

use crate::op::Op;
use crate::theme::palette;

/// How the program text is collected when no subcommand is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Line editor with highlighting; requires a TTY.
    Editor,
    /// Read the program from stdin until EOF.
    Bare,
}

/// Pick a mode from the `BFI_MODE` environment override, else by detecting
/// whether stdin is a terminal.
pub fn select_mode() -> Result<PromptMode, String> {
    if let Ok(val) = env::var("BFI_MODE") {
        let v = val.trim().to_ascii_lowercase();
        return match v.as_str() {
            "bare" => Ok(PromptMode::Bare),
            "editor" => {
                if !io::stdin().is_terminal() {
                    return Err(
                        "cannot start editor: stdin is not a TTY (use BFI_MODE=bare)".to_string()
                    );
                }
                Ok(PromptMode::Editor)
            }
            _ => Err(format!(
                "invalid BFI_MODE value: {val}, must be 'bare' or 'editor'"
            )),
        };
    }

    if io::stdin().is_terminal() {
        Ok(PromptMode::Editor)
    } else {
        Ok(PromptMode::Bare)
    }
}

/// Prompt for one program line. `None` means the user bailed out with
/// Ctrl+C or Ctrl+D before submitting anything.
pub fn read_program_interactive() -> io::Result<Option<String>> {
    let mut editor = Reedline::create().with_highlighter(Box::new(OpHighlighter));
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("bfi".to_string()),
        DefaultPromptSegment::Empty,
    );

    match editor.read_line(&prompt) {
        Ok(Signal::Success(buffer)) => Ok(Some(buffer)),
        Ok(Signal::CtrlC) | Ok(Signal::CtrlD) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Collect the program from piped stdin, reading until EOF.
pub fn read_program_piped() -> Option<String> {
    let mut locked = io::BufReader::new(io::stdin().lock());
    read_submission(&mut locked)
}

fn read_submission<R: io::BufRead>(stdin: &mut R) -> Option<String> {
    let mut buffer = String::new();

    loop {
        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => buffer.push_str(&line),
            Err(_) => return None,
        }
    }

    if buffer.is_empty() { None } else { Some(buffer) }
}

/// Whether the text contains at least one instruction character; pure
/// comments are not worth executing.
pub fn contains_ops(s: &str) -> bool {
    s.chars().any(|c| Op::from_char(c).is_some())
}

/// Styles each character by the operation it decodes to; comments go dim.
struct OpHighlighter;

impl OpHighlighter {
    fn style_for(ch: char) -> Style {
        match Op::from_char(ch) {
            Some(Op::MoveRight) => Style::new().fg(palette::SKY).bold(),
            Some(Op::MoveLeft) => Style::new().fg(palette::TEAL).bold(),
            Some(Op::Increment) => Style::new().fg(palette::GREEN).bold(),
            Some(Op::Decrement) => Style::new().fg(palette::RED).bold(),
            Some(Op::Output) => Style::new().fg(palette::YELLOW).bold(),
            Some(Op::Input) => Style::new().fg(palette::PEACH).bold(),
            Some(Op::LoopOpen) | Some(Op::LoopClose) => Style::new().fg(palette::MAUVE).bold(),
            None => Style::new().fg(palette::OVERLAY),
        }
    }
}

impl Highlighter for OpHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut out = StyledText::new();
        let mut current_style: Option<Style> = None;
        let mut buffer = String::new();

        for ch in line.chars() {
            let style = Self::style_for(ch);

            match current_style {
                None => {
                    current_style = Some(style);
                    buffer.push(ch);
                }
                Some(s) if s == style => {
                    buffer.push(ch);
                }
                Some(s) => {
                    out.push((s, std::mem::take(&mut buffer)));
                    current_style = Some(style);
                    buffer.push(ch);
                }
            }
        }

        if let Some(s) = current_style {
            if !buffer.is_empty() {
                out.push((s, buffer));
            }
        }
        out
    }
}
