use std::fs;
use std::io::{self, IsTerminal, Read, Write};

use clap::Args;

use crate::channel::{BufferedChannel, InteractiveChannel};
use crate::cli_util::print_machine_error;
use crate::config;
use crate::machine::{Machine, MachineError};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Feed TEXT as the program's input and print the captured output
    #[arg(short = 'i', long = "input", value_name = "TEXT")]
    pub input: Option<String>,

    /// Tape length in cells (fallback BFI_TAPE_LEN, config file, 30000)
    #[arg(long = "tape-len", value_name = "N")]
    pub tape_len: Option<usize>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        file,
        input,
        tape_len,
        code,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let code_str = if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("")
    };

    let tape_len = match resolve_tape_len(tape_len) {
        Ok(n) => n,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    // Channel selection: an explicit --input or a piped stdin runs buffered;
    // a TTY stdin reads keystrokes live.
    match input {
        Some(input) => execute_buffered(Some(program), &code_str, &input, tape_len),
        None => {
            if io::stdin().is_terminal() {
                execute_interactive(Some(program), &code_str, tape_len)
            } else {
                let mut input = String::new();
                if let Err(e) = io::stdin().lock().read_to_string(&mut input) {
                    eprintln!("{program}: failed reading stdin: {e}");
                    let _ = io::stderr().flush();
                    return 1;
                }
                execute_buffered(Some(program), &code_str, &input, tape_len)
            }
        }
    }
}

/// Resolve the tape length: flag, then `BFI_TAPE_LEN`, then the config
/// file's `[machine] tape_len`, then the built-in default.
pub fn resolve_tape_len(flag: Option<usize>) -> Result<usize, String> {
    let from_env = || {
        std::env::var("BFI_TAPE_LEN")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
    };
    let tape_len = flag
        .or_else(from_env)
        .unwrap_or_else(|| config::settings().tape_len);
    if tape_len == 0 {
        return Err("tape length must be positive".to_string());
    }
    Ok(tape_len)
}

/// Run `code` against a buffered channel seeded with `input`, then print
/// the captured output followed by a newline for readability.
pub fn execute_buffered(program: Option<&str>, code: &str, input: &str, tape_len: usize) -> i32 {
    let mut machine = Machine::with_tape_len(BufferedChannel::new(), tape_len);
    if let Err(err) = machine.run(code, input) {
        print_machine_error(program, code, &err);
        let _ = io::stderr().flush();
        return exit_code_for(&err);
    }

    print!("{}", machine.channel().output());
    println!();
    let _ = io::stdout().flush();
    0
}

/// Run `code` against the live keystroke channel; output streams to stdout
/// as it is produced.
pub fn execute_interactive(program: Option<&str>, code: &str, tape_len: usize) -> i32 {
    let mut machine = Machine::with_tape_len(InteractiveChannel::new(), tape_len);
    if let Err(err) = machine.run(code, "") {
        print_machine_error(program, code, &err);
        let _ = io::stderr().flush();
        return exit_code_for(&err);
    }

    println!();
    let _ = io::stdout().flush();
    0
}

fn exit_code_for(err: &MachineError) -> i32 {
    match err {
        MachineError::Interrupted => 130,
        _ => 1,
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run "<code>"
  {0} run --file <PATH>
  {0} run --input <TEXT> "<code>"

Options:
  --file,     -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --input,    -i <TEXT>  Feed TEXT as the program's input and print the captured output
  --tape-len <N>         Tape length in cells (fallback BFI_TAPE_LEN, config file, 30000)
  --help,     -h         Show this help

Notes:
- With --input (or a piped stdin), input (`,`) reads from the given text and the
  program stops once it is used up. On a terminal, `,` reads one keystroke.
- Characters outside of Brainfuck's ><+-.,[] are comments and are skipped.
- Moving the pointer past either end of the tape is an error.

Examples:
- Load Brainfuck code from a file:
    {0} run --file ./program.b
- Feed bytes from a file as program input (`,` will consume file input):
    {0} run ",[.,]" < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
