use std::env;
use std::io::{self, Write};

use clap::{Parser, Subcommand};

use bfi::commands::run::{self, RunArgs, execute_buffered, execute_interactive, resolve_tape_len};
use bfi::commands::suite::{self, SuiteArgs};
use bfi::prompt::{self, PromptMode};

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0}                               # Prompt for a program and run it
  {0} run  "<code>"                 # Run Brainfuck code (args are concatenated)
  {0} run  --file <PATH>            # Run Brainfuck code loaded from file
  {0} run  --input <TEXT> "<code>"  # Run with buffered input and captured output
  {0} test --suite <PATH>           # Run an example suite and report pass/fail

Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bfi", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
    Test(SuiteArgs),
}

/// No subcommand: obtain one program (prompt on a TTY, stdin otherwise),
/// execute it once, exit.
fn run_prompt(program: &str) -> i32 {
    // SIGINT outside a raw-mode read: flush and abort the process.
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    let mode = match prompt::select_mode() {
        Ok(m) => m,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let submission = match mode {
        PromptMode::Editor => match prompt::read_program_interactive() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: editor error: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        },
        PromptMode::Bare => prompt::read_program_piped(),
    };

    let Some(code) = submission else {
        // EOF or the user bailed out; end the session cleanly.
        println!();
        let _ = io::stdout().flush();
        return 0;
    };

    if !prompt::contains_ops(&code) {
        return 0;
    }

    let tape_len = match resolve_tape_len(None) {
        Ok(n) => n,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    match mode {
        // The prompt consumed the TTY line; `,` keeps reading keystrokes.
        PromptMode::Editor => execute_interactive(None, &code, tape_len),
        // Stdin was the program itself, so there is no input left to read.
        PromptMode::Bare => execute_buffered(None, &code, "", tape_len),
    }
}

fn main() {
    // Pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bfi"));

    let cli = Cli::parse();

    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match cli.command {
        Some(Command::Run(args)) => run::run(&program, args),
        Some(Command::Test(args)) => suite::run(&program, args),
        None => run_prompt(&program),
    };

    std::process::exit(code);
}
