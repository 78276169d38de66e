use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::commands::run::resolve_tape_len;
use crate::harness::{CaseOutcome, SuiteReport, SuiteRunner, SuiteSpec};
use crate::theme::palette;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct SuiteArgs {
    /// Suite descriptor listing programs with their input and expected output
    #[arg(short = 's', long = "suite", value_name = "PATH")]
    pub suite: Option<PathBuf>,

    /// Print the report as JSON instead of per-case lines
    #[arg(long = "json")]
    pub json: bool,

    /// Tape length in cells (fallback BFI_TAPE_LEN, config file, 30000)
    #[arg(long = "tape-len", value_name = "N")]
    pub tape_len: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: SuiteArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let Some(path) = args.suite else {
        usage_and_exit(program, 2);
    };

    let tape_len = match resolve_tape_len(args.tape_len) {
        Ok(n) => n,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let suite = match SuiteSpec::load(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    // Program paths in the descriptor are relative to the descriptor file.
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let mut runner = SuiteRunner::new(base_dir, tape_len);
    let outcomes = match runner.run_suite(&suite) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let report = SuiteReport::from_outcomes(&outcomes);

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{program}: failed to serialize report: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        for outcome in &outcomes {
            print_case_line(outcome);
        }
        println!("{}", report.summary());
    }
    let _ = io::stdout().flush();

    if report.is_success() { 0 } else { 1 }
}

fn print_case_line(outcome: &CaseOutcome) {
    let tty = io::stdout().is_terminal();
    match &outcome.failure {
        None => {
            let label = if tty {
                palette::GREEN.bold().paint("PASS").to_string()
            } else {
                "PASS".to_string()
            };
            println!("{label} {}", outcome.name);
        }
        Some(reason) => {
            let label = if tty {
                palette::RED.bold().paint("FAIL").to_string()
            } else {
                "FAIL".to_string()
            };
            println!("{label} {}: {reason}", outcome.name);
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} test --suite <PATH>

Options:
  --suite, -s <PATH>  Suite descriptor listing programs with their input and expected output
  --json              Print the report as JSON instead of per-case lines
  --tape-len <N>      Tape length in cells (fallback BFI_TAPE_LEN, config file, 30000)
  --help,  -h         Show this help

Description:
  Runs every listed program against its input on a buffered machine and
  compares the captured output with the expected text, byte for byte.

Descriptor format (JSON, program paths relative to the descriptor):
  {{ "cases": [ {{ "program": "hello.b", "input": "", "expected": "Hello World!\n" }} ] }}

Exit status is 0 only when every case passes.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
