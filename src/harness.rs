//! Batch runner for example suites: a JSON descriptor lists program files
//! with the input to feed them and the output they must produce; each case
//! runs on a reused buffered machine and is compared for exact equality.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::channel::BufferedChannel;
use crate::machine::Machine;

/// Problems with the suite itself, as opposed to a failing case.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed suite descriptor {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One example: a program file, the input to feed it, and the exact output
/// it must produce.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseSpec {
    /// Program path, resolved relative to the descriptor file.
    pub program: PathBuf,
    #[serde(default)]
    pub input: String,
    pub expected: String,
}

/// A parsed suite descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct SuiteSpec {
    pub cases: Vec<CaseSpec>,
}

impl SuiteSpec {
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        let content = fs::read_to_string(path).map_err(|source| SuiteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SuiteError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// The result of one executed case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: String,
    /// `None` on pass, otherwise the reason the case failed.
    pub failure: Option<String>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Aggregate pass/fail counts with per-failure detail.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<(String, String)>,
}

impl SuiteReport {
    pub fn from_outcomes(outcomes: &[CaseOutcome]) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            report.total += 1;
            match &outcome.failure {
                None => report.passed += 1,
                Some(reason) => {
                    report.failed += 1;
                    report.failures.push((outcome.name.clone(), reason.clone()));
                }
            }
        }
        report
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} total, {} passed, {} failed",
            self.total, self.passed, self.failed
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs every case of a suite on one reused machine.
pub struct SuiteRunner {
    machine: Machine<BufferedChannel>,
    base_dir: PathBuf,
}

impl SuiteRunner {
    /// `base_dir` anchors the descriptor's relative program paths.
    pub fn new(base_dir: PathBuf, tape_len: usize) -> Self {
        Self {
            machine: Machine::with_tape_len(BufferedChannel::new(), tape_len),
            base_dir,
        }
    }

    pub fn run_suite(&mut self, suite: &SuiteSpec) -> Result<Vec<CaseOutcome>, SuiteError> {
        suite.cases.iter().map(|case| self.run_case(case)).collect()
    }

    fn run_case(&mut self, case: &CaseSpec) -> Result<CaseOutcome, SuiteError> {
        let path = self.base_dir.join(&case.program);
        let program = fs::read_to_string(&path).map_err(|source| SuiteError::Read {
            path: path.clone(),
            source,
        })?;

        let name = case.program.display().to_string();
        let failure = match self.machine.run(&program, &case.input) {
            Ok(()) => {
                let got = self.machine.channel().output();
                if got == case.expected {
                    None
                } else {
                    Some(format!("expected {:?}, got {:?}", case.expected, got))
                }
            }
            Err(err) => Some(format!("execution failed: {err}")),
        };

        Ok(CaseOutcome { name, failure })
    }
}
