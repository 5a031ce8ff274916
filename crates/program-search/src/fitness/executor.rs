//! Interpreter-backed execution sandbox

use super::{CodeExecutor, ExecutionOutcome};
use crate::error::SearchResult;
use crate::process::{run_with_timeout, ProcessOutput};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;
use tokio::process::Command;

/// Runs the candidate file in a fresh namespace with its output swallowed.
/// The report goes to the file named by the last argument, which is removed
/// from `sys.argv` before the candidate runs.
const HARNESS: &str = r#"
import contextlib, io, json, sys, time
report_path = sys.argv.pop()
path = sys.argv[1]
with open(path, encoding="utf-8") as handle:
    code = handle.read()
sink = io.StringIO()
start = time.perf_counter()
try:
    with contextlib.redirect_stdout(sink), contextlib.redirect_stderr(sink):
        exec(compile(code, path, "exec"), {}, {})
    report = {"outcome": "success", "elapsed": time.perf_counter() - start}
except ZeroDivisionError as e:
    report = {"outcome": "division_fault", "message": str(e)}
except SyntaxError as e:
    report = {"outcome": "syntax_fault", "message": str(e)}
except BaseException as e:
    report = {"outcome": "other_fault", "message": type(e).__name__ + ": " + str(e)}
with open(report_path, "w", encoding="utf-8") as handle:
    handle.write(json.dumps(report))
"#;

#[derive(Debug, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum HarnessReport {
    Success { elapsed: f64 },
    DivisionFault { message: String },
    SyntaxFault { message: String },
    OtherFault { message: String },
}

impl From<HarnessReport> for ExecutionOutcome {
    fn from(report: HarnessReport) -> Self {
        match report {
            HarnessReport::Success { elapsed } => match Duration::try_from_secs_f64(elapsed) {
                Ok(elapsed) => ExecutionOutcome::Success { elapsed },
                Err(e) => ExecutionOutcome::OtherFault {
                    message: format!("invalid elapsed time {}: {}", elapsed, e),
                },
            },
            HarnessReport::DivisionFault { message } => {
                ExecutionOutcome::RecoverableFault { message }
            }
            HarnessReport::SyntaxFault { message } => ExecutionOutcome::SyntaxFault { message },
            HarnessReport::OtherFault { message } => ExecutionOutcome::OtherFault { message },
        }
    }
}

/// Outcome of a finished harness run. Only a clean exit with a parseable
/// report counts.
fn classify(output: &ProcessOutput, report: &str) -> ExecutionOutcome {
    if !output.status.success() {
        return ExecutionOutcome::OtherFault {
            message: format!(
                "interpreter exited with {}: {}",
                output.status,
                output.stderr.trim()
            ),
        };
    }
    match serde_json::from_str::<HarnessReport>(report) {
        Ok(report) => report.into(),
        Err(e) => ExecutionOutcome::OtherFault {
            message: format!("missing or malformed report: {}", e),
        },
    }
}

/// Sandbox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Interpreter binary
    pub interpreter: String,
    /// Wall-clock limit per run in milliseconds
    pub timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout_ms: 5_000,
        }
    }
}

/// Executes candidates in a separate interpreter process with a timeout
#[derive(Debug, Clone, Default)]
pub struct PythonExecutor {
    config: ExecutorConfig,
}

impl PythonExecutor {
    /// Create new executor
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Sandbox configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Whether the configured interpreter can be launched
    pub fn is_available(&self) -> bool {
        run_with_timeout(
            Command::new(&self.config.interpreter).arg("--version"),
            None,
            Duration::from_secs(5),
        )
        .map(|output| output.status.success())
        .unwrap_or(false)
    }

    fn run(&self, source: &str) -> SearchResult<ExecutionOutcome> {
        let mut file = tempfile::Builder::new()
            .prefix("candidate-")
            .suffix(".py")
            .tempfile()?;
        file.write_all(source.as_bytes())?;
        file.flush()?;
        let report = tempfile::Builder::new()
            .prefix("report-")
            .suffix(".json")
            .tempfile()?;

        let output = run_with_timeout(
            Command::new(&self.config.interpreter)
                .arg("-c")
                .arg(HARNESS)
                .arg(file.path())
                .arg(report.path()),
            None,
            Duration::from_millis(self.config.timeout_ms),
        )?;

        let report = std::fs::read_to_string(report.path())?;
        Ok(classify(&output, &report))
    }
}

impl CodeExecutor for PythonExecutor {
    fn execute(&self, source: &str) -> ExecutionOutcome {
        match self.run(source) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!("Sandbox failure mapped to fallback credit: {}", e);
                ExecutionOutcome::OtherFault {
                    message: e.to_string(),
                }
            }
        }
    }
}
