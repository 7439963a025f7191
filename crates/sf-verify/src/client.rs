//! Runs the external Lean checker on a JSON payload.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{VerifyError, VerifyResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Verdict printed by the checker on stdout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl VerificationResult {
    pub fn from_json(raw: &str) -> VerifyResult<Self> {
        serde_json::from_str(raw).map_err(|e| VerifyError::ResponseParse {
            raw_output: raw.to_string(),
            parse_error: e.to_string(),
        })
    }
}

/// Client for the `verify_decay` executable of a Lean project.
#[derive(Clone, Debug)]
pub struct LeanClient {
    lean_dir: PathBuf,
    executable: PathBuf,
    default_timeout: Duration,
    log_io: bool,
}

impl LeanClient {
    /// Client for the project at `lean_dir`, using the executable that
    /// `lake build` places under `.lake/build/bin`.
    pub fn new(lean_dir: impl Into<PathBuf>) -> Self {
        let lean_dir = lean_dir.into();
        let executable = lean_dir
            .join(".lake")
            .join("build")
            .join("bin")
            .join("verify_decay");
        Self {
            lean_dir,
            executable,
            default_timeout: DEFAULT_TIMEOUT,
            log_io: false,
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Log the payload, the checker's output and its exit code at debug level.
    pub fn with_log_io(mut self, log_io: bool) -> Self {
        self.log_io = log_io;
        self
    }

    pub fn lean_dir(&self) -> &Path {
        &self.lean_dir
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Run the checker on `json_input`.
    ///
    /// A `None` or zero `timeout` uses the client's default. The process runs
    /// in the project directory with the payload on stdin and is killed when
    /// the timeout expires.
    pub fn verify_decay(
        &self,
        json_input: &str,
        timeout: Option<Duration>,
    ) -> VerifyResult<VerificationResult> {
        if !self.executable.is_file() {
            return Err(VerifyError::ExecutableNotFound {
                executable: self.executable.clone(),
                lean_dir: self.lean_dir.clone(),
            });
        }
        let timeout = timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(self.default_timeout);

        if self.log_io {
            debug!("Lean input: {json_input}");
        }

        let mut child = Command::new(&self.executable)
            .current_dir(&self.lean_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let input = json_input.to_string();
            // The checker may exit before reading everything; a broken pipe
            // then shows up as its exit status instead.
            thread::spawn(move || {
                if let Err(e) = stdin.write_all(input.as_bytes()) {
                    debug!("writing Lean input: {e}");
                }
            });
        }
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let Some(status) = wait_with_deadline(&mut child, timeout)? else {
            error!("Lean verification timed out after {}s", timeout.as_secs_f64());
            return Err(VerifyError::Timeout {
                timeout,
                input_json: json_input.to_string(),
            });
        };

        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;
        let code = exit_code(status);

        if self.log_io {
            debug!("Lean stdout: {stdout}");
            debug!("Lean stderr: {stderr}");
            debug!("Lean exit code: {code}");
        }

        if !status.success() {
            return Err(VerifyError::Execution {
                exit_code: code,
                stderr,
                input_json: json_input.to_string(),
            });
        }
        VerificationResult::from_json(stdout.trim())
    }
}

/// Wait for `child`, killing it once `timeout` has elapsed.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> VerifyResult<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            // Already exited between the poll and the kill is fine.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<std::io::Result<String>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut out = String::new();
            pipe.read_to_string(&mut out)?;
            Ok(out)
        })
    })
}

fn collect(handle: Option<JoinHandle<std::io::Result<String>>>) -> VerifyResult<String> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err(std::io::Error::other("pipe reader panicked").into()),
        },
        None => Ok(String::new()),
    }
}

/// Exit code, or the negated signal number when the process was killed.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
