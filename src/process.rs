//! External-process invocation with a scoped working directory.
//!
//! The toolkit executable resolves its data files relative to the process
//! working directory, so the bridge changes into the codes directory for the
//! duration of the call. [`WorkingDirGuard`] restores the previous directory
//! on every exit path, including early returns and panics; the rest of the
//! process shares that directory, so leaking the change would corrupt every
//! other caller.
//!
//! The legacy bridge ignored the child's exit status entirely. Strict mode
//! (the default) surfaces non-zero exits as [`BoloError::Process`]; lenient
//! mode reproduces the fire-and-forget behavior for callers that depend on
//! it. An optional timeout bounds the otherwise indefinite wait.

use crate::errors::{BoloError, BoloResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// How [`invoke`] treats the child's outcome.
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    /// Fail on non-zero exit, carrying the exit code and captured stderr.
    /// `false` restores the legacy behavior of ignoring the exit status.
    pub strict: bool,

    /// Kill the child and fail once this much time has elapsed. `None`
    /// blocks until the child terminates, however long that takes.
    pub timeout: Option<Duration>,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            strict: true,
            timeout: None,
        }
    }
}

/// Captured outcome of one invocation.
#[derive(Debug)]
pub struct ProcessOutput {
    /// Exit code; `None` when the child was killed by a signal.
    pub status: Option<i32>,

    pub stdout: String,

    pub stderr: String,
}

/// RAII scope for a process-wide working directory change.
pub struct WorkingDirGuard {
    saved: PathBuf,
}

impl WorkingDirGuard {
    pub fn change_to(dir: &Path) -> BoloResult<Self> {
        let saved = std::env::current_dir().map_err(|e| BoloError::io(".", e))?;
        std::env::set_current_dir(dir).map_err(|e| BoloError::io(dir, e))?;
        Ok(Self { saved })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        // Drop cannot report failure; the log line is all we can do.
        if let Err(e) = std::env::set_current_dir(&self.saved) {
            log::warn!(
                "failed to restore working directory to {}: {}",
                self.saved.display(),
                e
            );
        }
    }
}

/// Run `program args...` with the working directory set to `working_dir`,
/// blocking until it terminates (or `options.timeout` expires). Stdout and
/// stderr are captured in full.
pub fn invoke(
    program: &Path,
    args: &[String],
    working_dir: &Path,
    options: &InvokeOptions,
) -> BoloResult<ProcessOutput> {
    let _guard = WorkingDirGuard::change_to(working_dir)?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| BoloError::io(program, e))?;

    // Drain both pipes on their own threads so a chatty child cannot fill a
    // pipe buffer and deadlock against our wait.
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_thread = std::thread::spawn(move || drain(stdout_pipe));
    let stderr_thread = std::thread::spawn(move || drain(stderr_pipe));

    let status = match options.timeout {
        None => Some(child.wait().map_err(|e| BoloError::io(program, e))?),
        Some(limit) => wait_with_deadline(&mut child, limit).map_err(|e| BoloError::io(program, e))?,
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();
    let program_name = program.display().to_string();

    let status = match status {
        Some(status) => status,
        None => {
            return Err(BoloError::process(
                program_name,
                None,
                format!("timed out after {:?}", options.timeout.unwrap_or_default()),
            ));
        }
    };

    log::debug!("{} exited with {:?}", program_name, status.code());

    if options.strict && !status.success() {
        return Err(BoloError::process(program_name, status.code(), stderr));
    }

    Ok(ProcessOutput {
        status: status.code(),
        stdout,
        stderr,
    })
}

fn drain(pipe: Option<impl Read>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Poll the child until it exits or the deadline passes; on expiry kill it
/// and return `None`.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}
