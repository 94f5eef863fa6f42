//! Runs expressions through an external computation engine.
//!
//! The expression is written into a small script file, and the engine program is invoked with
//! the script's path as its only argument. The engine must finish within a deadline, otherwise
//! it is killed.
//!
//! ```no_run
//! use calcplot_engine::Engine;
//!
//! # fn main() -> Result<(), calcplot_engine::EngineError> {
//! let output = Engine::default().run("sin(pi / 2)")?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

use log::{debug, info, warn};
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

/// The default engine program.
pub const DEFAULT_PROGRAM: &str = "numbat";

/// The default path of the script file handed to the engine.
pub const DEFAULT_SCRIPT: &str = "numbat_script.nbt";

/// The default time the engine may run for.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How often a running engine is checked for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Errors that can occur while running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine, or a process it left behind holding its output, did not finish before the
    /// deadline.
    #[error("computation took longer than {timeout:?}")]
    Timeout { timeout: Duration },

    /// The engine program could not be found.
    #[error("the `{program}` executable was not found")]
    NotFound { program: String },

    /// The engine exited unsuccessfully.
    #[error("engine failed: {stderr}")]
    Fault {
        /// The exit code, or `None` if the engine was terminated by a signal.
        code: Option<i32>,

        /// The trimmed standard error of the engine.
        stderr: String,
    },

    /// Writing the script or talking to the engine failed.
    #[error("engine I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Kills and reaps the child when dropped, unless it has already exited.
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Ok(None) = self.0.try_wait() {
            warn!("killing engine process {}", self.0.id());
            let _ = self.0.kill();
            let _ = self.0.wait();
        }
    }
}

/// Reads the whole pipe on a separate thread, so the child never blocks on a full pipe. The
/// output is sent once the pipe closes.
fn drain(pipe: Option<impl Read + Send + 'static>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(err) = pipe.read_to_end(&mut buf) {
                debug!("could not read engine output: {}", err);
            }
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Waits until `deadline` for a drain thread's output, returning it trimmed.
///
/// A pipe can outlive the engine if the engine leaves a process behind that holds it open, so
/// the wait is bounded too.
fn collect(rx: &Receiver<String>, deadline: Instant, timeout: Duration) -> Result<String, EngineError> {
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(output) => Ok(output.trim().to_string()),
        Err(RecvTimeoutError::Timeout) => {
            warn!("engine output still open after {:?}", timeout);
            Err(EngineError::Timeout { timeout })
        },
        Err(RecvTimeoutError::Disconnected) => Ok(String::new()),
    }
}

/// An external computation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    /// The program to run.
    program: String,

    /// Where the script is written before running the program.
    script: PathBuf,

    /// The time the program may run for before being killed.
    timeout: Duration,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Engine {
    /// Creates an engine running the given program, with the default script path and timeout.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            script: PathBuf::from(DEFAULT_SCRIPT),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the script path. Returns the engine itself to allow chaining.
    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = script.into();
        self
    }

    /// Sets the timeout. Returns the engine itself to allow chaining.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The program that is run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The path the script is written to.
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// The time the program may run for.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The script handed to the engine for the given expression.
    pub fn script_for(expr: &str) -> String {
        format!("let result = {}\nprint(result)", expr)
    }

    /// Runs the expression through the engine, returning its trimmed standard output.
    pub fn run(&self, expr: &str) -> Result<String, EngineError> {
        fs::write(&self.script, Self::script_for(expr))?;
        info!("running `{} {}` for `{}`", self.program, self.script.display(), expr);

        let mut child = Command::new(&self.program)
            .arg(&self.script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => EngineError::NotFound { program: self.program.clone() },
                _ => EngineError::Io(err),
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let mut guard = ChildGuard(child);

        let start = Instant::now();
        let deadline = start + self.timeout;
        let status = loop {
            if let Some(status) = guard.0.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                // the guard kills the engine; the drain threads end once its pipes close
                return Err(EngineError::Timeout { timeout: self.timeout });
            }
            thread::sleep(POLL_INTERVAL);
        };
        debug!("engine exited with {} after {:?}", status, start.elapsed());

        let stdout = collect(&stdout, deadline, self.timeout)?;
        let stderr = collect(&stderr, deadline, self.timeout)?;
        if status.success() {
            Ok(stdout)
        } else {
            Err(EngineError::Fault { code: status.code(), stderr })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use pretty_assertions::assert_eq;
    use std::{os::unix::fs::PermissionsExt, sync::Mutex};
    use super::*;

    /// Writing an executable while another test forks can make `exec` fail with `ETXTBSY`, so the
    /// tests take turns.
    static LOCK: Mutex<()> = Mutex::new(());

    /// Writes a shell script standing in for the engine, returning an engine that runs it.
    fn fake_engine(dir: &Path, body: &str) -> Engine {
        let program = dir.join("engine.sh");
        fs::write(&program, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
        Engine::new(program.to_string_lossy())
            .with_script(dir.join("script.nbt"))
            .with_timeout(Duration::from_secs(5))
    }

    #[test]
    fn script_contents() {
        assert_eq!(Engine::script_for("2 + 3"), "let result = 2 + 3\nprint(result)");
    }

    #[test]
    fn defaults() {
        let engine = Engine::default();
        assert_eq!(engine.program(), "numbat");
        assert_eq!(engine.script(), Path::new("numbat_script.nbt"));
        assert_eq!(engine.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn success() {
        let _lock = LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let tmp = tempfile::tempdir().unwrap();
        // echo the script back, so the test sees what the engine was given
        let engine = fake_engine(tmp.path(), "cat \"$1\"\necho\necho '  5  '");

        let output = engine.run("2 + 3").unwrap();
        assert_eq!(output, "let result = 2 + 3\nprint(result)\n  5");
        assert_eq!(
            fs::read_to_string(tmp.path().join("script.nbt")).unwrap(),
            "let result = 2 + 3\nprint(result)",
        );
    }

    #[test]
    fn fault() {
        let _lock = LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let tmp = tempfile::tempdir().unwrap();
        let engine = fake_engine(tmp.path(), "echo 'error: unknown identifier' >&2\nexit 3");

        match engine.run("foo").unwrap_err() {
            EngineError::Fault { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "error: unknown identifier");
            },
            other => panic!("expected a fault, got {:?}", other),
        }
    }

    #[test]
    fn not_found() {
        let _lock = LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let tmp = tempfile::tempdir().unwrap();
        let engine = Engine::new(tmp.path().join("no-such-engine").to_string_lossy())
            .with_script(tmp.path().join("script.nbt"));

        let err = engine.run("1").unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn timeout() {
        let _lock = LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let tmp = tempfile::tempdir().unwrap();
        let engine = fake_engine(tmp.path(), "exec sleep 10")
            .with_timeout(Duration::from_millis(200));

        let start = Instant::now();
        let err = engine.run("1").unwrap_err();
        assert!(matches!(err, EngineError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn leftover_process_holding_output() {
        let _lock = LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let tmp = tempfile::tempdir().unwrap();
        // the engine exits at once, but the background sleep keeps its stdout open
        let engine = fake_engine(tmp.path(), "sleep 3 &\necho 1")
            .with_timeout(Duration::from_millis(300));

        let start = Instant::now();
        let err = engine.run("1").unwrap_err();
        assert!(matches!(err, EngineError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn chatty_engine() {
        let _lock = LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let tmp = tempfile::tempdir().unwrap();
        // more output than a pipe buffer holds
        let engine = fake_engine(tmp.path(), "i=0\nwhile [ $i -lt 20000 ]; do echo 0123456789; i=$((i+1)); done");

        let output = engine.run("1").unwrap();
        assert_eq!(output.lines().count(), 20000);
    }
}
