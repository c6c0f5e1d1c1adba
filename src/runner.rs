//! Running the check command on a pseudo-terminal.
//!
//! Package managers buffer or reformat output when stdout is a pipe, so the
//! check command is attached to a pty and its output is read line by line
//! as it is produced. A background thread drains the pty into a channel;
//! [`PtyProcess::lines`] hands lines out one blocking read at a time, bounded
//! by the optional timeout.
//!
//! The child is always waited for when the [`PtyProcess`] is dropped, whether
//! the stream ended normally, the consumer stopped early, or the timeout hit.
//! In the last two cases the child is killed first so the wait cannot hang.

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::error::{CheckError, Result};
use crate::manager::PackageManager;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// The command line that runs a manager's check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerCommand {
    program: PathBuf,
    args: Vec<String>,
    cwd: PathBuf,
}

impl ManagerCommand {
    /// Build `<binary> <check args>` to run inside `cwd`.
    pub fn new(manager: PackageManager, binary: &Path, cwd: &Path) -> Self {
        Self {
            program: binary.to_path_buf(),
            args: manager.check_args().iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

impl fmt::Display for ManagerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Open,
    Exhausted,
    TimedOut,
}

/// A running check command attached to a pseudo-terminal.
pub struct PtyProcess {
    command: String,
    child: Box<dyn Child + Send + Sync>,
    // Held so the pty stays open until the child is reaped.
    _master: Box<dyn MasterPty + Send>,
    lines: Receiver<String>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    state: StreamState,
    reaped: bool,
}

impl PtyProcess {
    /// Start `command` on a new pty.
    ///
    /// A `timeout` bounds the whole run, from spawn until the output ends.
    pub fn spawn(command: &ManagerCommand, timeout: Option<Duration>) -> Result<Self> {
        let command_line = command.to_string();
        let spawn_error = |e: anyhow::Error| CheckError::Spawn {
            command: command_line.clone(),
            message: e.to_string(),
        };

        let pair = native_pty_system()
            .openpty(PtySize {
                rows: 24,
                cols: 512,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(spawn_error)?;

        let mut builder = CommandBuilder::new(command.program());
        builder.args(command.args());
        builder.cwd(command.cwd());

        tracing::debug!("Spawning '{}' in {}", command_line, command.cwd().display());
        let child = pair.slave.spawn_command(builder).map_err(spawn_error)?;
        // The slave end must close in this process or reads never see EOF.
        drop(pair.slave);

        let reader = pair.master.try_clone_reader().map_err(spawn_error)?;
        let lines = spawn_reader(reader);

        Ok(Self {
            command: command_line,
            child,
            _master: pair.master,
            lines,
            timeout,
            deadline: timeout.map(|t| Instant::now() + t),
            state: StreamState::Open,
            reaped: false,
        })
    }

    /// Iterate over output lines as they arrive.
    ///
    /// The iterator ends when the child closes its output or the timeout
    /// expires; call [`finish`](Self::finish) afterwards to learn which.
    pub fn lines(&mut self) -> Lines<'_> {
        Lines { process: self }
    }

    /// Wait for the child and report whether the output ended in time.
    ///
    /// The exit status is logged but does not affect the result.
    pub fn finish(mut self) -> Result<()> {
        self.reap();
        match self.state {
            StreamState::TimedOut => Err(CheckError::Timeout {
                command: self.command.clone(),
                timeout: self.timeout.unwrap_or_default(),
            }),
            _ => Ok(()),
        }
    }

    fn next_line(&mut self) -> Option<String> {
        if self.state != StreamState::Open {
            return None;
        }

        let received = match self.deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                self.lines.recv_timeout(remaining)
            }
            None => self.lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(line) => Some(line),
            Err(RecvTimeoutError::Disconnected) => {
                self.state = StreamState::Exhausted;
                None
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("'{}' timed out", self.command);
                self.state = StreamState::TimedOut;
                None
            }
        }
    }

    fn reap(&mut self) {
        if self.reaped {
            return;
        }
        self.reaped = true;

        if self.state != StreamState::Exhausted {
            tracing::debug!("Killing '{}' before output ended", self.command);
            if let Err(e) = self.child.kill() {
                tracing::debug!("Kill failed: {}", e);
            }
        }

        match self.wait_bounded() {
            Ok(code) => tracing::debug!("'{}' exited with code {}", self.command, code),
            Err(e) => tracing::debug!("Waiting for '{}' failed: {}", self.command, e),
        }
    }

    // Output can end before the process does; keep honoring the deadline.
    fn wait_bounded(&mut self) -> std::io::Result<u32> {
        let Some(deadline) = self.deadline else {
            return self.child.wait().map(|s| s.exit_code());
        };

        loop {
            if let Some(status) = self.child.try_wait()? {
                return Ok(status.exit_code());
            }
            if Instant::now() >= deadline {
                tracing::warn!("'{}' still running after output ended", self.command);
                self.state = StreamState::TimedOut;
                if let Err(e) = self.child.kill() {
                    tracing::debug!("Kill failed: {}", e);
                }
                return self.child.wait().map(|s| s.exit_code());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for PtyProcess {
    fn drop(&mut self) {
        self.reap();
    }
}

impl fmt::Debug for PtyProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PtyProcess")
            .field("command", &self.command)
            .field("state", &self.state)
            .field("reaped", &self.reaped)
            .finish()
    }
}

/// Lazy sequence of output lines from a [`PtyProcess`].
pub struct Lines<'a> {
    process: &'a mut PtyProcess,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.process.next_line()
    }
}

/// Drain `reader` on a background thread, one line per message.
///
/// Read errors end the stream: on Linux a pty master reports EIO once the
/// child side is gone, which is the normal end of output.
fn spawn_reader(reader: Box<dyn Read + Send>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::trace!("pty read ended: {}", e);
                    break;
                }
            }
        }
    });

    rx
}
