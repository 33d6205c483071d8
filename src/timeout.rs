//! Timeout enforcement for external commands
//!
//! The package metadata query is the only step of a run that can block
//! indefinitely. Commands run here are polled with `try_wait` until they
//! exit or their deadline passes. On deadline the child is killed and
//! reaped, and the caller gets `TimeoutError::TimedOut`. There is no retry.

use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between `try_wait` polls
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Wall-clock deadline for a single command
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start_time: Instant,
    limit: Duration,
}

impl Deadline {
    /// Start a deadline that expires `limit` from now
    pub fn new(limit: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            limit,
        }
    }

    /// True once the limit has been exceeded
    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.limit
    }

    /// Time since the deadline started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

}

/// Exit status and captured stdout of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Errors from bounded command execution
#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} did not finish within {limit:?}")]
    TimedOut { program: String, limit: Duration },

    #[error("IO error while waiting for command: {0}")]
    Io(#[from] io::Error),
}

impl TimeoutError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TimeoutError::TimedOut { .. })
    }
}

/// Run `command` to completion, killing it if it outlives `limit`.
///
/// Stdin and stderr are discarded. Stdout is drained after exit, so the
/// command's output must fit in the pipe buffer; `pkg-config --cflags`
/// output always does.
pub fn run_with_timeout(command: &mut Command, limit: Duration) -> Result<CommandOutput, TimeoutError> {
    let program = command.get_program().to_string_lossy().to_string();

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| TimeoutError::Spawn {
            program: program.clone(),
            source,
        })?;

    let deadline = Deadline::new(limit);

    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if deadline.is_expired() => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(TimeoutError::TimedOut { program, limit });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)?;
        stdout = String::from_utf8_lossy(&bytes).into_owned();
    }

    Ok(CommandOutput { status, stdout })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_not_expired_immediately() {
        let deadline = Deadline::new(Duration::from_secs(10));
        assert!(!deadline.is_expired());
        assert!(deadline.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_deadline_expires() {
        let deadline = Deadline::new(Duration::from_millis(20));
        thread::sleep(Duration::from_millis(40));
        assert!(deadline.is_expired());
        assert!(deadline.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_spawn_failure() {
        let mut command = Command::new("/nonexistent/definitely-not-a-command");
        let err = run_with_timeout(&mut command, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TimeoutError::Spawn { .. }));
        assert!(!err.is_timeout());
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo -I/usr/include/foo"]);

        let output = run_with_timeout(&mut command, Duration::from_secs(5)).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "-I/usr/include/foo");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_reported() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo partial; exit 3"]);

        let output = run_with_timeout(&mut command, Duration::from_secs(5)).unwrap();
        assert!(!output.success());
        assert_eq!(output.status.code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_command_is_killed() {
        let mut command = Command::new("sh");
        command.args(["-c", "sleep 10"]);

        let started = Instant::now();
        let err = run_with_timeout(&mut command, Duration::from_millis(200)).unwrap_err();

        assert!(err.is_timeout());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
