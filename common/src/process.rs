//! # Process invocation
//!
//! Every OS tool this workspace talks to (`ip`, `dhclient`, `systemctl`, the
//! elevation wrapper) is reached through [`CommandRunner`]. Components hold an
//! `Arc<dyn CommandRunner>` so tests can substitute canned output for the host.

use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::CommandError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What a finished process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turns a non-zero exit into [`CommandError::Failed`].
    pub fn into_checked(self, program: &str) -> Result<Self, CommandError> {
        if self.success() {
            return Ok(self);
        }
        Err(CommandError::Failed {
            program: program.to_string(),
            code: self.exit_code,
            stderr: self.stderr.trim().to_string(),
        })
    }
}

pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args`, giving up after `timeout`.
    ///
    /// A non-zero exit is *not* an error here, see [`CommandRunner::run_checked`].
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError>;

    fn run_checked(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        self.run(program, args, timeout)?.into_checked(program)
    }
}

/// Runs commands on the local host with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        debug!("running `{} {}`", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| spawn_error(program, source))?;

        let stdout_reader: Option<JoinHandle<String>> = child.stdout.take().map(drain);
        let stderr_reader: Option<JoinHandle<String>> = child.stderr.take().map(drain);

        let deadline: Instant = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CommandError::TimedOut {
                        program: program.to_string(),
                        timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    return Err(CommandError::Io {
                        program: program.to_string(),
                        source,
                    });
                }
            }
        };

        let output = CommandOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout: collect(stdout_reader),
            stderr: collect(stderr_reader),
        };
        trace!("`{program}` exited with {}", output.exit_code);
        Ok(output)
    }
}

fn spawn_error(program: &str, source: std::io::Error) -> CommandError {
    match source.kind() {
        ErrorKind::NotFound => CommandError::Unavailable {
            program: program.to_string(),
        },
        _ => CommandError::Io {
            program: program.to_string(),
            source,
        },
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer: Vec<u8> = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
