//! # Failure taxonomy
//!
//! Two kinds of failure exist in this workspace and they never mix:
//!
//! * **Soft** failures ([`CommandError`]) come from the host: a tool is missing,
//!   exits non-zero, is denied permission or hangs. Components demote them to
//!   "no results" or a failed step and keep going.
//! * **Hard** failures ([`DiscoveryError`]) are precondition violations. They end
//!   the discovery request that hit them, never the process.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be found on this host.
    #[error("`{program}` is not available on this host")]
    Unavailable { program: String },

    /// The program ran and exited unsuccessfully (including permission denials).
    #[error("`{program}` exited with status {code}: {stderr}")]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("`{program}` did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    #[error("failed to run `{program}`")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("network interface `{0}` does not exist")]
    InterfaceNotFound(String),
}

impl CommandError {
    pub fn program(&self) -> &str {
        match self {
            Self::Unavailable { program }
            | Self::Failed { program, .. }
            | Self::TimedOut { program, .. }
            | Self::Io { program, .. } => program,
        }
    }
}
