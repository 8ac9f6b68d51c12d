use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use camscout_common::error::CommandError;

/// One stage of an interface mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Flush,
    AddAddress(String),
    LinkUp,
    DhcpLease,
    WriteMarker,
    StartService(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flush => f.write_str("flush addresses"),
            Self::AddAddress(cidr) => write!(f, "add {cidr}"),
            Self::LinkUp => f.write_str("bring link up"),
            Self::DhcpLease => f.write_str("request DHCP lease"),
            Self::WriteMarker => f.write_str("write mode marker"),
            Self::StartService(service) => write!(f, "start {service}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("failed to write {}", path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct StepOutcome {
    pub step: Step,
    pub result: Result<(), StepError>,
}

/// Which stages of a best-effort mutation went through.
///
/// Every stage is attempted regardless of the ones before it and nothing is
/// rolled back, so a failed address add after a successful flush leaves the
/// interface without any address.
#[derive(Debug, Default)]
pub struct StepReport {
    steps: Vec<StepOutcome>,
}

impl StepReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: Step, result: Result<(), StepError>) {
        match &result {
            Ok(()) => debug!("{step}: done"),
            Err(e) => warn!("{step}: {e}"),
        }
        self.steps.push(StepOutcome { step, result });
    }

    pub fn append(&mut self, other: StepReport) {
        self.steps.extend(other.steps);
    }

    pub fn steps(&self) -> &[StepOutcome] {
        &self.steps
    }

    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|outcome| outcome.result.is_ok())
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|outcome| outcome.result.is_err())
    }
}
