//! # Camera Discovery Service
//!
//! Implements the "find the cameras" use case.
//!
//! A request picks one of two strategies:
//! * **scan**: read the neighbor table through the [`AddressResolver`].
//! * **sniff**: listen on the wire through the [`PassiveSniffer`].
//!
//! Whatever is found, the first camera's `/24` is offered as the subnet the
//! host should join next, unless the caller already named one.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use pnet::ipnetwork::Ipv4Network;
use tracing::{debug, info, warn};

use camscout_common::config::Config;
use camscout_common::error::DiscoveryError;
use camscout_common::network::device::{Device, VendorPrefix};
use camscout_common::network::subnet;

use crate::resolver::AddressResolver;
use crate::sniffer::PassiveSniffer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiscoveryMode {
    #[default]
    Scan,
    Sniff,
}

impl DiscoveryMode {
    /// `"sniff"` (any case) selects sniffing; anything else, or nothing, scans.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(mode) if mode.eq_ignore_ascii_case("sniff") => Self::Sniff,
            Some(mode) if !mode.is_empty() && !mode.eq_ignore_ascii_case("scan") => {
                debug!("Unknown discovery mode {mode:?}, scanning instead");
                Self::Scan
            }
            _ => Self::Scan,
        }
    }
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => f.write_str("scan"),
            Self::Sniff => f.write_str("sniff"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiscoveryRequest {
    pub mode: DiscoveryMode,
    /// Sniff filter in CIDR form. Ignored when scanning.
    pub subnet: Option<String>,
    /// Overrides the configured sniff duration.
    pub timeout: Option<Duration>,
}

impl DiscoveryRequest {
    /// Builds a request from loosely typed input; an empty subnet counts as absent.
    pub fn from_raw(mode: Option<&str>, subnet: Option<&str>) -> Self {
        Self {
            mode: DiscoveryMode::parse_lenient(mode),
            subnet: subnet
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    pub mode: DiscoveryMode,
    pub devices: Vec<Device>,
    /// Advisory only; nothing is reconfigured.
    pub suggested_subnet: Option<Ipv4Network>,
}

pub struct DiscoveryOrchestrator {
    resolver: AddressResolver,
    sniffer: PassiveSniffer,
    interface: String,
    prefix: VendorPrefix,
    sniff_timeout: Duration,
    capture_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DiscoveryOrchestrator {
    pub fn new(resolver: AddressResolver, sniffer: PassiveSniffer, config: &Config) -> Self {
        Self {
            resolver,
            sniffer,
            interface: config.interface.clone(),
            prefix: config.vendor_prefix.clone(),
            sniff_timeout: config.sniff_timeout,
            capture_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Runs one discovery request against the configured interface.
    ///
    /// Only a missing interface (sniff mode) fails the request; every other
    /// problem shows up as an empty device list.
    pub fn discover(&self, request: &DiscoveryRequest) -> Result<DiscoveryOutcome, DiscoveryError> {
        info!("Discovering cameras on {} ({} mode)", self.interface, request.mode);

        let devices: Vec<Device> = match request.mode {
            DiscoveryMode::Scan => self.resolver.find_devices(&self.interface, &self.prefix),
            DiscoveryMode::Sniff => self.sniff(request)?,
        };

        let suggested_subnet: Option<Ipv4Network> = match (&request.subnet, devices.first()) {
            (None, Some(first)) => Some(subnet::subnet_of(first.ip)),
            _ => None,
        };
        if let Some(suggestion) = suggested_subnet {
            info!("Cameras appear to live on {suggestion}");
        }

        Ok(DiscoveryOutcome {
            mode: request.mode,
            devices,
            suggested_subnet,
        })
    }

    fn sniff(&self, request: &DiscoveryRequest) -> Result<Vec<Device>, DiscoveryError> {
        let filter: Option<Ipv4Network> = match request.subnet.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<Ipv4Network>() {
                Ok(net) => Some(net),
                Err(e) => {
                    warn!("Ignoring sniff request with malformed subnet {raw:?}: {e}");
                    return Ok(Vec::new());
                }
            },
        };

        let timeout: Duration = request.timeout.unwrap_or(self.sniff_timeout);
        let lock: Arc<Mutex<()>> = self.capture_lock(&self.interface);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.sniffer.sniff(&self.interface, &self.prefix, timeout, filter)
    }

    fn capture_lock(&self, interface: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .capture_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(interface.to_string()).or_default().clone()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
