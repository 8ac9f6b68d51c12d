//! # Interface controller
//!
//! Moves the host's camera-facing interface between addressing modes:
//!
//! * **static**: flush, add one address, bring the link up.
//! * **DHCP**: flush, bring the link up, request a single lease.
//! * **business**: mark the mode on disk, start the captive network services
//!   and take the static business address.
//!
//! Mutations are best effort. Each stage runs even when an earlier one
//! failed, nothing is rolled back, and the caller gets a [`StepReport`]
//! instead of an error. Mutating commands go through the configured
//! elevation wrapper; queries run unprivileged.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use camscout_common::config::{BusinessModeConfig, Config};
use camscout_common::network::address::InterfaceAddress;
use camscout_common::network::subnet;
use camscout_common::process::CommandRunner;

mod report;

pub use report::{Step, StepError, StepOutcome, StepReport};

pub struct InterfaceController {
    runner: Arc<dyn CommandRunner>,
    interface: String,
    static_cidr: String,
    elevate_with: Option<String>,
    command_timeout: Duration,
    dhcp_timeout: Duration,
    business: BusinessModeConfig,
}

impl InterfaceController {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &Config) -> Self {
        Self {
            runner,
            interface: config.interface.clone(),
            static_cidr: config.static_cidr.clone(),
            elevate_with: config.elevate_with.clone(),
            command_timeout: config.command_timeout,
            dhcp_timeout: config.dhcp_timeout,
            business: config.business.clone(),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Replaces every address on the interface with `cidr`.
    pub fn set_static(&self, cidr: &str) -> StepReport {
        info!("Configuring {} with static address {cidr}", self.interface);
        let intf: &str = &self.interface;
        let timeout: Duration = self.command_timeout;
        let mut report = StepReport::new();

        report.record(
            Step::Flush,
            self.privileged("ip", &["addr", "flush", "dev", intf], timeout),
        );
        report.record(
            Step::AddAddress(cidr.to_string()),
            self.privileged("ip", &["addr", "add", cidr, "dev", intf], timeout),
        );
        report.record(
            Step::LinkUp,
            self.privileged("ip", &["link", "set", intf, "up"], timeout),
        );
        report
    }

    /// Drops static addressing and asks the network for a lease.
    pub fn set_dhcp(&self) -> StepReport {
        info!("Switching {} to DHCP", self.interface);
        let intf: &str = &self.interface;
        let timeout: Duration = self.command_timeout;
        let mut report = StepReport::new();

        report.record(
            Step::Flush,
            self.privileged("ip", &["addr", "flush", "dev", intf], timeout),
        );
        report.record(
            Step::LinkUp,
            self.privileged("ip", &["link", "set", intf, "up"], timeout),
        );
        report.record(
            Step::DhcpLease,
            self.privileged("dhclient", &["-1", intf], self.dhcp_timeout),
        );
        report
    }

    /// Joins `subnet` (`a.b.c.0/n`) as host `.240`.
    ///
    /// Malformed input changes nothing and returns `None`.
    pub fn set_subnet(&self, subnet: &str) -> Option<StepReport> {
        match subnet::host_cidr_in(subnet) {
            Some(cidr) => Some(self.set_static(&cidr)),
            None => {
                warn!("Ignoring malformed subnet {subnet:?}");
                None
            }
        }
    }

    /// Whether `expected_cidr` appears in the interface's IPv4 listing.
    pub fn is_static(&self, expected_cidr: &str) -> bool {
        self.address_listing(&self.interface)
            .is_some_and(|listing| listing.contains(expected_cidr))
    }

    /// The first IPv4 address of any `interface`, `None` when it has none or
    /// cannot be queried.
    pub fn get_subnet(&self, interface: &str) -> Option<InterfaceAddress> {
        InterfaceAddress::from_listing(&self.address_listing(interface)?)
    }

    /// The first IPv4 address of the controlled interface.
    pub fn current_address(&self) -> Option<InterfaceAddress> {
        self.get_subnet(&self.interface)
    }

    /// Turns this host into the gateway of a captive camera network.
    ///
    /// Services are started without waiting for them to come up.
    pub fn enable_business_mode(&self) -> StepReport {
        info!("Enabling business mode on {}", self.interface);
        let mut report = StepReport::new();

        let marker = &self.business.marker_path;
        let written = fs::write(marker, &self.business.marker_contents).map_err(|source| {
            StepError::Marker {
                path: marker.clone(),
                source,
            }
        });
        report.record(Step::WriteMarker, written);

        for service in &self.business.services {
            let started = self.privileged(
                "systemctl",
                &["start", "--no-block", service],
                self.command_timeout,
            );
            report.record(Step::StartService(service.clone()), started);
        }

        report.append(self.set_static(&self.static_cidr));
        report
    }

    fn privileged(&self, program: &str, args: &[&str], timeout: Duration) -> Result<(), StepError> {
        let result = match &self.elevate_with {
            Some(wrapper) => {
                let elevated: Vec<&str> = std::iter::once(program)
                    .chain(args.iter().copied())
                    .collect();
                self.runner.run_checked(wrapper, &elevated, timeout)
            }
            None => self.runner.run_checked(program, args, timeout),
        };
        result.map(|_| ()).map_err(StepError::from)
    }

    fn address_listing(&self, interface: &str) -> Option<String> {
        let query = self
            .runner
            .run_checked("ip", &["-4", "addr", "show", "dev", interface], self.command_timeout);
        match query {
            Ok(output) => Some(output.stdout),
            Err(e) => {
                warn!("Could not read addresses of {interface}: {e}");
                None
            }
        }
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
