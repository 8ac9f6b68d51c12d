//! # Neighbor table resolver
//!
//! Finds cameras the kernel has already talked to by reading the IPv4 neighbor
//! (ARP) cache. This is a point-in-time query, nothing is sent or captured, so
//! it only sees devices on subnets the host is currently part of.
//!
//! The full table is listed (`ip -4 neigh show`) so every row has the shape
//!
//! ```text
//! 192.168.40.17 dev eth0 lladdr dc:36:43:0a:1b:2c REACHABLE
//! ```
//!
//! with the link-layer address at a fixed column.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use pnet::util::MacAddr;
use tracing::{debug, info, warn};

use camscout_common::network::device::{Device, VendorPrefix};
use camscout_common::process::CommandRunner;

const NEIGH_ARGS: [&str; 3] = ["-4", "neigh", "show"];
const LINK_ADDR_COLUMN: usize = 4;

pub struct AddressResolver {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl AddressResolver {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    /// Cameras in the neighbor table of `interface` whose MAC starts with `prefix`.
    ///
    /// Any failure to query the table (tool missing, non-zero exit, timeout)
    /// yields an empty list.
    pub fn find_devices(&self, interface: &str, prefix: &VendorPrefix) -> Vec<Device> {
        let output = match self.runner.run_checked("ip", &NEIGH_ARGS, self.timeout) {
            Ok(output) => output,
            Err(e) => {
                warn!("Could not read the neighbor table: {e}");
                return Vec::new();
            }
        };

        let devices: Vec<Device> = parse_neighbor_table(&output.stdout, interface, prefix);
        info!(
            "Neighbor table of {interface} lists {} device(s) matching {prefix}",
            devices.len()
        );
        devices
    }

    /// The addresses of [`AddressResolver::find_devices`], in table order.
    pub fn find_device_ips(&self, interface: &str, prefix: &VendorPrefix) -> Vec<Ipv4Addr> {
        self.find_devices(interface, prefix)
            .into_iter()
            .map(|device| device.ip)
            .collect()
    }
}

/// Extracts matching devices from `ip -4 neigh show` output.
///
/// A row qualifies when it has at least five tokens and its fifth token,
/// upper-cased, starts with `prefix`. Rows that explicitly name another `dev`
/// are ignored, and qualifying rows without a usable IPv4 or MAC are dropped.
pub fn parse_neighbor_table(table: &str, interface: &str, prefix: &VendorPrefix) -> Vec<Device> {
    table
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() <= LINK_ADDR_COLUMN || !prefix.matches(parts[LINK_ADDR_COLUMN]) {
                return None;
            }
            if parts[1] == "dev" && parts[2] != interface {
                return None;
            }

            let ip: Option<Ipv4Addr> = parts[0].parse().ok();
            let mac: Option<MacAddr> = parts[LINK_ADDR_COLUMN].parse().ok();
            match (mac, ip) {
                (Some(mac), Some(ip)) => Some(Device::new(mac, ip)),
                _ => {
                    debug!("Dropping unusable neighbor row: {line}");
                    None
                }
            }
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
