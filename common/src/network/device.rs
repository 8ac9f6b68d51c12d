use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// A camera seen on the wire or in the neighbor table.
///
/// The MAC is the identity; the IP is whatever was observed last for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device {
    pub mac: MacAddr,
    pub ip: Ipv4Addr,
}

impl Device {
    pub fn new(mac: MacAddr, ip: Ipv4Addr) -> Self {
        Self { mac, ip }
    }

    /// The MAC in canonical colon-hex, uppercase.
    pub fn mac_string(&self) -> String {
        canonical_mac(self.mac)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ip, self.mac_string())
    }
}

/// Uppercase colon-hex, e.g. `DC:36:43:0A:1B:2C`.
pub fn canonical_mac(mac: MacAddr) -> String {
    format!(
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac.0, mac.1, mac.2, mac.3, mac.4, mac.5
    )
}

/// Leading part of a MAC address that fingerprints a hardware vendor.
///
/// Matching is textual: the candidate is upper-cased and must start with the
/// prefix character for character, separators included. `DC:36:43` therefore
/// matches the first eight characters of `dc:36:43:aa:bb:cc` but not
/// `DC3643AABBCC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorPrefix(String);

impl VendorPrefix {
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self(prefix.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, link_addr: &str) -> bool {
        link_addr.to_uppercase().starts_with(&self.0)
    }

    pub fn matches_mac(&self, mac: MacAddr) -> bool {
        canonical_mac(mac).starts_with(&self.0)
    }
}

impl fmt::Display for VendorPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
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
