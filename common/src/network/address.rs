use std::fmt;

use pnet::ipnetwork::Ipv4Network;

/// The IPv4 address and prefix an interface currently holds, e.g. `192.168.40.240/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub cidr: Ipv4Network,
}

impl InterfaceAddress {
    /// Reads the first `inet` entry of an `ip -4 addr show` listing.
    ///
    /// ```text
    /// 2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc mq state UP
    ///     inet 192.168.40.240/24 scope global eth0
    /// ```
    pub fn from_listing(listing: &str) -> Option<Self> {
        listing
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("inet "))
            .find_map(|line| line.split_whitespace().nth(1)?.parse().ok())
            .map(|cidr| Self { cidr })
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cidr.ip(), self.cidr.prefix())
    }
}
