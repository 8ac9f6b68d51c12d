use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

/// Prefix length of the subnets suggested from an observed device.
pub const SUGGESTED_PREFIX: u8 = 24;

/// Host part given to this machine when it joins a camera subnet.
pub const HOST_OCTET: u8 = 240;

/// The `/24` an address lives in, e.g. `192.168.40.17` -> `192.168.40.0/24`.
pub fn subnet_of(ip: Ipv4Addr) -> Ipv4Network {
    let [a, b, c, _] = ip.octets();
    Ipv4Network::new(Ipv4Addr::new(a, b, c, 0), SUGGESTED_PREFIX).unwrap_or_else(|_| ip.into())
}

/// Like [`subnet_of`] for textual input; `None` when `ip` is not an IPv4 address.
pub fn subnet_from_ip(ip: &str) -> Option<Ipv4Network> {
    ip.trim().parse::<Ipv4Addr>().ok().map(subnet_of)
}

/// Derives the static address this host takes inside `subnet`.
///
/// `10.0.5.0/24` becomes `10.0.5.240/24`. Anything that is not
/// `a.b.c.d/n` yields `None`.
pub fn host_cidr_in(subnet: &str) -> Option<String> {
    let (addr, prefix) = subnet.trim().split_once('/')?;
    let addr: Ipv4Addr = addr.parse().ok()?;
    let prefix: u8 = prefix.parse().ok()?;
    let network = Ipv4Network::new(addr, prefix).ok()?;

    let [a, b, c, _] = network.ip().octets();
    Some(format!("{a}.{b}.{c}.{HOST_OCTET}/{}", network.prefix()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
