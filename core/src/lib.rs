//! Camera discovery and host interface mode management.
//!
//! The [`discovery::DiscoveryOrchestrator`] is the entry point. It picks one of
//! the two strategies, the neighbor-table [`resolver::AddressResolver`] or the
//! live-capture [`sniffer::PassiveSniffer`], while the
//! [`interface::InterfaceController`] moves the host between DHCP, static and
//! business addressing.

pub mod discovery;
pub mod interface;
pub mod resolver;
pub mod sniffer;

#[cfg(test)]
pub(crate) mod testing;
