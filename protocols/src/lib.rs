//! Wire formats the sniffer reads.

pub mod ethernet;
