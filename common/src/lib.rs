//! Shared building blocks for camera discovery and host interface management.
//!
//! * [`config`]: the values every component is constructed from.
//! * [`error`]: the soft/hard failure taxonomy.
//! * [`network`]: devices, vendor prefixes, addresses and subnets.
//! * [`process`]: the injectable process invocation capability.

pub mod config;
pub mod error;
pub mod network;
pub mod process;
