pub mod discover;
pub mod iface;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use camscout_common::config::{self, Config};
use camscout_common::network::device::VendorPrefix;

#[derive(Parser)]
#[command(name = "camscout")]
#[command(about = "Find cameras on the local segment and line the host up with them.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Interface facing the cameras
    #[arg(short, long, global = true, default_value = config::DEFAULT_INTERFACE)]
    pub interface: String,

    /// MAC prefix that identifies a camera
    #[arg(short, long, global = true, default_value = config::DEFAULT_VENDOR_PREFIX)]
    pub prefix: String,

    /// Program used to run privileged commands
    #[arg(long, global = true, default_value = config::DEFAULT_ELEVATION)]
    pub elevate: String,

    /// Run privileged commands directly (already root)
    #[arg(long, global = true, conflicts_with = "elevate")]
    pub no_elevate: bool,

    /// Seconds a single OS command may take
    #[arg(long, global = true, value_name = "SECS")]
    pub command_timeout: Option<u64>,

    /// More log output, repeat for more
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Less output, repeat for less
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look for cameras on the configured interface
    #[command(alias = "d")]
    Discover {
        /// `scan` reads the neighbor table, `sniff` listens on the wire
        #[arg(short, long)]
        mode: Option<String>,
        /// Only keep cameras inside this CIDR (sniff mode)
        #[arg(short, long)]
        subnet: Option<String>,
        /// Seconds to listen for (sniff mode)
        #[arg(short, long, value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Give the interface a fixed address
    Static {
        /// Defaults to the business address
        cidr: Option<String>,
    },
    /// Hand the interface back to DHCP
    Dhcp,
    /// Join a camera subnet as host .240
    Subnet { cidr: String },
    /// Show how the interface is addressed
    #[command(alias = "s")]
    Status,
    /// Become the gateway of a captive camera network
    Business,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl GlobalArgs {
    pub fn to_config(&self) -> Config {
        let defaults = Config::default();
        Config {
            interface: self.interface.clone(),
            vendor_prefix: VendorPrefix::new(&self.prefix),
            command_timeout: self
                .command_timeout
                .map(Duration::from_secs)
                .unwrap_or(defaults.command_timeout),
            elevate_with: (!self.no_elevate).then(|| self.elevate.clone()),
            ..defaults
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
