mod commands;
mod terminal;

use commands::{CommandLine, Commands, discover, iface};
use camscout_common::config::Config;
use camscout_core::discovery::DiscoveryRequest;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let q_level: u8 = commands.global.quiet;

    logging::init_logging(commands.global.verbose, q_level);
    print::banner(q_level);

    let cfg: Config = commands.global.to_config();

    match commands.command {
        Commands::Discover { mode, subnet, timeout } => {
            let request = DiscoveryRequest {
                timeout: timeout.map(std::time::Duration::from_secs),
                ..DiscoveryRequest::from_raw(mode.as_deref(), subnet.as_deref())
            };
            discover::discover(request, &cfg, q_level).await
        }
        Commands::Static { cidr } => iface::apply(iface::Change::Static(cidr), &cfg, q_level).await,
        Commands::Dhcp => iface::apply(iface::Change::Dhcp, &cfg, q_level).await,
        Commands::Subnet { cidr } => iface::apply(iface::Change::Subnet(cidr), &cfg, q_level).await,
        Commands::Business => iface::apply(iface::Change::Business, &cfg, q_level).await,
        Commands::Status => iface::status(&cfg, q_level).await,
    }
}
