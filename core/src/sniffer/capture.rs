//! Where captured frames come from.
//!
//! [`CaptureSource`] is the seam between the sniffer and the platform: the
//! real implementation opens a pnet datalink channel, tests hand out pnet's
//! dummy channel preloaded with frames.

use std::io;
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};

use camscout_common::network::interface;

/// How long a single read may block before the capture deadline is re-checked.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

pub trait CaptureSource: Send + Sync {
    /// Looks up the interface to capture on, `None` when it does not exist.
    fn interface(&self, name: &str) -> Option<NetworkInterface>;

    /// Opens a receive-only Ethernet channel on `interface`.
    fn open(&self, interface: &NetworkInterface) -> io::Result<Box<dyn DataLinkReceiver>>;
}

/// Live capture through the operating system's datalink layer.
///
/// Needs the privileges of a raw socket (root or `CAP_NET_RAW`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DatalinkCapture;

impl CaptureSource for DatalinkCapture {
    fn interface(&self, name: &str) -> Option<NetworkInterface> {
        interface::find_by_name(interface::local_interfaces(), name)
    }

    fn open(&self, interface: &NetworkInterface) -> io::Result<Box<dyn DataLinkReceiver>> {
        open_receiver(interface, get_config(), datalink::channel)
    }
}

pub(crate) fn open_receiver<F>(
    intf: &NetworkInterface,
    cfg: Config,
    channel_opener: F,
) -> io::Result<Box<dyn DataLinkReceiver>>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    match channel_opener(intf, cfg)? {
        Channel::Ethernet(_tx, rx) => Ok(rx),
        _ => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("non-ethernet channel for {}", intf.name),
        )),
    }
}

fn get_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        promiscuous: true,
        ..Default::default()
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
