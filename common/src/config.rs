use std::path::PathBuf;
use std::time::Duration;

use crate::network::device::VendorPrefix;

/// Link-layer prefix registered to EMOS camera hardware.
pub const DEFAULT_VENDOR_PREFIX: &str = "DC:36:43";
pub const DEFAULT_INTERFACE: &str = "eth0";
pub const DEFAULT_STATIC_CIDR: &str = "192.168.40.240/24";
pub const DEFAULT_SNIFF_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DHCP_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_ELEVATION: &str = "sudo";

#[derive(Debug, Clone)]
pub struct Config {
    /// Interface that discovery runs on and that mode changes are applied to.
    pub interface: String,
    /// Cameras are recognised by this prefix of their MAC address.
    pub vendor_prefix: VendorPrefix,
    /// Address used by `static` and business mode.
    pub static_cidr: String,
    pub sniff_timeout: Duration,
    /// Upper bound for a single OS command.
    pub command_timeout: Duration,
    /// Upper bound for the one-shot DHCP lease request.
    pub dhcp_timeout: Duration,
    /// Wrapper that commands mutating host networking are run through.
    ///
    /// `None` runs them directly, which only works when already privileged.
    pub elevate_with: Option<String>,
    pub business: BusinessModeConfig,
}

/// Captive network settings applied by business mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessModeConfig {
    pub marker_path: PathBuf,
    pub marker_contents: String,
    /// Started in order, the DNS/DHCP pair serving the captive network.
    pub services: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: DEFAULT_INTERFACE.to_string(),
            vendor_prefix: VendorPrefix::new(DEFAULT_VENDOR_PREFIX),
            static_cidr: DEFAULT_STATIC_CIDR.to_string(),
            sniff_timeout: DEFAULT_SNIFF_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            dhcp_timeout: DEFAULT_DHCP_TIMEOUT,
            elevate_with: Some(DEFAULT_ELEVATION.to_string()),
            business: BusinessModeConfig::default(),
        }
    }
}

impl Default for BusinessModeConfig {
    fn default() -> Self {
        Self {
            marker_path: PathBuf::from("/etc/camscout/mode"),
            marker_contents: String::from("business"),
            services: vec![String::from("dnsmasq"), String::from("nodogsplash")],
        }
    }
}
