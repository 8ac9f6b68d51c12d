use colored::*;
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::Ipv4Network;

use camscout_common::network::device::{Device, canonical_mac};
use camscout_common::network::interface::NetworkInterfaceExtension;
use camscout_common::network::mac;
use camscout_core::interface::StepOutcome;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn net_to_detail(net: &Ipv4Network) -> Detail {
    let address: ColoredString = net.ip().to_string().color(colors::IPV4_ADDR);
    let prefix: ColoredString = net.prefix().to_string().color(colors::IPV4_PREFIX);
    ("IPv4".to_string(), format!("{address}/{prefix}").color(colors::SEPARATOR))
}

pub fn device_to_details(device: &Device) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("IPv4".to_string(), device.ip.to_string().color(colors::IPV4_ADDR)),
        ("MAC".to_string(), device.mac_string().color(colors::MAC_ADDR)),
    ];
    if let Some(vendor) = mac::get_vendor(device.mac) {
        details.push(("Vendor".to_string(), vendor.color(colors::VENDOR)));
    }
    details
}

pub fn interface_to_details(interface: &NetworkInterface) -> Vec<Detail> {
    let mut details: Vec<Detail> = interface.get_ipv4_nets().iter().map(net_to_detail).collect();
    if let Some(mac_addr) = interface.mac {
        details.push(("MAC".to_string(), canonical_mac(mac_addr).color(colors::MAC_ADDR)));
    }
    details
}

pub fn step_to_detail(outcome: &StepOutcome) -> Detail {
    let value: ColoredString = match &outcome.result {
        Ok(()) => "ok".color(colors::SUCCESS).bold(),
        Err(e) => e.to_string().color(colors::FAILURE),
    };
    (outcome.step.to_string(), value)
}
