//! Subcommands that change or show how the camera-facing interface is addressed.

use std::sync::Arc;

use colored::*;
use tracing::warn;

use camscout_common::config::Config;
use camscout_common::network::interface;
use camscout_common::process::SystemRunner;
use camscout_core::interface::{InterfaceController, StepReport};

use crate::terminal::{colors, format, print};

pub enum Change {
    Static(Option<String>),
    Dhcp,
    Subnet(String),
    Business,
}

pub fn controller(cfg: &Config) -> InterfaceController {
    InterfaceController::new(Arc::new(SystemRunner), cfg)
}

pub async fn apply(change: Change, cfg: &Config, q_level: u8) -> anyhow::Result<()> {
    if cfg.elevate_with.is_none() && !is_root::is_root() {
        warn!("Not running as root and elevation is disabled, changes will likely fail");
    }

    let worker_cfg: Config = cfg.clone();
    let (title, report): (String, Option<StepReport>) = tokio::task::spawn_blocking(move || {
        let controller = controller(&worker_cfg);
        match change {
            Change::Static(cidr) => {
                let cidr: String = cidr.unwrap_or_else(|| worker_cfg.static_cidr.clone());
                (format!("static {cidr}"), Some(controller.set_static(&cidr)))
            }
            Change::Dhcp => ("dhcp".to_string(), Some(controller.set_dhcp())),
            Change::Subnet(subnet) => (format!("join {subnet}"), controller.set_subnet(&subnet)),
            Change::Business => (
                "business mode".to_string(),
                Some(controller.enable_business_mode()),
            ),
        }
    })
    .await?;

    print::header(&title, q_level);
    match report {
        Some(report) => print_report(&cfg.interface, &report, q_level),
        None => print::print_status(
            "Not a subnet in a.b.c.d/n form, nothing changed"
                .color(colors::FAILURE)
                .to_string(),
        ),
    }
    Ok(())
}

/// The per-step tree is dropped from `-qq` on, leaving only the summary line.
fn shows_step_tree(q_level: u8) -> bool {
    q_level < 2
}

fn print_report(interface: &str, report: &StepReport, q_level: u8) {
    if shows_step_tree(q_level) {
        print::tree_head(0, interface);
        print::as_tree_one_level(report.steps().iter().map(format::step_to_detail).collect());
    }

    let failed: usize = report.failed_steps().count();
    if failed == 0 {
        print::print_status("All steps succeeded".color(colors::SUCCESS).to_string());
    } else {
        print::print_status(
            format!("{failed} step(s) failed, the interface may be left without an address")
                .color(colors::FAILURE)
                .to_string(),
        );
    }
}

pub async fn status(cfg: &Config, q_level: u8) -> anyhow::Result<()> {
    let worker_cfg: Config = cfg.clone();
    let (address, is_business) = tokio::task::spawn_blocking(move || {
        let controller = controller(&worker_cfg);
        (
            controller.current_address(),
            controller.is_static(&worker_cfg.static_cidr),
        )
    })
    .await?;

    print::header("interface status", q_level);
    let address: ColoredString = match address {
        Some(address) => address.to_string().color(colors::IPV4_ADDR),
        None => "none".color(colors::FAILURE),
    };
    print::aligned_line("Interface", cfg.interface.as_str(), 14);
    print::aligned_line("Address", address, 14);
    print::aligned_line("Business addr", if is_business { "yes" } else { "no" }, 14);

    if q_level > 0 {
        return Ok(());
    }
    print::header("local interfaces", q_level);
    let interfaces = interface::local_interfaces();
    for (idx, intf) in interfaces.iter().enumerate() {
        print::tree_head(idx, &intf.name);
        print::as_tree_one_level(format::interface_to_details(intf));
    }
    Ok(())
}
