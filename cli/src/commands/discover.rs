use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::info_span;

use camscout_common::config::Config;
use camscout_common::network::device::Device;
use camscout_common::process::SystemRunner;
use camscout_core::discovery::{DiscoveryOrchestrator, DiscoveryOutcome, DiscoveryRequest};
use camscout_core::resolver::AddressResolver;
use camscout_core::sniffer::PassiveSniffer;
use camscout_core::sniffer::capture::DatalinkCapture;

use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn discover(request: DiscoveryRequest, cfg: &Config, q_level: u8) -> anyhow::Result<()> {
    let span = info_span!("discovery", indicatif.pb_show = true);
    let guard = span.enter();

    let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let label: String = format!("Looking for cameras on {} ({})", cfg.interface, request.mode);
    let spinner_handle = spinner::start_discovery_spinner(span.clone(), running.clone(), label);

    let start_time: Instant = Instant::now();
    let worker_cfg: Config = cfg.clone();
    let result = tokio::task::spawn_blocking(move || {
        let orchestrator = DiscoveryOrchestrator::new(
            AddressResolver::new(Arc::new(SystemRunner), worker_cfg.command_timeout),
            PassiveSniffer::new(Box::new(DatalinkCapture)),
            &worker_cfg,
        );
        orchestrator.discover(&request)
    })
    .await;

    running.store(false, Ordering::Relaxed);
    let _ = spinner_handle.join();
    drop(guard);

    let outcome: DiscoveryOutcome = result
        .context("discovery worker panicked")?
        .with_context(|| format!("discovery on {} failed", cfg.interface))?;

    discovery_ends(&outcome, start_time.elapsed(), q_level);
    Ok(())
}

fn discovery_ends(outcome: &DiscoveryOutcome, total_time: Duration, q_level: u8) {
    if outcome.devices.is_empty() {
        print::header("no cameras detected", q_level);
        if q_level == 0 {
            print::no_results();
        }
        return;
    }

    print::header("camera discovery", q_level);
    print_devices(&outcome.devices, q_level);
    print_summary(outcome, total_time, q_level);
}

fn print_devices(devices: &[Device], q_level: u8) {
    for (idx, device) in devices.iter().enumerate() {
        match q_level {
            0 | 1 => {
                print::tree_head(idx, &device.ip.to_string());
                print::as_tree_one_level(format::device_to_details(device));
            }
            _ => mprint!(&device.to_string()),
        }
        if q_level < 2 && idx + 1 != devices.len() {
            mprint!();
        }
    }
}

fn print_summary(outcome: &DiscoveryOutcome, total_time: Duration, q_level: u8) {
    let found: ColoredString = format!("{} camera(s)", outcome.devices.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Discovery Complete: {found} found in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    if q_level >= 2 {
        return;
    }
    print::fat_separator();
    print::centerln(&output);
    if let Some(subnet) = outcome.suggested_subnet {
        print::aligned_line("Suggested subnet", subnet.to_string().color(colors::IPV4_ADDR), 16);
        print::print_status(format!("Run `camscout subnet {subnet}` to join it"));
    }
}
