//! # Passive sniffer
//!
//! Listens to live traffic on an interface for a bounded time and reports
//! every camera that spoke IPv4 while it listened. Unlike the neighbor table
//! this works across subnet boundaries: a camera still configured for a
//! foreign network is found as soon as it sends anything.
//!
//! Capture blocks the caller for at most the requested duration. Frames are
//! read on a separate thread and handed over through a channel, so a receiver
//! that stalls cannot hold the caller past its deadline. Two captures on the
//! same interface conflict at the platform level, so callers must serialise
//! them (the orchestrator holds a per-interface lock for this).

use std::collections::HashMap;
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use pnet::datalink::{DataLinkReceiver, NetworkInterface};
use pnet::ipnetwork::Ipv4Network;
use pnet::util::MacAddr;
use tracing::{debug, info, trace, warn};

use camscout_common::error::DiscoveryError;
use camscout_common::network::device::{Device, VendorPrefix};
use camscout_protocols::ethernet::{self, FrameIdentity};

pub mod capture;

use capture::CaptureSource;

pub struct PassiveSniffer {
    capture: Box<dyn CaptureSource>,
}

impl PassiveSniffer {
    pub fn new(capture: Box<dyn CaptureSource>) -> Self {
        Self { capture }
    }

    /// Captures on `interface` for `timeout` and returns the cameras seen.
    ///
    /// With a `subnet` filter only addresses inside it are kept. Results hold
    /// one entry per MAC, in order of first sighting, carrying the last IPv4
    /// address seen for it.
    ///
    /// An interface that does not exist is an error. A capture that cannot be
    /// opened (missing privileges, unsupported link type) yields an empty list.
    pub fn sniff(
        &self,
        interface: &str,
        prefix: &VendorPrefix,
        timeout: Duration,
        subnet: Option<Ipv4Network>,
    ) -> Result<Vec<Device>, DiscoveryError> {
        let intf: NetworkInterface = self
            .capture
            .interface(interface)
            .ok_or_else(|| DiscoveryError::InterfaceNotFound(interface.to_string()))?;

        let rx: Box<dyn DataLinkReceiver> = match self.capture.open(&intf) {
            Ok(rx) => rx,
            Err(e) => {
                warn!("Cannot capture on {interface}: {e}");
                return Ok(Vec::new());
            }
        };

        info!("Listening on {interface} for {:.1}s", timeout.as_secs_f64());
        let mut sightings = Sightings::new(prefix, subnet);
        listen(rx, timeout, &mut sightings);

        let devices: Vec<Device> = sightings.into_devices();
        info!("Sniffing {interface} found {} device(s)", devices.len());
        Ok(devices)
    }
}

fn listen(rx: Box<dyn DataLinkReceiver>, timeout: Duration, sightings: &mut Sightings) {
    let deadline: Instant = Instant::now() + timeout;
    let stop: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    let frames: Receiver<Vec<u8>> = spawn_reader(rx, stop.clone());

    loop {
        let now: Instant = Instant::now();
        if now >= deadline {
            break;
        }
        match frames.recv_timeout(deadline - now) {
            Ok(frame) => sightings.observe(&frame),
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Capture ended {:.1}s early", (deadline - now).as_secs_f64());
                break;
            }
        }
    }

    stop.store(true, Ordering::Relaxed);
}

/// Moves `rx` onto its own thread and forwards every frame it yields.
///
/// The thread exits once `stop` is set and the current read returns, when the
/// receiving side is gone, or on the first error that is not a read timeout.
fn spawn_reader(rx: Box<dyn DataLinkReceiver>, stop: Arc<AtomicBool>) -> Receiver<Vec<u8>> {
    let (tx, frames) = mpsc::channel::<Vec<u8>>();
    let spawned = thread::Builder::new()
        .name("camscout-capture".to_string())
        .spawn(move || read_frames(rx, tx, stop));
    if let Err(e) = spawned {
        warn!("Cannot start capture reader: {e}");
    }
    frames
}

fn read_frames(mut rx: Box<dyn DataLinkReceiver>, tx: Sender<Vec<u8>>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        match rx.next() {
            Ok(frame) => {
                if tx.send(frame.to_vec()).is_err() {
                    return;
                }
            }
            Err(e) if is_idle_read(&e) => trace!("capture read: {e}"),
            Err(e) => {
                warn!("Capture stopped: {e}");
                return;
            }
        }
    }
}

fn is_idle_read(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Camera sightings keyed by MAC; a new sighting overwrites the stored IP.
pub(crate) struct Sightings<'a> {
    prefix: &'a VendorPrefix,
    subnet: Option<Ipv4Network>,
    order: Vec<MacAddr>,
    latest: HashMap<MacAddr, Ipv4Addr>,
}

impl<'a> Sightings<'a> {
    pub(crate) fn new(prefix: &'a VendorPrefix, subnet: Option<Ipv4Network>) -> Self {
        Self {
            prefix,
            subnet,
            order: Vec::new(),
            latest: HashMap::new(),
        }
    }

    pub(crate) fn observe(&mut self, frame: &[u8]) {
        let identity: FrameIdentity = match ethernet::decode_identity(frame) {
            Ok(identity) => identity,
            Err(e) => {
                trace!("skipping frame: {e}");
                return;
            }
        };

        if !self.prefix.matches_mac(identity.source_mac) {
            return;
        }
        let Some(ip) = identity.source_ipv4 else {
            return;
        };
        if let Some(subnet) = self.subnet
            && !subnet.contains(ip)
        {
            trace!("{ip} is outside {subnet}");
            return;
        }

        let mac: MacAddr = identity.source_mac;
        match self.latest.insert(mac, ip) {
            None => {
                debug!("Camera {} at {ip}", Device::new(mac, ip).mac_string());
                self.order.push(mac);
            }
            Some(previous) if previous != ip => {
                let mac_text: String = Device::new(mac, ip).mac_string();
                debug!("Camera {mac_text} moved from {previous} to {ip}");
            }
            Some(_) => {}
        }
    }

    pub(crate) fn into_devices(self) -> Vec<Device> {
        self.order
            .into_iter()
            .filter_map(|mac| self.latest.get(&mac).map(|ip| Device::new(mac, *ip)))
            .collect()
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
