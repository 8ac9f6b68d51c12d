//! Canned stand-ins for the host, shared by the unit tests of this crate.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pnet::datalink::{DataLinkReceiver, NetworkInterface, dummy};
use pnet::util::MacAddr;

use camscout_common::error::CommandError;
use camscout_common::process::{CommandOutput, CommandRunner};
use camscout_protocols::ethernet;

use crate::sniffer::capture::CaptureSource;

/// Replies to known command lines with canned output and records every call.
///
/// Unknown command lines behave like a missing tool.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, command_line: &str, stdout: &str) -> Self {
        self.replies.insert(
            command_line.to_string(),
            CommandOutput {
                exit_code: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    pub fn fail(mut self, command_line: &str, exit_code: i32, stderr: &str) -> Self {
        self.replies.insert(
            command_line.to_string(),
            CommandOutput {
                exit_code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        let command_line: String = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<&str>>()
            .join(" ");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command_line.clone());
        }
        self.replies
            .get(&command_line)
            .cloned()
            .ok_or_else(|| CommandError::Unavailable {
                program: program.to_string(),
            })
    }
}

/// A host whose `ip`, `dhclient` and `systemctl` keep state between calls.
///
/// Commands may be prefixed with `sudo`. A DHCP request always leases
/// [`SimulatedHost::LEASE`].
pub struct SimulatedHost {
    interface: String,
    state: Mutex<HostState>,
}

#[derive(Default)]
struct HostState {
    addresses: Vec<String>,
    services: Vec<String>,
}

impl SimulatedHost {
    pub const LEASE: &'static str = "192.168.1.57/24";

    pub fn new(interface: &str) -> Self {
        Self {
            interface: interface.to_string(),
            state: Mutex::new(HostState::default()),
        }
    }

    pub fn addresses(&self) -> Vec<String> {
        self.state.lock().map(|s| s.addresses.clone()).unwrap_or_default()
    }

    pub fn started_services(&self) -> Vec<String> {
        self.state.lock().map(|s| s.services.clone()).unwrap_or_default()
    }

    fn listing(&self, addresses: &[String]) -> String {
        let mut listing = format!(
            "2: {}: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500\n",
            self.interface
        );
        for cidr in addresses {
            listing.push_str(&format!("    inet {cidr} scope global {}\n", self.interface));
        }
        listing
    }
}

impl CommandRunner for SimulatedHost {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<CommandOutput, CommandError> {
        let mut words: Vec<&str> = std::iter::once(program).chain(args.iter().copied()).collect();
        if words.first() == Some(&"sudo") {
            words.remove(0);
        }
        let intf: &str = &self.interface;
        let mut state = self.state.lock().map_err(|_| CommandError::Unavailable {
            program: program.to_string(),
        })?;

        let ok = |stdout: String| CommandOutput {
            exit_code: 0,
            stdout,
            stderr: String::new(),
        };
        let output: CommandOutput = match words.as_slice() {
            ["ip", "addr", "flush", "dev", dev] if *dev == intf => {
                state.addresses.clear();
                ok(String::new())
            }
            ["ip", "addr", "add", cidr, "dev", dev] if *dev == intf => {
                state.addresses.push(cidr.to_string());
                ok(String::new())
            }
            ["ip", "link", "set", dev, "up"] if *dev == intf => ok(String::new()),
            ["ip", "-4", "addr", "show", "dev", dev] if *dev == intf => {
                ok(self.listing(&state.addresses))
            }
            ["dhclient", "-1", dev] if *dev == intf => {
                state.addresses.push(Self::LEASE.to_string());
                ok(String::new())
            }
            ["systemctl", "start", "--no-block", service] => {
                state.services.push(service.to_string());
                ok(String::new())
            }
            _ => CommandOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: "Cannot find device".to_string(),
            },
        };
        Ok(output)
    }
}

/// How long an exhausted replay waits before reporting an idle read.
const IDLE_READ: Duration = Duration::from_millis(10);

enum Wire {
    Frames(Vec<Vec<u8>>),
    Denied,
    Receiver(Mutex<Option<Box<dyn DataLinkReceiver>>>),
}

/// Capture on an interface named like pnet's dummy one, fed from memory.
pub struct ReplayCapture {
    interface: String,
    wire: Wire,
}

impl ReplayCapture {
    /// Replays `frames` once, then behaves like a quiet link.
    pub fn new(interface: &str, frames: Vec<Vec<u8>>) -> Self {
        Self {
            interface: interface.to_string(),
            wire: Wire::Frames(frames),
        }
    }

    /// An interface that exists but cannot be captured on.
    pub fn denied(interface: &str) -> Self {
        Self {
            interface: interface.to_string(),
            wire: Wire::Denied,
        }
    }

    /// Hands out `receiver` on the first open.
    pub fn with_receiver(interface: &str, receiver: Box<dyn DataLinkReceiver>) -> Self {
        Self {
            interface: interface.to_string(),
            wire: Wire::Receiver(Mutex::new(Some(receiver))),
        }
    }
}

impl CaptureSource for ReplayCapture {
    fn interface(&self, name: &str) -> Option<NetworkInterface> {
        (name == self.interface).then(|| NetworkInterface {
            name: self.interface.clone(),
            ..dummy::dummy_interface(0)
        })
    }

    fn open(&self, _interface: &NetworkInterface) -> io::Result<Box<dyn DataLinkReceiver>> {
        match &self.wire {
            Wire::Frames(frames) => Ok(Box::new(ReplayReceiver {
                pending: frames.iter().cloned().collect(),
                current: Vec::new(),
            })),
            Wire::Denied => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Operation not permitted",
            )),
            Wire::Receiver(receiver) => receiver
                .lock()
                .ok()
                .and_then(|mut receiver| receiver.take())
                .ok_or_else(|| io::Error::other("receiver already handed out")),
        }
    }
}

/// Yields queued frames, then read timeouts like a socket with nothing to read.
struct ReplayReceiver {
    pending: VecDeque<Vec<u8>>,
    current: Vec<u8>,
}

impl DataLinkReceiver for ReplayReceiver {
    fn next(&mut self) -> io::Result<&[u8]> {
        match self.pending.pop_front() {
            Some(frame) => {
                self.current = frame;
                Ok(&self.current)
            }
            None => {
                thread::sleep(IDLE_READ);
                Err(io::Error::new(io::ErrorKind::TimedOut, "no frames left"))
            }
        }
    }
}

/// A receiver whose every read hangs for `stall`.
pub struct StalledReceiver {
    pub stall: Duration,
}

impl DataLinkReceiver for StalledReceiver {
    fn next(&mut self) -> io::Result<&[u8]> {
        thread::sleep(self.stall);
        Err(io::Error::new(io::ErrorKind::TimedOut, "stalled"))
    }
}

/// A receiver that fails every read at once, counting the attempts.
pub struct BrokenReceiver {
    pub reads: Arc<AtomicUsize>,
}

impl DataLinkReceiver for BrokenReceiver {
    fn next(&mut self) -> io::Result<&[u8]> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::NetworkDown, "Network is down"))
    }
}

/// An Ethernet + IPv4 frame sent by `mac` from `ip`.
pub fn frame(mac: MacAddr, ip: Ipv4Addr) -> Vec<u8> {
    ethernet::create_ipv4_frame(mac, MacAddr::broadcast(), ip, Ipv4Addr::BROADCAST)
        .expect("frame buffer is sized for the headers")
}
