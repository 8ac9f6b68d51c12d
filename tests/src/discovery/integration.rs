use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use camscout_common::config::Config;
use camscout_common::error::DiscoveryError;
use camscout_core::discovery::{DiscoveryMode, DiscoveryOrchestrator, DiscoveryRequest};
use camscout_core::interface::InterfaceController;
use camscout_core::resolver::AddressResolver;
use camscout_core::sniffer::PassiveSniffer;

use crate::util::{frame, FakeHost, WireReplay, CAMERA_A, CAMERA_B, ROUTER};

const NEIGHBORS: &str = "\
192.168.1.1 dev eth0 lladdr 00:1a:2b:3c:4d:5e REACHABLE
192.168.1.5 dev eth0 lladdr DC:36:43:AA:BB:CC REACHABLE
192.168.1.6 dev eth0  INCOMPLETE
172.17.0.9 dev docker0 lladdr dc:36:43:00:00:09 STALE
";

fn config() -> Config {
    Config {
        sniff_timeout: Duration::from_millis(100),
        ..Config::default()
    }
}

fn orchestrator(host: Arc<FakeHost>, wire: WireReplay) -> DiscoveryOrchestrator {
    let cfg = config();
    DiscoveryOrchestrator::new(
        AddressResolver::new(host, cfg.command_timeout),
        PassiveSniffer::new(Box::new(wire)),
        &cfg,
    )
}

#[test]
fn scan_then_join_the_suggested_subnet() -> anyhow::Result<()> {
    let host = Arc::new(FakeHost::new("eth0").with_neighbors(NEIGHBORS));
    let orchestrator = orchestrator(host.clone(), WireReplay::new("eth0", vec![]));

    let outcome = orchestrator.discover(&DiscoveryRequest::from_raw(None, None))?;
    assert_eq!(outcome.mode, DiscoveryMode::Scan);
    assert_eq!(outcome.devices.len(), 1);
    assert_eq!(outcome.devices[0].ip, Ipv4Addr::new(192, 168, 1, 5));
    assert_eq!(outcome.devices[0].mac_string(), "DC:36:43:AA:BB:CC");

    let suggestion = outcome.suggested_subnet.expect("a camera was found");
    let controller = InterfaceController::new(host.clone(), &config());
    let report = controller
        .set_subnet(&suggestion.to_string())
        .expect("suggestions are well formed");

    assert!(report.all_succeeded());
    assert_eq!(host.addresses(), vec!["192.168.1.240/24"]);
    assert!(controller.is_static("192.168.1.240/24"));
    Ok(())
}

#[test]
fn sniff_finds_cameras_on_foreign_subnets() -> anyhow::Result<()> {
    let wire = WireReplay::new(
        "eth0",
        vec![
            frame(ROUTER, Ipv4Addr::new(192, 168, 1, 1)),
            frame(CAMERA_A, Ipv4Addr::new(192, 168, 1, 20)),
            frame(CAMERA_B, Ipv4Addr::new(10, 10, 0, 3)),
            frame(CAMERA_A, Ipv4Addr::new(192, 168, 40, 20)),
        ],
    );
    let orchestrator = orchestrator(Arc::new(FakeHost::new("eth0")), wire);

    let outcome = orchestrator.discover(&DiscoveryRequest::from_raw(Some("sniff"), None))?;

    let found: Vec<(String, Ipv4Addr)> = outcome
        .devices
        .iter()
        .map(|device| (device.mac_string(), device.ip))
        .collect();
    assert_eq!(
        found,
        vec![
            ("DC:36:43:0A:1B:2C".to_string(), Ipv4Addr::new(192, 168, 40, 20)),
            ("DC:36:43:0A:1B:2D".to_string(), Ipv4Addr::new(10, 10, 0, 3)),
        ]
    );
    assert_eq!(outcome.suggested_subnet, Some("192.168.40.0/24".parse()?));
    Ok(())
}

#[test]
fn sniff_with_filter_keeps_one_subnet() -> anyhow::Result<()> {
    let wire = WireReplay::new(
        "eth0",
        vec![
            frame(CAMERA_A, Ipv4Addr::new(10, 0, 1, 9)),
            frame(CAMERA_B, Ipv4Addr::new(10, 0, 0, 9)),
        ],
    );
    let orchestrator = orchestrator(Arc::new(FakeHost::new("eth0")), wire);

    let request = DiscoveryRequest::from_raw(Some("sniff"), Some("10.0.0.0/24"));
    let outcome = orchestrator.discover(&request)?;

    assert_eq!(outcome.devices.len(), 1);
    assert_eq!(outcome.devices[0].ip, Ipv4Addr::new(10, 0, 0, 9));
    assert!(outcome.suggested_subnet.is_none());
    Ok(())
}

#[test]
fn sniff_on_an_unknown_interface_is_reported() {
    let wire = WireReplay::new("enp3s0", vec![]);
    let orchestrator = orchestrator(Arc::new(FakeHost::new("eth0")), wire);

    let err = orchestrator
        .discover(&DiscoveryRequest::from_raw(Some("sniff"), None))
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::InterfaceNotFound(ref name) if name == "eth0"));
    assert!(err.to_string().contains("eth0"));
}

#[test]
fn scan_survives_a_broken_neighbor_table() -> anyhow::Result<()> {
    let host = Arc::new(FakeHost::new("eth0").with_neighbors("garbage\n\n1 2 3\n"));
    let orchestrator = orchestrator(host, WireReplay::new("eth0", vec![]));

    let outcome = orchestrator.discover(&DiscoveryRequest::from_raw(Some("scan"), None))?;

    assert!(outcome.devices.is_empty());
    assert!(outcome.suggested_subnet.is_none());
    Ok(())
}

#[test]
fn sniff_sees_cameras_on_a_tagged_vlan() -> anyhow::Result<()> {
    let mut tagged = frame(CAMERA_A, Ipv4Addr::new(192, 168, 40, 20));
    tagged.splice(12..12, [0x81, 0x00, 0x00, 0x28]);
    let wire = WireReplay::new("eth0", vec![tagged]);
    let orchestrator = orchestrator(Arc::new(FakeHost::new("eth0")), wire);

    let outcome = orchestrator.discover(&DiscoveryRequest::from_raw(Some("sniff"), None))?;

    assert_eq!(outcome.devices.len(), 1);
    assert_eq!(outcome.devices[0].ip, Ipv4Addr::new(192, 168, 40, 20));
    Ok(())
}

#[test]
fn sniff_returns_within_its_timeout() -> anyhow::Result<()> {
    let wire = WireReplay::new("eth0", vec![]);
    let orchestrator = orchestrator(Arc::new(FakeHost::new("eth0")), wire);
    let request = DiscoveryRequest {
        timeout: Some(Duration::from_millis(200)),
        ..DiscoveryRequest::from_raw(Some("sniff"), None)
    };
    let started = std::time::Instant::now();

    let outcome = orchestrator.discover(&request)?;

    assert!(outcome.devices.is_empty());
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert!(started.elapsed() < Duration::from_secs(2));
    Ok(())
}
