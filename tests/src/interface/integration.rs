use std::sync::Arc;

use camscout_common::config::{BusinessModeConfig, Config};
use camscout_core::interface::{InterfaceController, Step};

use crate::util::FakeHost;

fn controller(host: &Arc<FakeHost>) -> InterfaceController {
    InterfaceController::new(host.clone(), &Config::default())
}

#[test]
fn static_and_dhcp_round_trip() {
    let host = Arc::new(FakeHost::new("eth0"));
    let controller = controller(&host);

    assert!(controller.set_static("192.168.40.240/24").all_succeeded());
    assert!(controller.is_static("192.168.40.240/24"));
    let current = controller.current_address().map(|a| a.to_string());
    assert_eq!(current.as_deref(), Some("192.168.40.240/24"));

    assert!(controller.set_dhcp().all_succeeded());
    assert!(!controller.is_static("192.168.40.240/24"));
    assert_eq!(host.addresses(), vec![FakeHost::LEASE]);
}

#[test]
fn repeated_static_keeps_the_last_address() {
    let host = Arc::new(FakeHost::new("eth0"));
    let controller = controller(&host);

    let _ = controller.set_static("192.168.40.240/24");
    let _ = controller.set_static("10.0.5.240/24");

    assert_eq!(host.addresses(), vec!["10.0.5.240/24"]);
}

#[test]
fn malformed_subnet_leaves_the_host_alone() {
    let host = Arc::new(FakeHost::new("eth0"));
    let controller = controller(&host);

    assert!(controller.set_subnet("not-a-subnet").is_none());
    assert!(controller.set_subnet("10.0.5.0").is_none());
    assert!(host.log().is_empty());
}

#[test]
fn missing_sudo_fails_every_step_without_aborting() {
    let host = Arc::new(FakeHost::new("eth0").without_sudo());
    let controller = controller(&host);

    let report = controller.set_static("192.168.40.240/24");

    assert_eq!(report.failed_steps().count(), 3);
    assert_eq!(host.log().len(), 3);
    assert!(host.addresses().is_empty());
}

#[test]
fn get_subnet_of_an_unknown_interface_is_empty() {
    let host = Arc::new(FakeHost::new("eth0"));
    assert!(controller(&host).get_subnet("wlan7").is_none());
}

#[test]
fn business_mode_ends_on_the_business_address() {
    let marker = std::env::temp_dir().join(format!("camscout-it-mode-{}", std::process::id()));
    let cfg = Config {
        business: BusinessModeConfig {
            marker_path: marker.clone(),
            ..BusinessModeConfig::default()
        },
        ..Config::default()
    };
    let host = Arc::new(FakeHost::new("eth0"));
    let controller = InterfaceController::new(host.clone(), &cfg);

    let report = controller.enable_business_mode();

    let steps: Vec<&Step> = report.steps().iter().map(|outcome| &outcome.step).collect();
    assert_eq!(
        steps,
        vec![
            &Step::WriteMarker,
            &Step::StartService("dnsmasq".to_string()),
            &Step::StartService("nodogsplash".to_string()),
            &Step::Flush,
            &Step::AddAddress("192.168.40.240/24".to_string()),
            &Step::LinkUp,
        ]
    );
    assert!(report.all_succeeded());
    assert_eq!(std::fs::read_to_string(&marker).unwrap(), "business");
    assert!(controller.is_static("192.168.40.240/24"));
    let _ = std::fs::remove_file(marker);
}
