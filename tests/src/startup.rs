use arper_common::config::{Config, GratuitousConfig};
use arper_common::error::ConfigError;
use arper_common::network::address_set::ExclusionPolicy;

const MISSING_INTERFACE: &str = "arper-test-none0";

fn config(ranges: &[&str], gratuitous: Option<GratuitousConfig>) -> Config {
    Config {
        interface: MISSING_INTERFACE.to_string(),
        hardware_address: None,
        gratuitous,
        policy: ExclusionPolicy::default(),
        ranges: ranges.iter().map(|r| r.to_string()).collect(),
    }
}

async fn startup_error(cfg: Config) -> ConfigError {
    let err = arper_core::service::run(cfg).await.unwrap_err();
    err.downcast_ref::<ConfigError>()
        .cloned()
        .unwrap_or_else(|| panic!("expected a configuration error, got: {err:#}"))
}

#[tokio::test]
async fn bad_range_is_reported_before_interface_lookup() {
    let err = startup_error(config(&["10.0.42.0/24", "10.0.42.300"], None)).await;
    assert!(matches!(err, ConfigError::InvalidRange { ref token, .. } if token == "10.0.42.300"));
}

#[tokio::test]
async fn address_ceiling_is_checked_before_interface_lookup() {
    let gratuitous = GratuitousConfig {
        max_addresses: 16,
        ..GratuitousConfig::default()
    };
    let err = startup_error(config(&["10.0.42.0/24"], Some(gratuitous))).await;
    assert_eq!(err, ConfigError::TooManyAddresses { count: 256, max: 16 });
}

#[tokio::test]
async fn unknown_interface_is_reported() {
    let err = startup_error(config(&["10.0.42.0/24"], None)).await;
    assert_eq!(err, ConfigError::InterfaceNotFound(MISSING_INTERFACE.to_string()));
}
