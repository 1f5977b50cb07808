//! Startup wiring onto a host application.

use std::sync::Arc;

use amity::registry::{
    config::RegistryConfig,
    domain::{AdapterState, ServiceManifest},
    ports::StoreAdapter,
    services::{RegistrationError, StartupError, start},
};
use rstest::{fixture, rstest};

use super::helpers::{FakeAdapter, Service, TestHost, config_manifest};

fn store(namespace: &str) -> Arc<dyn StoreAdapter<Service>> {
    Arc::new(FakeAdapter::new(
        namespace,
        config_manifest(&[("servers", "S1"), ("users", "S2")]),
    ))
}

#[fixture]
fn host() -> Arc<TestHost> {
    Arc::new(TestHost::new())
}

#[test]
fn missing_host_aborts_startup() {
    let result = start::<Service, TestHost>(
        None,
        RegistryConfig::default(),
        Some(store("primary")),
        None,
    );

    let err = result.err().expect("startup should fail");
    assert!(matches!(err, StartupError::MissingHostApplication));
    assert_eq!(err.to_string(), "No host application was provided.");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn single_store_serves_both_roles(host: Arc<TestHost>) {
    let registry = start(
        Some(Arc::clone(&host)),
        RegistryConfig::default(),
        Some(store("primary")),
        None,
    )
    .expect("startup should succeed");

    assert_eq!(registry.len(), 1);
    let status = registry
        .wait_until_settled("primary")
        .await
        .expect("store should be registered");
    assert_eq!(status.state(), AdapterState::Mounted);
    assert_eq!(
        host.mounted_paths().expect("paths should be readable"),
        vec!["api/primary/servers", "api/primary/users"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn separate_user_store_is_registered_second(host: Arc<TestHost>) {
    let registry = start(
        Some(Arc::clone(&host)),
        RegistryConfig::default(),
        Some(store("servers-db")),
        Some(store("users-db")),
    )
    .expect("startup should succeed");

    let names: Vec<String> = registry
        .list_servers()
        .iter()
        .map(|summary| summary.name().to_owned())
        .collect();
    assert_eq!(names, vec!["servers-db", "users-db"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_is_served_at_amity_servers(host: Arc<TestHost>) {
    let registry = start(
        Some(Arc::clone(&host)),
        RegistryConfig::default(),
        Some(store("primary")),
        None,
    )
    .expect("startup should succeed");
    registry
        .register(Arc::new(FakeAdapter::new("archive", ServiceManifest::new())))
        .expect("registration should succeed");

    assert_eq!(
        host.listing_path().expect("host should be readable"),
        Some("amity/servers".to_owned())
    );
    let served = host
        .served_listing()
        .expect("host should be readable")
        .expect("listing should be mounted");
    assert_eq!(served, registry.list_servers());
    assert_eq!(served.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conflicting_stores_abort_startup(host: Arc<TestHost>) {
    let result = start(
        Some(host),
        RegistryConfig::default(),
        Some(store("primary")),
        Some(store("primary")),
    );

    let err = result.err().expect("startup should fail");
    assert!(matches!(
        err,
        StartupError::Registration(RegistrationError::DuplicateNamespace(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn startup_without_stores_only_serves_listing(host: Arc<TestHost>) {
    let registry = start::<Service, TestHost>(
        Some(Arc::clone(&host)),
        RegistryConfig::default(),
        None,
        None,
    )
    .expect("startup should succeed");

    assert!(registry.is_empty());
    assert_eq!(
        host.served_listing().expect("host should be readable"),
        Some(Vec::new())
    );
}
