//! Connect-then-mount behaviour observed through the in-memory host.

use std::sync::Arc;
use std::time::Duration;

use amity::registry::{
    config::RegistryConfig,
    domain::{AdapterState, ServiceGroup, ServiceManifest},
    ports::{AdapterConnectError, MountHostError},
    services::{AdapterFailure, ConnectFailure},
};
use rstest::rstest;
use tokio::sync::Notify;

use super::helpers::{FakeAdapter, TestContext, TestHost, config_manifest, context, context_with};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn primary_mongodb_scenario_mounts_services_in_order(context: TestContext) {
    let adapter = Arc::new(FakeAdapter::new(
        "primary",
        config_manifest(&[("servers", "S1"), ("users", "S2")]),
    ));

    context
        .registry
        .register(adapter.clone())
        .expect("registration should succeed");
    let status = context
        .registry
        .wait_until_settled("primary")
        .await
        .expect("adapter should be known");

    assert_eq!(status.state(), AdapterState::Mounted);
    assert_eq!(
        status.mounted_endpoints(),
        ["api/primary/servers", "api/primary/users"]
    );
    assert_eq!(
        context.host.mounts().expect("mounts should be readable"),
        vec![
            ("api/primary/servers".to_owned(), "S1"),
            ("api/primary/users".to_owned(), "S2"),
        ]
    );
    assert_eq!(adapter.connect_calls(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn services_across_groups_mount_in_declaration_order(context: TestContext) {
    let config = ServiceGroup::new("config")
        .with_service("servers", "S1")
        .expect("valid service name");
    let logs = ServiceGroup::new("logs")
        .with_service("audit", "L1")
        .expect("valid service name");
    let manifest = ServiceManifest::new().with_group(config).with_group(logs);

    context
        .registry
        .register(Arc::new(FakeAdapter::new("primary", manifest)))
        .expect("registration should succeed");
    context.registry.wait_until_settled("primary").await;

    assert_eq!(
        context
            .host
            .mounted_paths()
            .expect("paths should be readable"),
        vec!["api/primary/servers", "api/primary/audit"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_manifest_mounts_nothing(context: TestContext) {
    context
        .registry
        .register(Arc::new(FakeAdapter::new("primary", ServiceManifest::new())))
        .expect("registration should succeed");

    let status = context
        .registry
        .wait_until_settled("primary")
        .await
        .expect("adapter should be known");

    assert_eq!(status.state(), AdapterState::Mounted);
    assert!(status.mounted_endpoints().is_empty());
    assert_eq!(context.host.mount_count().expect("count should be readable"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_connect_is_listed_before_mounting(context: TestContext) {
    let gate = Arc::new(Notify::new());
    let adapter = FakeAdapter::new("primary", config_manifest(&[("servers", "S1")]))
        .gated_by(Arc::clone(&gate));

    context
        .registry
        .register(Arc::new(adapter))
        .expect("registration should succeed");

    assert_eq!(context.registry.list_servers().len(), 1);
    let pending = context
        .registry
        .status("primary")
        .expect("adapter should be known");
    assert!(!pending.state().is_terminal());
    assert_eq!(context.host.mount_count().expect("count should be readable"), 0);

    gate.notify_one();
    let settled = context
        .registry
        .wait_until_settled("primary")
        .await
        .expect("adapter should be known");
    assert_eq!(settled.state(), AdapterState::Mounted);
    assert_eq!(
        context.host.service_at("api/primary/servers").expect("host should be readable"),
        Some("S1")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn stalled_connect_times_out() {
    let context = context_with(
        TestHost::new(),
        RegistryConfig::default().with_connect_timeout(Duration::from_millis(20)),
    );
    let adapter = FakeAdapter::new("primary", config_manifest(&[("servers", "S1")]))
        .gated_by(Arc::new(Notify::new()));

    context
        .registry
        .register(Arc::new(adapter))
        .expect("registration should succeed");
    let status = context
        .registry
        .wait_until_settled("primary")
        .await
        .expect("adapter should be known");

    assert_eq!(status.state(), AdapterState::ConnectFailed);
    assert!(matches!(
        status.failure(),
        Some(AdapterFailure::Connect(ConnectFailure::TimedOut(timeout)))
            if *timeout == Duration::from_millis(20)
    ));
    assert_eq!(context.registry.list_servers().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_connect_keeps_summary_and_mounts_nothing(context: TestContext) {
    let adapter = FakeAdapter::failing(
        "primary",
        AdapterConnectError::Rejected("authentication failed".to_owned()),
    );

    context
        .registry
        .register(Arc::new(adapter))
        .expect("registration should succeed");
    let status = context
        .registry
        .wait_until_settled("primary")
        .await
        .expect("adapter should be known");

    assert!(matches!(
        status.failure(),
        Some(AdapterFailure::Connect(ConnectFailure::Adapter(
            AdapterConnectError::Rejected(_)
        )))
    ));
    assert_eq!(context.registry.list_servers().len(), 1);
    assert_eq!(context.host.mount_count().expect("count should be readable"), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn host_failure_stops_remaining_mounts() {
    let host = TestHost::new();
    host.fail_mounts_at("api/primary/users", "route table full")
        .expect("host should accept the failure rule");
    let context = context_with(host, RegistryConfig::default());
    let adapter = FakeAdapter::new(
        "primary",
        config_manifest(&[("servers", "S1"), ("users", "S2"), ("logs", "S3")]),
    );

    context
        .registry
        .register(Arc::new(adapter))
        .expect("registration should succeed");
    let status = context
        .registry
        .wait_until_settled("primary")
        .await
        .expect("adapter should be known");

    assert_eq!(status.state(), AdapterState::MountFailed);
    assert_eq!(status.mounted_endpoints(), ["api/primary/servers"]);
    assert!(matches!(
        status.failure(),
        Some(AdapterFailure::Mount { endpoint, .. }) if endpoint == "api/primary/users"
    ));
    assert_eq!(
        context.host.mounted_paths().expect("paths should be readable"),
        vec!["api/primary/servers"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_path_on_strict_host_is_a_mount_failure() {
    let context = context_with(TestHost::rejecting_duplicates(), RegistryConfig::default());
    let adapter = FakeAdapter::new(
        "primary",
        config_manifest(&[("servers", "S1"), ("servers", "S2")]),
    );

    context
        .registry
        .register(Arc::new(adapter))
        .expect("registration should succeed");
    let status = context
        .registry
        .wait_until_settled("primary")
        .await
        .expect("adapter should be known");

    assert_eq!(status.state(), AdapterState::MountFailed);
    assert!(matches!(
        status.failure(),
        Some(AdapterFailure::Mount {
            source: MountHostError::DuplicatePath(_),
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_cancels_gated_connects(context: TestContext) {
    let adapter = FakeAdapter::new("primary", config_manifest(&[("servers", "S1")]))
        .gated_by(Arc::new(Notify::new()));
    context
        .registry
        .register(Arc::new(adapter))
        .expect("registration should succeed");

    context.registry.shutdown().await;

    let status = context
        .registry
        .status("primary")
        .expect("adapter should be known");
    assert!(matches!(
        status.failure(),
        Some(AdapterFailure::Connect(ConnectFailure::Cancelled))
    ));
    assert_eq!(context.host.mount_count().expect("count should be readable"), 0);
}
