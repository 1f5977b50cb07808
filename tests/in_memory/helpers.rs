//! Shared test helpers for in-memory registry integration tests.

use amity::registry::{
    adapters::InMemoryMountHost,
    config::RegistryConfig,
    domain::{ServiceGroup, ServiceManifest},
    ports::{AdapterConnectError, AdapterConnectResult, StoreAdapter},
    services::AdapterRegistry,
};
use async_trait::async_trait;
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Handler type mounted by the in-memory tests.
pub type Service = &'static str;

/// In-memory host used across the tests.
pub type TestHost = InMemoryMountHost<Service>;

/// Registry wired to [`TestHost`].
pub type TestRegistry = AdapterRegistry<Service, TestHost>;

/// How a [`FakeAdapter`] answers `connect`.
enum Outcome {
    Manifest(ServiceManifest<Service>),
    Fail(AdapterConnectError),
}

/// Scriptable adapter that counts connect calls.
pub struct FakeAdapter {
    namespace: String,
    adapter_type: String,
    scope: String,
    outcome: Outcome,
    gate: Option<Arc<Notify>>,
    connect_calls: AtomicUsize,
}

impl FakeAdapter {
    /// Creates a server-scoped `MongoDB` adapter declaring `manifest`.
    #[must_use]
    pub fn new(namespace: &str, manifest: ServiceManifest<Service>) -> Self {
        Self {
            namespace: namespace.to_owned(),
            adapter_type: "MongoDB".to_owned(),
            scope: "server".to_owned(),
            outcome: Outcome::Manifest(manifest),
            gate: None,
            connect_calls: AtomicUsize::new(0),
        }
    }

    /// Creates an adapter whose connect fails with `err`.
    #[must_use]
    pub fn failing(namespace: &str, err: AdapterConnectError) -> Self {
        Self {
            outcome: Outcome::Fail(err),
            ..Self::new(namespace, ServiceManifest::new())
        }
    }

    /// Overrides the adapter type tag.
    #[must_use]
    pub fn with_type(mut self, adapter_type: &str) -> Self {
        adapter_type.clone_into(&mut self.adapter_type);
        self
    }

    /// Overrides the declared scope.
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        scope.clone_into(&mut self.scope);
        self
    }

    /// Holds `connect` until `gate` is notified.
    #[must_use]
    pub fn gated_by(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of times the registry called `connect`.
    #[must_use]
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreAdapter<Service> for FakeAdapter {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn adapter_type(&self) -> &str {
        &self.adapter_type
    }

    fn scope(&self) -> &str {
        &self.scope
    }

    async fn connect(&self) -> AdapterConnectResult<ServiceManifest<Service>> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.outcome {
            Outcome::Manifest(manifest) => Ok(manifest.clone()),
            Outcome::Fail(err) => Err(err.clone()),
        }
    }
}

/// Builds a manifest with one `config` group declaring `services` in order.
///
/// # Panics
///
/// Panics when a service name is invalid.
#[must_use]
pub fn config_manifest(services: &[(&str, Service)]) -> ServiceManifest<Service> {
    let group = services
        .iter()
        .try_fold(ServiceGroup::new("config"), |group, (name, service)| {
            group.with_service(*name, *service)
        })
        .expect("test service names should be valid");
    ServiceManifest::new().with_group(group)
}

/// Host and registry pair shared by most tests.
pub struct TestContext {
    /// Host recording mount calls.
    pub host: Arc<TestHost>,
    /// Registry under test.
    pub registry: TestRegistry,
}

/// Builds a context around `host` with `config`.
#[must_use]
pub fn context_with(host: TestHost, config: RegistryConfig) -> TestContext {
    let shared = Arc::new(host);
    let registry = AdapterRegistry::new(config, Arc::clone(&shared));
    TestContext {
        host: shared,
        registry,
    }
}

/// Provides a registry with default settings on a permissive host.
#[fixture]
pub fn context() -> TestContext {
    context_with(TestHost::new(), RegistryConfig::default())
}
