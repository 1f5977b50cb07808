//! Adapter registration and asynchronous connect-then-mount orchestration.
//!
//! [`AdapterRegistry::register`] records an adapter and returns its public
//! summary straight away. Connecting and mounting happen afterwards on a
//! spawned task, one per registration, whose progress is visible through
//! [`AdapterRegistry::status`] and [`AdapterRegistry::wait_until_settled`].

use crate::registry::{
    config::{DuplicateNamespacePolicy, RegistryConfig},
    domain::{
        AdapterNamespace, ApiPrefix, RegistryDomainError, ServerSummary, validate_adapter_type,
    },
    ports::{MountHost, ServerListing, StoreAdapter},
    services::{
        mounter::ServiceMounter,
        status::{AdapterStatus, ConnectFailure},
    },
};
use std::collections::HashMap;
use std::mem;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

/// Errors returned by [`AdapterRegistry::register`].
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// The adapter's namespace or type failed validation.
    #[error("not a usable adapter: {0}")]
    InvalidAdapter(#[from] RegistryDomainError),
    /// Another adapter is registered under the namespace.
    #[error("an adapter is already registered under namespace '{0}'")]
    DuplicateNamespace(AdapterNamespace),
    /// No Tokio runtime is available to run the connect task.
    #[error("adapter registration requires a running Tokio runtime")]
    NoRuntime,
    /// The registry has been shut down.
    #[error("the registry has been shut down")]
    ShutDown,
}

/// Result type for registration.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// A live adapter and the channels tracking its connect task.
struct RegisteredAdapter<S: Send + 'static> {
    adapter: Arc<dyn StoreAdapter<S>>,
    status: Arc<watch::Sender<AdapterStatus>>,
    cancel: watch::Sender<bool>,
}

struct RegistryEntries<S: Send + 'static> {
    summaries: Vec<ServerSummary>,
    adapters: HashMap<AdapterNamespace, RegisteredAdapter<S>>,
    shut_down: bool,
}

impl<S: Send + 'static> Default for RegistryEntries<S> {
    fn default() -> Self {
        Self {
            summaries: Vec::new(),
            adapters: HashMap::new(),
            shut_down: false,
        }
    }
}

/// State shared between the registry, its listing handles, and its tasks.
struct SharedState<S: Send + 'static> {
    entries: RwLock<RegistryEntries<S>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<S: Send + 'static> ServerListing for SharedState<S> {
    fn list_servers(&self) -> Vec<ServerSummary> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .summaries
            .clone()
    }
}

/// Registry of store adapters mounted on a host application.
///
/// Each registry is an independent instance; create one per host (or per
/// API prefix) and call [`AdapterRegistry::shutdown`] when done.
pub struct AdapterRegistry<S, H>
where
    S: Send + 'static,
    H: MountHost<S> + 'static,
{
    config: RegistryConfig,
    mounter: ServiceMounter<S, H>,
    shared: Arc<SharedState<S>>,
}

impl<S, H> AdapterRegistry<S, H>
where
    S: Send + 'static,
    H: MountHost<S> + 'static,
{
    /// Creates an empty registry mounting onto `host`.
    #[must_use]
    pub fn new(config: RegistryConfig, host: Arc<H>) -> Self {
        let mounter = ServiceMounter::new(host, config.api_prefix().clone());
        Self {
            config,
            mounter,
            shared: Arc::new(SharedState {
                entries: RwLock::new(RegistryEntries::default()),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the prefix shared by every managed endpoint.
    #[must_use]
    pub const fn api_prefix(&self) -> &ApiPrefix {
        self.config.api_prefix()
    }

    /// Returns the host services are mounted on.
    #[must_use]
    pub const fn host(&self) -> &Arc<H> {
        self.mounter.host()
    }

    /// Registers an adapter and starts connecting it in the background.
    ///
    /// The summary is recorded and the adapter stored before this returns;
    /// its services go live only once the connect task mounts them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidAdapter`] when the namespace or
    /// type is invalid, [`RegistrationError::DuplicateNamespace`] when the
    /// namespace is taken under the `reject` policy,
    /// [`RegistrationError::NoRuntime`] outside a Tokio runtime, and
    /// [`RegistrationError::ShutDown`] after shutdown.
    #[instrument(
        skip(self, adapter),
        fields(namespace = adapter.namespace(), adapter_type = adapter.adapter_type())
    )]
    pub fn register(
        &self,
        adapter: Arc<dyn StoreAdapter<S>>,
    ) -> RegistrationResult<ServerSummary> {
        let namespace = AdapterNamespace::new(adapter.namespace())?;
        let adapter_type = validate_adapter_type(adapter.adapter_type())?;
        let runtime = Handle::try_current().map_err(|_| RegistrationError::NoRuntime)?;
        let summary = ServerSummary::new(&namespace, adapter_type, self.api_prefix());

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let entry = RegisteredAdapter {
            adapter: Arc::clone(&adapter),
            status: Arc::new(watch::Sender::new(AdapterStatus::registered())),
            cancel: cancel_tx,
        };
        let status_tx = Arc::clone(&entry.status);

        let mut entries = self
            .shared
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if entries.shut_down {
            return Err(RegistrationError::ShutDown);
        }

        let existing_position = entries
            .summaries
            .iter()
            .position(|existing| existing.name() == namespace.as_str());
        match (existing_position, self.config.duplicate_namespaces()) {
            (Some(_), DuplicateNamespacePolicy::Reject) => {
                return Err(RegistrationError::DuplicateNamespace(namespace));
            }
            (Some(position), DuplicateNamespacePolicy::Replace) => {
                if let Some(previous) = entries.adapters.get(&namespace) {
                    previous.cancel.send_replace(true);
                }
                if let Some(slot) = entries.summaries.get_mut(position) {
                    *slot = summary.clone();
                }
                info!(%namespace, "replacing adapter registered under the same namespace");
            }
            (None, _) => entries.summaries.push(summary.clone()),
        }
        entries.adapters.insert(namespace.clone(), entry);

        // Tracked before the guard drops so `shutdown` always sees this task.
        let task = runtime.spawn(connect_and_mount(
            adapter,
            namespace,
            self.mounter.clone(),
            self.config.connect_timeout(),
            status_tx,
            cancel_rx,
        ));
        self.track(task);
        drop(entries);

        info!(endpoint = summary.endpoint(), "registered adapter");
        Ok(summary)
    }

    /// Returns server summaries in registration order.
    #[must_use]
    pub fn list_servers(&self) -> Vec<ServerSummary> {
        self.shared.list_servers()
    }

    /// Returns a handle that reads the live server listing.
    #[must_use]
    pub fn listing(&self) -> Arc<dyn ServerListing> {
        Arc::clone(&self.shared) as Arc<dyn ServerListing>
    }

    /// Returns the adapter stored under `namespace`.
    #[must_use]
    pub fn adapter(&self, namespace: &str) -> Option<Arc<dyn StoreAdapter<S>>> {
        let key = AdapterNamespace::new(namespace).ok()?;
        let entries = self
            .shared
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        entries
            .adapters
            .get(&key)
            .map(|entry| Arc::clone(&entry.adapter))
    }

    /// Returns the number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .adapters
            .len()
    }

    /// Returns whether no adapter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current status of the adapter under `namespace`.
    #[must_use]
    pub fn status(&self, namespace: &str) -> Option<AdapterStatus> {
        let key = AdapterNamespace::new(namespace).ok()?;
        let entries = self
            .shared
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        entries
            .adapters
            .get(&key)
            .map(|entry| entry.status.borrow().clone())
    }

    /// Waits until the adapter under `namespace` reaches a terminal state.
    ///
    /// Returns `None` for unknown namespaces.
    pub async fn wait_until_settled(&self, namespace: &str) -> Option<AdapterStatus> {
        let mut receiver = {
            let key = AdapterNamespace::new(namespace).ok()?;
            let entries = self
                .shared
                .entries
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            entries.adapters.get(&key)?.status.subscribe()
        };

        let settled = receiver
            .wait_for(|status| status.state().is_terminal())
            .await
            .map(|status| status.clone());
        match settled {
            Ok(status) => Some(status),
            Err(_) => Some(receiver.borrow().clone()),
        }
    }

    /// Cancels pending connects, waits for every connect task, and refuses
    /// further registrations. Calling it again is a no-op.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        let tasks = self.abort_pending();
        for task in tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "adapter connect task ended abnormally");
            }
        }
        info!("adapter registry shut down");
    }

    /// Signals shutdown without waiting, returning the outstanding tasks.
    pub(crate) fn abort_pending(&self) -> Vec<JoinHandle<()>> {
        {
            let mut entries = self
                .shared
                .entries
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            entries.shut_down = true;
            for entry in entries.adapters.values() {
                entry.cancel.send_replace(true);
            }
        }
        let mut tasks = self
            .shared
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        mem::take(&mut *tasks)
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self
            .shared
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|pending| !pending.is_finished());
        tasks.push(task);
    }
}

/// Runs one adapter from `Connecting` to a terminal state.
async fn connect_and_mount<S, H>(
    adapter: Arc<dyn StoreAdapter<S>>,
    namespace: AdapterNamespace,
    mounter: ServiceMounter<S, H>,
    timeout: Duration,
    status: Arc<watch::Sender<AdapterStatus>>,
    mut cancel: watch::Receiver<bool>,
) where
    S: Send + 'static,
    H: MountHost<S> + 'static,
{
    if *cancel.borrow_and_update() {
        update_status(&status, &namespace, |current| {
            current.mark_connect_failed(ConnectFailure::Cancelled)
        });
        return;
    }
    update_status(&status, &namespace, AdapterStatus::begin_connecting);

    // Cancellation wins over a connect that resolves in the same poll.
    let outcome = tokio::select! {
        biased;
        () = cancelled(&mut cancel) => Err(ConnectFailure::Cancelled),
        result = tokio::time::timeout(timeout, adapter.connect()) => match result {
            Ok(Ok(manifest)) => Ok(manifest),
            Ok(Err(err)) => Err(ConnectFailure::Adapter(err)),
            Err(_) => Err(ConnectFailure::TimedOut(timeout)),
        },
    };

    let manifest = match outcome {
        Ok(manifest) => manifest,
        Err(failure) => {
            warn!(
                %namespace,
                adapter_type = adapter.adapter_type(),
                error = %failure,
                "adapter failed to connect"
            );
            update_status(&status, &namespace, |current| {
                current.mark_connect_failed(failure)
            });
            return;
        }
    };

    match mounter.mount_manifest(&namespace, manifest) {
        Ok(endpoints) => {
            info!(%namespace, services = endpoints.len(), "mounted adapter services");
            update_status(&status, &namespace, |current| {
                current.mark_mounted(endpoints)
            });
        }
        Err(err) => {
            warn!(
                %namespace,
                adapter_type = adapter.adapter_type(),
                endpoint = %err.endpoint,
                error = %err.source,
                "host rejected adapter service"
            );
            update_status(&status, &namespace, |current| {
                current.mark_mount_failed(err.mounted, err.endpoint, err.source)
            });
        }
    }
}

/// Resolves once cancellation is requested; never resolves if the registry
/// dropped the sender without cancelling.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|requested| *requested).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn update_status(
    status: &watch::Sender<AdapterStatus>,
    namespace: &AdapterNamespace,
    apply: impl FnOnce(&mut AdapterStatus) -> Result<(), RegistryDomainError>,
) {
    let mut outcome = Ok(());
    status.send_modify(|current| outcome = apply(current));
    if let Err(err) = outcome {
        warn!(%namespace, error = %err, "ignored adapter status transition");
    }
}
