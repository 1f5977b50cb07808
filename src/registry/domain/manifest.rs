//! Service manifests declared by connected adapters.
//!
//! A manifest is an ordered list of named groups, each an ordered list of
//! `(name, service)` descriptors. Mount order follows declaration order:
//! groups first, then descriptors within each group.

use super::{RegistryDomainError, ServiceName};

/// A named service handler to be mounted under an adapter's endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor<S> {
    name: ServiceName,
    service: S,
}

impl<S> ServiceDescriptor<S> {
    /// Creates a descriptor with a validated service name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError`] when the name is not a valid path
    /// segment.
    pub fn new(name: impl Into<String>, service: S) -> Result<Self, RegistryDomainError> {
        Ok(Self {
            name: ServiceName::new(name)?,
            service,
        })
    }

    /// Returns the service name.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the service handler.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Splits the descriptor into its name and handler.
    #[must_use]
    pub fn into_parts(self) -> (ServiceName, S) {
        (self.name, self.service)
    }
}

/// An ordered, named collection of service descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceGroup<S> {
    name: String,
    services: Vec<ServiceDescriptor<S>>,
}

impl<S> ServiceGroup<S> {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            services: Vec::new(),
        }
    }

    /// Appends a service, validating its name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError`] when the service name is invalid.
    pub fn with_service(
        mut self,
        name: impl Into<String>,
        service: S,
    ) -> Result<Self, RegistryDomainError> {
        self.services.push(ServiceDescriptor::new(name, service)?);
        Ok(self)
    }

    /// Appends an already validated descriptor.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: ServiceDescriptor<S>) -> Self {
        self.services.push(descriptor);
        self
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the descriptors in declaration order.
    #[must_use]
    pub fn services(&self) -> &[ServiceDescriptor<S>] {
        &self.services
    }

    /// Consumes the group, yielding its descriptors in declaration order.
    #[must_use]
    pub fn into_services(self) -> Vec<ServiceDescriptor<S>> {
        self.services
    }
}

/// Every service group an adapter exposes once connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceManifest<S> {
    groups: Vec<ServiceGroup<S>>,
}

impl<S> ServiceManifest<S> {
    /// Creates a manifest with no groups.
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Appends a group.
    #[must_use]
    pub fn with_group(mut self, group: ServiceGroup<S>) -> Self {
        self.groups.push(group);
        self
    }

    /// Returns the groups in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[ServiceGroup<S>] {
        &self.groups
    }

    /// Returns the total number of services across all groups.
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.groups.iter().map(|group| group.services.len()).sum()
    }

    /// Consumes the manifest, yielding its groups in declaration order.
    #[must_use]
    pub fn into_groups(self) -> Vec<ServiceGroup<S>> {
        self.groups
    }
}

impl<S> Default for ServiceManifest<S> {
    fn default() -> Self {
        Self::new()
    }
}
