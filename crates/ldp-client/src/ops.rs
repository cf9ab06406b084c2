//! Best-effort operation surface for hosting frameworks.
//!
//! Agent hosts invoke pod operations as fire-and-observe actions: a failing
//! operation must never unwind into the host. This trait is that surface.
//! Failures are logged with their classified reason and degrade to a default
//! outcome.

use tracing::warn;

use crate::client::PodClient;
use crate::record::Record;

/// The four pod operations in non-throwing form.
pub trait PodOperations {
    /// Ensure a container exists; failures are logged.
    fn ensure_container(&self, container_name: &str);

    /// Replace a leaf resource's contents; failures are logged.
    fn publish_data(&self, container_name: &str, resource_name: &str, records: &[Record]);

    /// Read a leaf resource's records.
    ///
    /// An unreadable resource yields an empty set, so callers always get a
    /// usable value.
    fn read_data(&self, container_name: &str, resource_name: &str) -> Vec<Record>;

    /// Append records to a leaf resource; failures are logged.
    fn update_data(&self, container_name: &str, resource_name: &str, records: &[Record]);
}

impl PodOperations for PodClient {
    fn ensure_container(&self, container_name: &str) {
        if let Err(report) = self.create_container(container_name) {
            warn!(container = container_name, error = ?report, "Failed to create container");
        }
    }

    fn publish_data(&self, container_name: &str, resource_name: &str, records: &[Record]) {
        if let Err(report) = self.publish_records(container_name, resource_name, records) {
            warn!(
                container = container_name,
                resource = resource_name,
                error = ?report,
                "Failed to publish records"
            );
        }
    }

    fn read_data(&self, container_name: &str, resource_name: &str) -> Vec<Record> {
        match self.read_records(container_name, resource_name) {
            Ok(records) => records,
            Err(report) => {
                warn!(
                    container = container_name,
                    resource = resource_name,
                    error = ?report,
                    "Failed to read records"
                );
                Vec::new()
            }
        }
    }

    fn update_data(&self, container_name: &str, resource_name: &str, records: &[Record]) {
        if let Err(report) = self.update_records(container_name, resource_name, records) {
            warn!(
                container = container_name,
                resource = resource_name,
                error = ?report,
                "Failed to update records"
            );
        }
    }
}
