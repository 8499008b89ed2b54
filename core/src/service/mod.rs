use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    job::JobSet,
    metadata::ServiceMetadata,
    parameter::{ParameterError, ParameterSet, ParameterType},
};

mod error;
mod set;

pub use error::ServiceError;
pub use set::ServiceSet;

/// Separator between the group and the name in a namespaced service alias.
pub const ALIAS_SEPARATOR: &str = "/";

/// Build a namespaced alias such as `ensembl/search`.
pub fn service_alias(group: &str, name: &str) -> String {
    format!("{group}{ALIAS_SEPARATOR}{name}")
}

/// How a service's jobs relate to the call that starts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Synchronicity {
    /// Jobs are complete when `run` returns.
    Synchronous,
    /// Jobs may still be running when `run` returns.
    Asynchronous,
}

/// A file or URL offered to a service to check whether the service can handle it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub protocol: String,
    pub value: String,
}

/// A pluggable, externally invocable capability.
///
/// Implementors provide static identity, a parameter contract, and a job executor. Hosts call
/// `parameters` to obtain a fresh [`ParameterSet`], fill it in, pass it to `run`, and hand it back
/// through `release_parameters`. When the host is done with a service it calls `close`.
///
/// `run` takes `&mut self`: one descriptor never executes two invocations at once. Hosts that
/// want concurrency create several descriptors.
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Namespaced identifier, built with [`service_alias`].
    fn alias(&self) -> &str;

    /// Address of a page with information about the service.
    fn uri(&self) -> &str;

    fn synchronicity(&self) -> Synchronicity {
        Synchronicity::Synchronous
    }

    /// Capability annotations, or `None` if they could not be built.
    fn metadata(&self) -> Option<ServiceMetadata> {
        None
    }

    /// Build a fresh parameter set for one invocation.
    ///
    /// On failure no set is returned, never a partially populated one.
    fn parameters(&self) -> Result<ParameterSet, ServiceError>;

    /// The type of the named parameter.
    fn parameter_type(&self, name: &str) -> Result<ParameterType, ParameterError>;

    /// Release a parameter set obtained from `parameters`.
    fn release_parameters(&self, params: ParameterSet) {
        drop(params);
    }

    /// Execute the service once.
    ///
    /// An `Err` means the invocation could not even start and no jobs exist. Every other failure
    /// is reported through the status and messages of the returned jobs.
    async fn run(&mut self, params: &ParameterSet) -> Result<JobSet, ServiceError>;

    /// Check whether this service can handle the given resource, returning parameters
    /// pre-filled for it if so.
    fn matches_file(&self, _resource: &Resource) -> Option<ParameterSet> {
        None
    }

    /// Release the service's private state. Called once, when the host is done with the service.
    fn close(&mut self) -> Result<(), ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_use_the_separator() {
        assert_eq!(service_alias("ensembl", "search"), "ensembl/search");
    }
}
