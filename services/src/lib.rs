//! Services exported to Rootstock hosts.
//!
//! Hosts call [`get_services`] once when loading this plugin and [`release_services`] once when
//! unloading it.

use rootstock_core::service::ServiceSet;
use tracing::error;

pub mod ensembl;
pub mod http;

use ensembl::{EnsemblConfig, EnsemblRestService};

/// Registration hook: the services of this plugin, configured from the environment.
///
/// Returns `None` if the configuration could not be loaded.
pub fn get_services() -> Option<ServiceSet> {
    match EnsemblConfig::from_env() {
        Ok(config) => Some(get_services_with_config(config)),
        Err(e) => {
            error!(error = %e, "Failed to load Ensembl configuration");
            None
        }
    }
}

/// The services of this plugin with an explicit configuration.
pub fn get_services_with_config(config: EnsemblConfig) -> ServiceSet {
    ServiceSet::new(vec![Box::new(EnsemblRestService::new(config))])
}

/// Teardown hook matching [`get_services`]: closes every service in the set.
pub fn release_services(services: ServiceSet) {
    for (alias, e) in services.close_all() {
        error!(service = %alias, error = %e, "Failed to close service");
    }
}
