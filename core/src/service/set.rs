use tracing::{debug, warn};

use super::{Service, ServiceError};

/// The services exported by one plugin.
pub struct ServiceSet {
    services: Vec<Box<dyn Service>>,
}

impl ServiceSet {
    pub fn new(services: Vec<Box<dyn Service>>) -> Self {
        Self { services }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Service> {
        self.services.iter().map(|s| s.as_ref())
    }

    /// Find a service by its alias.
    pub fn find(&self, alias: &str) -> Option<&dyn Service> {
        self.iter().find(|s| s.alias() == alias)
    }

    /// Find a service by its alias, for running it.
    pub fn find_mut(&mut self, alias: &str) -> Option<&mut Box<dyn Service>> {
        self.services.iter_mut().find(|s| s.alias() == alias)
    }

    /// Close every service, in order.
    ///
    /// Every service is closed even if an earlier one fails; the failures are returned together
    /// with the alias of the service that reported them.
    pub fn close_all(self) -> Vec<(String, ServiceError)> {
        let mut failures = Vec::new();
        for mut service in self.services {
            match service.close() {
                Ok(()) => debug!(service = service.alias(), "Closed service"),
                Err(e) => {
                    warn!(service = service.alias(), error = %e, "Failed to close service");
                    failures.push((service.alias().to_string(), e));
                }
            }
        }
        failures
    }
}
