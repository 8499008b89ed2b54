//! Sequence search against the Ensembl Plants REST API.

use std::sync::Arc;

use async_trait::async_trait;
use rootstock_core::{
    http::{CaptureMode, HttpToolProvider},
    job::{JobSet, JobStatus, MessageLevel},
    metadata::{MetadataError, ServiceMetadata},
    parameter::{ParameterError, ParameterProvider, ParameterSet, ParameterType},
    service::{service_alias, Service, ServiceError, Synchronicity},
};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

mod config;
mod metadata;
mod sequence;

pub use config::{ConfigError, EnsemblConfig, ROOT_REST_URI};
pub use sequence::{SequenceParameters, SequenceQuery, SequenceType};

use crate::http::ReqwestToolProvider;

const SERVICE_NAME: &str = "Ensembl Plants service";
const SERVICE_DESCRIPTION: &str = "A service to access the Ensembl Plants data";
const SERVICE_URI: &str = "http://plants.ensembl.org/index.html";
const ALIAS_GROUP: &str = "ensembl";
const ALIAS_NAME: &str = "search";
const JOB_NAME: &str = "Ensembl result";

const PARAMETER_SET_NAME: &str = "EnsemblRest service parameters";
const PARAMETER_SET_DESCRIPTION: &str = "The parameters used for the EnsemblRest service";

/// Message attached to a job whose result could not be stored.
pub const STORE_RESULT_FAILED: &str = "Failed to store result";

/// State owned by an open service.
#[derive(Debug, Default)]
struct EnsemblServiceData {
    /// Results of the most recent run. Cleared at the start of every run.
    results: Vec<Value>,
}

/// Looks up sequences by identifier with one POST to the Ensembl REST `sequence/id` endpoint.
///
/// Each run produces a job set with a single job.
pub struct EnsemblRestService {
    alias: String,
    config: EnsemblConfig,
    http: Arc<dyn HttpToolProvider>,
    parameters: SequenceParameters,
    data: Option<EnsemblServiceData>,
}

impl EnsemblRestService {
    pub fn new(config: EnsemblConfig) -> Self {
        let http = Arc::new(ReqwestToolProvider::new(config.timeout));
        Self::with_http_tools(config, http)
    }

    /// Creates the service with a custom source of HTTP tools.
    pub fn with_http_tools(config: EnsemblConfig, http: Arc<dyn HttpToolProvider>) -> Self {
        debug!(base_url = %config.base_url, "Creating Ensembl REST service");
        Self {
            alias: service_alias(ALIAS_GROUP, ALIAS_NAME),
            config,
            http,
            parameters: SequenceParameters,
            data: Some(EnsemblServiceData::default()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.data.is_some()
    }

    /// Results stored by the most recent successful run. Empty once the service is closed.
    pub fn last_results(&self) -> &[Value] {
        self.data.as_ref().map(|d| d.results.as_slice()).unwrap_or_default()
    }
}

fn metadata_or_none(metadata: Result<ServiceMetadata, MetadataError>) -> Option<ServiceMetadata> {
    metadata
        .inspect_err(|e| error!(service = SERVICE_NAME, error = %e, "Failed to build service metadata"))
        .ok()
}

#[async_trait]
impl Service for EnsemblRestService {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn description(&self) -> &str {
        SERVICE_DESCRIPTION
    }

    fn alias(&self) -> &str {
        &self.alias
    }

    fn uri(&self) -> &str {
        SERVICE_URI
    }

    fn synchronicity(&self) -> Synchronicity {
        Synchronicity::Synchronous
    }

    fn metadata(&self) -> Option<ServiceMetadata> {
        metadata_or_none(metadata::build_metadata())
    }

    fn parameters(&self) -> Result<ParameterSet, ServiceError> {
        let mut params = ParameterSet::new(PARAMETER_SET_NAME, PARAMETER_SET_DESCRIPTION);
        self.parameters.add_parameters(&mut params)?;
        Ok(params)
    }

    fn parameter_type(&self, name: &str) -> Result<ParameterType, ParameterError> {
        self.parameters.parameter_type(name)
    }

    #[instrument(skip(self, params), fields(service = %self.alias))]
    async fn run(&mut self, params: &ParameterSet) -> Result<JobSet, ServiceError> {
        let Some(data) = self.data.as_mut() else {
            return Err(ServiceError::Closed(self.alias.clone()));
        };

        // We only have one task
        let mut jobs = JobSet::single(SERVICE_NAME, JOB_NAME, self.config.result_limits);
        let Some(job) = jobs.get_mut(0) else {
            return Ok(jobs);
        };
        job.set_status(JobStatus::FailedToStart);

        let mut tool = match self.http.acquire(CaptureMode::Memory) {
            Ok(tool) => tool,
            Err(e) => {
                error!(error = %e, "Failed to allocate HTTP tool for {}", SERVICE_NAME);
                return Ok(jobs);
            }
        };

        let configured = self
            .config
            .sequence_url()
            .map_err(|e| e.to_string())
            .and_then(|url| tool.configure_json_post(url.as_str()).map_err(|e| e.to_string()));
        if let Err(e) = configured {
            error!(error = %e, "Failed to set HTTP tool for HTTP POST request");
            return Ok(jobs);
        }

        data.results.clear();

        let response = match SequenceQuery::from_parameters(params) {
            Ok(query) => {
                debug!(query = %query.query, "Running sequence search");
                tool.send_json(&query.to_request_body()).await.map_err(|e| e.to_string())
            }
            Err(e) => Err(format!("Invalid parameters: {}", e)),
        };

        match response {
            Ok(result) => {
                let stored = result.clone();
                match job.add_result(result) {
                    Ok(()) => {
                        data.results.push(stored);
                        job.set_status(JobStatus::Succeeded);
                    }
                    Err(e) => {
                        job.set_status(JobStatus::Error);
                        job.add_error_message(MessageLevel::Error, STORE_RESULT_FAILED);
                        error!(job_id = %job.id(), error = %e, "Failed to add result for {}", job.id());
                    }
                }
            }
            Err(reason) => {
                warn!(job_id = %job.id(), %reason, "Sequence search returned no result");
                job.set_status(JobStatus::Failed);
                job.add_error_message(MessageLevel::Error, format!("No result from {}: {}", SERVICE_NAME, reason));
            }
        }

        Ok(jobs)
    }

    fn close(&mut self) -> Result<(), ServiceError> {
        match self.data.take() {
            Some(data) => {
                debug!(service = %self.alias, results = data.results.len(), "Releasing service data");
                Ok(())
            }
            None => Err(ServiceError::Closed(self.alias.clone())),
        }
    }
}
