use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Status of a service job.
///
/// A freshly created job is `NotStarted`. Executors move it to `FailedToStart` before touching
/// any external resource, so that every early return leaves a well-defined failed state, and then
/// to one of the terminal states `Succeeded`, `Error` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    NotStarted,
    FailedToStart,
    /// The job ran but produced no result (e.g., the remote service did not answer).
    Failed,
    /// The job produced a result that could not be stored.
    Error,
    Succeeded,
}

impl JobStatus {
    pub fn is_success(self) -> bool {
        self == JobStatus::Succeeded
    }

    pub fn is_failure(self) -> bool {
        matches!(self, JobStatus::FailedToStart | JobStatus::Failed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::NotStarted => "not started",
            JobStatus::FailedToStart => "failed to start",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
            JobStatus::Succeeded => "succeeded",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Job {job} already holds the maximum of {limit} result(s)")]
    ResultLimitReached { job: Uuid, limit: usize },

    #[error("Result of {size} bytes exceeds the limit of {limit} bytes for job {job}")]
    ResultTooLarge { job: Uuid, size: usize, limit: usize },

    #[error("Failed to serialize result for job {job}: {source}")]
    Serialization {
        job: Uuid,
        #[source]
        source: serde_json::Error,
    },
}

/// Limits on the results a job may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLimits {
    /// Maximum number of result payloads.
    pub max_results: usize,
    /// Maximum serialized size of a single result payload, in bytes.
    pub max_result_bytes: Option<usize>,
}

impl Default for ResultLimits {
    fn default() -> Self {
        Self {
            max_results: 16,
            max_result_bytes: None,
        }
    }
}

/// Severity of a message attached to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Warning,
    Error,
}

/// A human-readable diagnostic attached to a job, visible to consumers of job state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobErrorMessage {
    pub level: MessageLevel,
    pub message: String,
}

/// One trackable unit of work.
///
/// After creation, the only mutations are status transitions and the appending of results and
/// error messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceJob {
    id: Uuid,
    name: String,
    status: JobStatus,
    results: Vec<Value>,
    errors: Vec<JobErrorMessage>,
    #[serde(skip)]
    limits: ResultLimits,
}

impl ServiceJob {
    pub fn new(name: impl Into<String>, limits: ResultLimits) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: JobStatus::NotStarted,
            results: Vec::new(),
            errors: Vec::new(),
            limits,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn set_status(&mut self, status: JobStatus) {
        tracing::trace!(job = %self.id, from = %self.status, to = %status, "Job status changed");
        self.status = status;
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub fn errors(&self) -> &[JobErrorMessage] {
        &self.errors
    }

    /// Attach a result payload, taking ownership of it.
    ///
    /// Fails without modifying the job if the job's result limits would be exceeded.
    pub fn add_result(&mut self, result: Value) -> Result<(), JobError> {
        if self.results.len() >= self.limits.max_results {
            return Err(JobError::ResultLimitReached {
                job: self.id,
                limit: self.limits.max_results,
            });
        }
        if let Some(limit) = self.limits.max_result_bytes {
            let size = serde_json::to_vec(&result)
                .map_err(|source| JobError::Serialization { job: self.id, source })?
                .len();
            if size > limit {
                return Err(JobError::ResultTooLarge { job: self.id, size, limit });
            }
        }
        self.results.push(result);
        Ok(())
    }

    pub fn add_error_message(&mut self, level: MessageLevel, message: impl Into<String>) {
        self.errors.push(JobErrorMessage {
            level,
            message: message.into(),
        });
    }
}

/// The ordered jobs produced by one service invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSet {
    service: String,
    jobs: Vec<ServiceJob>,
}

impl JobSet {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            jobs: Vec::new(),
        }
    }

    /// A job set holding exactly one job, for services that run a single task per invocation.
    pub fn single(service: impl Into<String>, job_name: impl Into<String>, limits: ResultLimits) -> Self {
        let mut set = Self::new(service);
        set.push(ServiceJob::new(job_name, limits));
        set
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn push(&mut self, job: ServiceJob) {
        self.jobs.push(job);
    }

    pub fn get(&self, index: usize) -> Option<&ServiceJob> {
        self.jobs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ServiceJob> {
        self.jobs.get_mut(index)
    }

    pub fn jobs(&self) -> &[ServiceJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Whether every job in the set succeeded.
    pub fn all_succeeded(&self) -> bool {
        !self.jobs.is_empty() && self.jobs.iter().all(|job| job.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_job_is_not_started() {
        let job = ServiceJob::new("test", ResultLimits::default());
        assert_eq!(job.status(), JobStatus::NotStarted);
        assert!(job.results().is_empty());
        assert!(job.errors().is_empty());
    }

    #[test]
    fn single_job_set_holds_one_job() {
        let set = JobSet::single("svc", "result", ResultLimits::default());
        assert_eq!(set.len(), 1);
        assert_eq!(set.service(), "svc");
        assert_eq!(set.get(0).unwrap().name(), "result");
        assert!(!set.all_succeeded());
    }

    #[test]
    fn result_count_limit_is_enforced() {
        let limits = ResultLimits { max_results: 1, max_result_bytes: None };
        let mut job = ServiceJob::new("test", limits);
        job.add_result(json!({"a": 1})).unwrap();
        let err = job.add_result(json!({"b": 2})).unwrap_err();
        assert!(matches!(err, JobError::ResultLimitReached { limit: 1, .. }));
        assert_eq!(job.results(), &[json!({"a": 1})]);
    }

    #[test]
    fn result_size_limit_is_enforced() {
        let limits = ResultLimits { max_results: 4, max_result_bytes: Some(10) };
        let mut job = ServiceJob::new("test", limits);
        let err = job.add_result(json!({"sequence": "ATGGCGGCGGCG"})).unwrap_err();
        assert!(matches!(err, JobError::ResultTooLarge { limit: 10, .. }));
        assert!(job.results().is_empty());
    }

    #[test]
    fn status_serializes_in_upper_snake_case() {
        assert_eq!(serde_json::to_value(JobStatus::FailedToStart).unwrap(), json!("FAILED_TO_START"));
        assert!(JobStatus::Error.is_failure());
        assert!(!JobStatus::NotStarted.is_failure());
    }
}
