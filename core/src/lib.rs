//! Core contracts shared by Rootstock services and the hosts that run them.
//!
//! A service is described by the [`service::Service`] trait: identity accessors, a parameter
//! contract, and a job executor. Executing a service produces a [`job::JobSet`] whose jobs carry
//! a terminal [`job::JobStatus`] together with either result payloads or diagnostic messages.

pub mod http;
pub mod job;
pub mod metadata;
pub mod parameter;
pub mod service;

pub use job::{JobError, JobSet, JobStatus, ServiceJob};
pub use parameter::{Parameter, ParameterError, ParameterSet, ParameterType, ParameterValue};
pub use service::{Service, ServiceError, ServiceSet};
