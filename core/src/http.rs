//! The HTTP client tool contract.
//!
//! Services do not talk to an HTTP library directly. They acquire a tool from an
//! [`HttpToolProvider`], configure it for one request, send it, and drop it. Dropping the tool
//! releases it, so release happens on every exit path.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Where a tool captures the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Keep the whole response in memory.
    Memory,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to acquire HTTP tool: {0}")]
    Acquire(String),

    #[error("Failed to configure HTTP tool: {0}")]
    Configure(String),

    #[error("HTTP tool used before being configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Remote service returned status {status}")]
    Status { status: u16 },

    #[error("Remote service returned an empty response")]
    EmptyResponse,

    #[error("Response body is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),
}

/// One configured HTTP request capability.
#[async_trait]
pub trait HttpTool: Send {
    /// Prepare the tool to POST a JSON body to `url` and accept a JSON response.
    fn configure_json_post(&mut self, url: &str) -> Result<(), TransportError>;

    /// Send `body` and return the parsed response document.
    ///
    /// Non-success statuses and empty or non-JSON bodies are errors: a returned document is
    /// always a complete application-level response.
    async fn send_json(&mut self, body: &Value) -> Result<Value, TransportError>;
}

/// A source of HTTP tools.
pub trait HttpToolProvider: Send + Sync {
    fn acquire(&self, mode: CaptureMode) -> Result<Box<dyn HttpTool>, TransportError>;
}
