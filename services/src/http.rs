use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::Client;
use rootstock_core::http::{CaptureMode, HttpTool, HttpToolProvider, TransportError};
use serde_json::Value;
use tracing::{debug, instrument, trace};
use url::Url;

/// Hands out [`ReqwestTool`]s, each with its own HTTP client.
#[derive(Debug, Clone)]
pub struct ReqwestToolProvider {
    timeout: Duration,
}

impl ReqwestToolProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl HttpToolProvider for ReqwestToolProvider {
    fn acquire(&self, mode: CaptureMode) -> Result<Box<dyn HttpTool>, TransportError> {
        debug!(?mode, timeout = ?self.timeout, "Building HTTP client");
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TransportError::Acquire(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Box::new(ReqwestTool {
            client,
            request: None,
        }))
    }
}

#[derive(Debug)]
struct PreparedRequest {
    url: Url,
    headers: HeaderMap,
}

/// An HTTP tool backed by `reqwest` that captures response bodies in memory.
pub struct ReqwestTool {
    client: Client,
    request: Option<PreparedRequest>,
}

#[async_trait]
impl HttpTool for ReqwestTool {
    fn configure_json_post(&mut self, url: &str) -> Result<(), TransportError> {
        let url = Url::parse(url)
            .map_err(|e| TransportError::Configure(format!("Invalid URL '{}': {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::Configure(format!(
                "Unsupported URL scheme '{}' in '{}'",
                url.scheme(),
                url
            )));
        }

        let json = HeaderValue::from_str(mime::APPLICATION_JSON.as_ref())
            .map_err(|e| TransportError::Configure(format!("Invalid content type: {}", e)))?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, json.clone());
        headers.insert(ACCEPT, json);

        trace!(url = %url, "Configured HTTP tool for JSON POST");
        self.request = Some(PreparedRequest { url, headers });
        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn send_json(&mut self, body: &Value) -> Result<Value, TransportError> {
        let request = self.request.as_ref().ok_or(TransportError::NotConfigured)?;
        debug!(url = %request.url, "Sending POST request");

        let response = self
            .client
            .post(request.url.clone())
            .headers(request.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16() });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(Box::new(e)))?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "Received response");

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(TransportError::EmptyResponse);
        }
        serde_json::from_slice(&bytes).map_err(TransportError::InvalidBody)
    }
}

impl Drop for ReqwestTool {
    fn drop(&mut self) {
        trace!("Released HTTP tool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> Box<dyn HttpTool> {
        ReqwestToolProvider::new(Duration::from_secs(5))
            .acquire(CaptureMode::Memory)
            .unwrap()
    }

    #[test]
    fn configure_rejects_bad_urls() {
        let mut tool = tool();
        assert!(matches!(tool.configure_json_post("not a url"), Err(TransportError::Configure(_))));
        assert!(matches!(
            tool.configure_json_post("ftp://example.org/sequence/id"),
            Err(TransportError::Configure(_))
        ));
        assert!(tool.configure_json_post("http://example.org/sequence/id").is_ok());
    }

    #[tokio::test]
    async fn send_requires_configuration() {
        let mut tool = tool();
        let result = tool.send_json(&serde_json::json!({})).await;
        assert!(matches!(result, Err(TransportError::NotConfigured)));
    }
}
