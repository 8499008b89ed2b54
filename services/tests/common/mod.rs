use std::{
    io,
    net::TcpListener,
    sync::{Arc, Mutex},
};

use rootstock_core::http::{CaptureMode, HttpTool, HttpToolProvider, TransportError};
use rootstock_core::parameter::ParameterSet;
use rootstock_core::service::Service;
use rootstock_services::ensembl::{EnsemblConfig, EnsemblRestService};
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output so tests can inspect it.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route log output of the current thread into a [`LogCapture`] until the guard is dropped.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

/// A provider whose tools can never be acquired.
pub struct UnavailableTools;

impl HttpToolProvider for UnavailableTools {
    fn acquire(&self, _mode: CaptureMode) -> Result<Box<dyn HttpTool>, TransportError> {
        Err(TransportError::Acquire("no HTTP tools available".to_string()))
    }
}

/// Address of a local port with nothing listening on it.
pub fn refused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind local port");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn service_for(base_url: &str) -> EnsemblRestService {
    let config = EnsemblConfig::new()
        .expect("Failed to build default configuration")
        .base_url(base_url)
        .expect("Invalid base URL");
    EnsemblRestService::new(config)
}

/// A parameter set for `service` with the given `name=value` pairs applied.
pub fn parameters(service: &EnsemblRestService, pairs: &[&str]) -> ParameterSet {
    let mut params = service.parameters().expect("Failed to build parameters");
    params
        .apply_strings(pairs.iter().copied())
        .expect("Failed to apply parameter values");
    params
}
