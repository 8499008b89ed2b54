use std::{env, time::Duration};

use rootstock_core::job::ResultLimits;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Root of the Ensembl Genomes REST API.
pub const ROOT_REST_URI: &str = "http://rest.ensemblgenomes.org/";

/// Path of the sequence lookup endpoint, relative to the REST root.
const SEQUENCE_ENDPOINT: &str = "sequence/id";

const BASE_URL_VAR: &str = "ENSEMBL_REST_BASE_URL";
const TIMEOUT_VAR: &str = "ENSEMBL_REST_TIMEOUT_SECS";
const MAX_RESULT_BYTES_VAR: &str = "ENSEMBL_MAX_RESULT_BYTES";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration of the Ensembl REST service.
#[derive(Clone, Debug)]
pub struct EnsemblConfig {
    pub(crate) base_url: Url,
    /// Timeout for the outbound request. Defaults to 60 seconds.
    pub(crate) timeout: Duration,
    pub(crate) result_limits: ResultLimits,
}

impl EnsemblConfig {
    /// Creates a configuration pointing at the public Ensembl Genomes REST API.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(ROOT_REST_URI)?,
            timeout: Duration::from_secs(60),
            result_limits: ResultLimits {
                max_results: 1,
                max_result_bytes: None,
            },
        })
    }

    /// Creates a configuration from environment variables, loading `.env` if present.
    ///
    /// Recognised variables are `ENSEMBL_REST_BASE_URL`, `ENSEMBL_REST_TIMEOUT_SECS` and
    /// `ENSEMBL_MAX_RESULT_BYTES`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = Self::new()?;
        if let Some(url) = read_var(BASE_URL_VAR) {
            config = config.base_url(&url)?;
        }
        if let Some(secs) = read_var(TIMEOUT_VAR) {
            config = config.timeout(Duration::from_secs(parse_number(TIMEOUT_VAR, &secs)?));
        }
        if let Some(bytes) = read_var(MAX_RESULT_BYTES_VAR) {
            let max_result_bytes = parse_number(MAX_RESULT_BYTES_VAR, &bytes)?;
            let max_result_bytes = usize::try_from(max_result_bytes).map_err(|e| ConfigError::InvalidVar {
                name: MAX_RESULT_BYTES_VAR,
                value: bytes.clone(),
                reason: e.to_string(),
            })?;
            let limits = ResultLimits {
                max_result_bytes: Some(max_result_bytes),
                ..config.result_limits
            };
            config = config.result_limits(limits);
        }
        debug!(base_url = %config.base_url, timeout = ?config.timeout, "Loaded Ensembl configuration");
        Ok(config)
    }

    /// Sets a custom REST base URL (e.g., a mirror or a mock server).
    pub fn base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn result_limits(mut self, limits: ResultLimits) -> Self {
        self.result_limits = limits;
        self
    }

    /// Full URL of the sequence lookup endpoint.
    pub fn sequence_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(SEQUENCE_ENDPOINT)
    }
}

fn parse_base_url(url: &str) -> Result<Url, ConfigError> {
    let mut parsed = Url::parse(url).map_err(|source| ConfigError::InvalidBaseUrl {
        url: url.to_string(),
        source,
    })?;
    // Without a trailing slash, `Url::join` would replace the last path segment.
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    Ok(parsed)
}

fn read_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidVar {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_ensembl_genomes() {
        let config = EnsemblConfig::new().unwrap();
        assert_eq!(
            config.sequence_url().unwrap().as_str(),
            "http://rest.ensemblgenomes.org/sequence/id"
        );
        assert_eq!(config.result_limits.max_results, 1);
    }

    #[test]
    fn base_url_keeps_its_path() {
        let config = EnsemblConfig::new().unwrap().base_url("http://localhost:8080/mirror").unwrap();
        assert_eq!(
            config.sequence_url().unwrap().as_str(),
            "http://localhost:8080/mirror/sequence/id"
        );
    }

    #[test]
    fn trailing_slash_goes_on_the_path() {
        let config = EnsemblConfig::new().unwrap().base_url("http://localhost:8080/mirror?release=58").unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/mirror/?release=58");
        assert_eq!(config.base_url.query(), Some("release=58"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = EnsemblConfig::new().unwrap().base_url("::nope");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn invalid_numbers_are_reported_with_their_variable() {
        let err = parse_number(TIMEOUT_VAR, "soon").unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_VAR));
    }

    fn set_vars(base_url: &str, timeout: &str, max_bytes: &str) {
        // SAFETY: the process environment is only touched by `from_env_reads_ensembl_variables`.
        unsafe {
            env::set_var(BASE_URL_VAR, base_url);
            env::set_var(TIMEOUT_VAR, timeout);
            env::set_var(MAX_RESULT_BYTES_VAR, max_bytes);
        }
    }

    // A single test owns the environment, as tests run in parallel threads of one process.
    #[test]
    fn from_env_reads_ensembl_variables() {
        set_vars("http://localhost:9999/rest", "5", "2048");
        let config = EnsemblConfig::from_env().unwrap();
        assert_eq!(
            config.sequence_url().unwrap().as_str(),
            "http://localhost:9999/rest/sequence/id"
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.result_limits.max_result_bytes, Some(2048));
        assert_eq!(config.result_limits.max_results, 1);

        set_vars("http://localhost:9999/rest", "soon", "");
        assert!(matches!(
            EnsemblConfig::from_env(),
            Err(ConfigError::InvalidVar { name: TIMEOUT_VAR, .. })
        ));

        set_vars("http://localhost:9999/rest", "5", "-1");
        assert!(matches!(
            EnsemblConfig::from_env(),
            Err(ConfigError::InvalidVar { name: MAX_RESULT_BYTES_VAR, .. })
        ));

        set_vars("  ", "", " ");
        let config = EnsemblConfig::from_env().unwrap();
        assert_eq!(config.base_url.as_str(), ROOT_REST_URI);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.result_limits.max_result_bytes, None);

        // SAFETY: see `set_vars`.
        unsafe {
            env::remove_var(BASE_URL_VAR);
            env::remove_var(TIMEOUT_VAR);
            env::remove_var(MAX_RESULT_BYTES_VAR);
        }
    }
}
