//! Ontology annotations describing what a service consumes and produces.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Prefix of EDAM ontology term URLs.
pub const EDAM_ONTOLOGY_PREFIX: &str = "http://edamontology.org/";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Invalid term URL '{url}': {source}")]
    InvalidTermUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Schema term field '{0}' cannot be empty")]
    EmptyField(&'static str),
}

/// A term from an external ontology. Terms are opaque constants: they are passed through to
/// consumers and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTerm {
    url: Url,
    name: String,
    description: String,
}

impl SchemaTerm {
    pub fn new(url: &str, name: impl Into<String>, description: impl Into<String>) -> Result<Self, MetadataError> {
        let url = Url::parse(url).map_err(|source| MetadataError::InvalidTermUrl {
            url: url.to_string(),
            source,
        })?;
        let name = name.into();
        if name.is_empty() {
            return Err(MetadataError::EmptyField("name"));
        }
        Ok(Self {
            url,
            name,
            description: description.into(),
        })
    }

    /// A term from the EDAM ontology, given its local identifier (e.g., `data_1063`).
    pub fn edam(term: &str, name: impl Into<String>, description: impl Into<String>) -> Result<Self, MetadataError> {
        Self::new(&format!("{EDAM_ONTOLOGY_PREFIX}{term}"), name, description)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Capability annotations of a service: a category plus the kinds of data it accepts and
/// produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetadata {
    category: SchemaTerm,
    inputs: Vec<SchemaTerm>,
    outputs: Vec<SchemaTerm>,
}

impl ServiceMetadata {
    pub fn new(category: SchemaTerm) -> Self {
        Self {
            category,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, term: SchemaTerm) -> Self {
        self.inputs.push(term);
        self
    }

    pub fn with_output(mut self, term: SchemaTerm) -> Self {
        self.outputs.push(term);
        self
    }

    pub fn category(&self) -> &SchemaTerm {
        &self.category
    }

    pub fn inputs(&self) -> &[SchemaTerm] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[SchemaTerm] {
        &self.outputs
    }
}
