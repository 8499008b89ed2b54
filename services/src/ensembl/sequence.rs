//! Parameters of a sequence lookup and the request body built from them.

use std::{fmt, str::FromStr};

use rootstock_core::parameter::{
    Parameter, ParameterError, ParameterProvider, ParameterSet, ParameterType, ParameterValue,
};
use serde_json::{Map, Value};

pub const QUERY: &str = "query";
pub const SEQUENCE_TYPE: &str = "type";
pub const SPECIES: &str = "species";
pub const EXPAND_5PRIME: &str = "expand_5prime";
pub const EXPAND_3PRIME: &str = "expand_3prime";

struct Definition {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    param_type: ParameterType,
}

const DEFINITIONS: [Definition; 5] = [
    Definition {
        name: QUERY,
        display_name: "Sequence identifier",
        description: "Stable identifier of the gene, transcript or protein to look up (e.g., AT1G01010)",
        param_type: ParameterType::String,
    },
    Definition {
        name: SEQUENCE_TYPE,
        display_name: "Sequence type",
        description: "Kind of sequence to return: genomic, cds, cdna or protein",
        param_type: ParameterType::String,
    },
    Definition {
        name: SPECIES,
        display_name: "Species",
        description: "Species name, to disambiguate identifiers (e.g., arabidopsis_thaliana)",
        param_type: ParameterType::String,
    },
    Definition {
        name: EXPAND_5PRIME,
        display_name: "Expand 5'",
        description: "Number of bases to add upstream of the feature",
        param_type: ParameterType::UnsignedInt,
    },
    Definition {
        name: EXPAND_3PRIME,
        display_name: "Expand 3'",
        description: "Number of bases to add downstream of the feature",
        param_type: ParameterType::UnsignedInt,
    },
];

/// Parameter definitions for sequence lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceParameters;

impl ParameterProvider for SequenceParameters {
    fn add_parameters(&self, set: &mut ParameterSet) -> Result<(), ParameterError> {
        for def in &DEFINITIONS {
            set.add(Parameter::new(def.name, def.display_name, def.description, def.param_type))?;
        }
        Ok(())
    }

    fn parameter_type(&self, name: &str) -> Result<ParameterType, ParameterError> {
        DEFINITIONS
            .iter()
            .find(|def| def.name == name)
            .map(|def| def.param_type)
            .ok_or_else(|| ParameterError::UnknownParameter(name.to_string()))
    }
}

/// Kind of sequence returned by the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceType {
    Genomic,
    Cds,
    Cdna,
    Protein,
}

impl SequenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SequenceType::Genomic => "genomic",
            SequenceType::Cds => "cds",
            SequenceType::Cdna => "cdna",
            SequenceType::Protein => "protein",
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SequenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "genomic" => Ok(SequenceType::Genomic),
            "cds" => Ok(SequenceType::Cds),
            "cdna" => Ok(SequenceType::Cdna),
            "protein" => Ok(SequenceType::Protein),
            other => Err(format!("'{}' is not one of genomic, cds, cdna, protein", other)),
        }
    }
}

/// A validated sequence lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceQuery {
    pub query: String,
    pub sequence_type: Option<SequenceType>,
    pub species: Option<String>,
    pub expand_5prime: Option<u64>,
    pub expand_3prime: Option<u64>,
}

impl SequenceQuery {
    /// Extract a query from a parameter set built by [`SequenceParameters`].
    pub fn from_parameters(params: &ParameterSet) -> Result<Self, ParameterError> {
        let query = params
            .value(QUERY)
            .and_then(ParameterValue::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ParameterError::MissingValue(QUERY.to_string()))?;

        let sequence_type = params
            .value(SEQUENCE_TYPE)
            .and_then(ParameterValue::as_str)
            .map(|s| {
                s.parse::<SequenceType>().map_err(|reason| ParameterError::InvalidValue {
                    name: SEQUENCE_TYPE.to_string(),
                    reason,
                })
            })
            .transpose()?;

        let species = params
            .value(SPECIES)
            .and_then(ParameterValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            query: query.to_string(),
            sequence_type,
            species,
            expand_5prime: flank(params, EXPAND_5PRIME)?,
            expand_3prime: flank(params, EXPAND_3PRIME)?,
        })
    }

    /// The JSON body of the POST request. Only options that are set appear in the body.
    pub fn to_request_body(&self) -> Value {
        let mut body = Map::new();
        body.insert(QUERY.into(), Value::String(self.query.clone()));
        if let Some(sequence_type) = self.sequence_type {
            body.insert(SEQUENCE_TYPE.into(), Value::String(sequence_type.to_string()));
        }
        if let Some(species) = &self.species {
            body.insert(SPECIES.into(), Value::String(species.clone()));
        }
        if let Some(n) = self.expand_5prime {
            body.insert(EXPAND_5PRIME.into(), Value::from(n));
        }
        if let Some(n) = self.expand_3prime {
            body.insert(EXPAND_3PRIME.into(), Value::from(n));
        }
        Value::Object(body)
    }
}

fn flank(params: &ParameterSet, name: &str) -> Result<Option<u64>, ParameterError> {
    match params.value(name) {
        None => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| ParameterError::TypeMismatch {
            name: name.to_string(),
            expected: ParameterType::UnsignedInt,
            found: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parameter_set() -> ParameterSet {
        let mut set = ParameterSet::new("test", "sequence parameters");
        SequenceParameters.add_parameters(&mut set).unwrap();
        set
    }

    #[test]
    fn provider_declares_every_parameter() {
        let set = parameter_set();
        let names: Vec<_> = set.iter().map(|p| p.name()).collect();
        assert_eq!(names, [QUERY, SEQUENCE_TYPE, SPECIES, EXPAND_5PRIME, EXPAND_3PRIME]);
        assert_eq!(SequenceParameters.parameter_type(EXPAND_3PRIME).unwrap(), ParameterType::UnsignedInt);
        assert!(matches!(
            SequenceParameters.parameter_type("sequence"),
            Err(ParameterError::UnknownParameter(_))
        ));
    }

    #[test]
    fn query_only_body() {
        let mut set = parameter_set();
        set.set_value(QUERY, ParameterValue::String("AT1G01010".into())).unwrap();
        let query = SequenceQuery::from_parameters(&set).unwrap();
        assert_eq!(query.to_request_body(), json!({ "query": "AT1G01010" }));
    }

    #[test]
    fn full_body() {
        let mut set = parameter_set();
        set.apply_strings([
            "query=AT3G52430",
            "type=CDS",
            "species=arabidopsis_thaliana",
            "expand_5prime=100",
        ])
        .unwrap();
        let query = SequenceQuery::from_parameters(&set).unwrap();
        assert_eq!(
            query.to_request_body(),
            json!({
                "query": "AT3G52430",
                "type": "cds",
                "species": "arabidopsis_thaliana",
                "expand_5prime": 100
            })
        );
    }

    #[test]
    fn body_survives_json_round_trip_of_parameters() {
        let mut set = parameter_set();
        set.apply_strings(["query=AT1G01010", "expand_5prime=100"]).unwrap();
        let before = SequenceQuery::from_parameters(&set).unwrap().to_request_body();

        let restored: ParameterSet = serde_json::from_str(&serde_json::to_string(&set).unwrap()).unwrap();
        let after = SequenceQuery::from_parameters(&restored).unwrap().to_request_body();
        assert_eq!(after, json!({ "query": "AT1G01010", "expand_5prime": 100 }));
        assert_eq!(before, after);
    }

    #[test]
    fn flank_of_the_wrong_type_is_rejected() {
        let mut set = ParameterSet::new("test", "loose parameters");
        set.add(Parameter::new(QUERY, "Query", "Identifier", ParameterType::String))
            .unwrap()
            .add(Parameter::new(EXPAND_3PRIME, "Expand 3'", "Bases", ParameterType::SignedInt))
            .unwrap();
        set.apply_strings(["query=AT1G01010", "expand_3prime=20"]).unwrap();
        assert!(matches!(
            SequenceQuery::from_parameters(&set),
            Err(ParameterError::TypeMismatch { name, .. }) if name == EXPAND_3PRIME
        ));
    }

    #[test]
    fn missing_or_blank_query_is_rejected() {
        let mut set = parameter_set();
        assert!(matches!(SequenceQuery::from_parameters(&set), Err(ParameterError::MissingValue(_))));
        set.set_value(QUERY, ParameterValue::String("  ".into())).unwrap();
        assert!(matches!(SequenceQuery::from_parameters(&set), Err(ParameterError::MissingValue(_))));
    }

    #[test]
    fn unknown_sequence_type_is_rejected() {
        let mut set = parameter_set();
        set.apply_strings(["query=AT1G01010", "type=rna"]).unwrap();
        assert!(matches!(
            SequenceQuery::from_parameters(&set),
            Err(ParameterError::InvalidValue { name, .. }) if name == SEQUENCE_TYPE
        ));
    }
}
