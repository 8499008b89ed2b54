use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod error;

pub use error::ParameterError;

/// The type of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    Boolean,
    SignedInt,
    UnsignedInt,
    Real,
    String,
    Json,
    FileToRead,
    Directory,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterType::Boolean => "boolean",
            ParameterType::SignedInt => "signed integer",
            ParameterType::UnsignedInt => "unsigned integer",
            ParameterType::Real => "real",
            ParameterType::String => "string",
            ParameterType::Json => "json",
            ParameterType::FileToRead => "file",
            ParameterType::Directory => "directory",
        };
        f.write_str(s)
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Boolean(bool),
    SignedInt(i64),
    UnsignedInt(u64),
    Real(f64),
    String(String),
    Json(Value),
}

impl ParameterValue {
    /// Convert a JSON value into a value of the given parameter type.
    ///
    /// Returns `None` if the JSON value cannot represent the type. Numbers given as strings are
    /// not converted here; use [`ParameterValue::parse`] for textual input.
    pub fn from_json(param_type: ParameterType, value: &Value) -> Option<Self> {
        match param_type {
            ParameterType::Boolean => value.as_bool().map(ParameterValue::Boolean),
            ParameterType::SignedInt => value.as_i64().map(ParameterValue::SignedInt),
            ParameterType::UnsignedInt => value.as_u64().map(ParameterValue::UnsignedInt),
            ParameterType::Real => value.as_f64().map(ParameterValue::Real),
            ParameterType::String | ParameterType::FileToRead | ParameterType::Directory => {
                value.as_str().map(|s| ParameterValue::String(s.to_string()))
            }
            ParameterType::Json => Some(ParameterValue::Json(value.clone())),
        }
    }

    /// Parse textual input (e.g., from a command line) as a value of the given parameter type.
    pub fn parse(param_type: ParameterType, text: &str) -> Option<Self> {
        match param_type {
            ParameterType::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(ParameterValue::Boolean(true)),
                "false" | "no" | "0" => Some(ParameterValue::Boolean(false)),
                _ => None,
            },
            ParameterType::SignedInt => text.parse().ok().map(ParameterValue::SignedInt),
            ParameterType::UnsignedInt => text.parse().ok().map(ParameterValue::UnsignedInt),
            ParameterType::Real => text.parse().ok().map(ParameterValue::Real),
            ParameterType::String | ParameterType::FileToRead | ParameterType::Directory => {
                Some(ParameterValue::String(text.to_string()))
            }
            ParameterType::Json => serde_json::from_str(text).ok().map(ParameterValue::Json),
        }
    }

    /// Whether this value is acceptable for a parameter of the given type.
    pub fn matches(&self, param_type: ParameterType) -> bool {
        matches!(
            (self, param_type),
            (ParameterValue::Boolean(_), ParameterType::Boolean)
                | (ParameterValue::SignedInt(_), ParameterType::SignedInt)
                | (ParameterValue::UnsignedInt(_), ParameterType::UnsignedInt)
                | (ParameterValue::Real(_), ParameterType::Real)
                | (ParameterValue::String(_), ParameterType::String)
                | (ParameterValue::String(_), ParameterType::FileToRead)
                | (ParameterValue::String(_), ParameterType::Directory)
                | (ParameterValue::Json(_), ParameterType::Json)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ParameterValue::UnsignedInt(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as plain JSON, as it would appear in a request body.
    pub fn to_json(&self) -> Value {
        match self {
            ParameterValue::Boolean(b) => Value::Bool(*b),
            ParameterValue::SignedInt(n) => Value::from(*n),
            ParameterValue::UnsignedInt(n) => Value::from(*n),
            ParameterValue::Real(x) => Value::from(*x),
            ParameterValue::String(s) => Value::String(s.clone()),
            ParameterValue::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::String(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

/// A single named, typed input of a service.
///
/// Values are deserialized against `param_type`, so a set read back from JSON holds the same
/// variants as the set that was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameter")]
pub struct Parameter {
    name: String,
    display_name: String,
    description: String,
    param_type: ParameterType,
    default: Option<ParameterValue>,
    value: Option<ParameterValue>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        param_type: ParameterType,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            param_type,
            default: None,
            value: None,
        }
    }

    /// Set the default value. The default must match the parameter's type.
    pub fn with_default(mut self, default: ParameterValue) -> Result<Self, ParameterError> {
        self.check(&default)?;
        self.default = Some(default);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn param_type(&self) -> ParameterType {
        self.param_type
    }

    pub fn default(&self) -> Option<&ParameterValue> {
        self.default.as_ref()
    }

    /// The explicitly set value, falling back to the default.
    pub fn value(&self) -> Option<&ParameterValue> {
        self.value.as_ref().or(self.default.as_ref())
    }

    pub fn set_value(&mut self, value: ParameterValue) -> Result<(), ParameterError> {
        self.check(&value)?;
        self.value = Some(value);
        Ok(())
    }

    fn check(&self, value: &ParameterValue) -> Result<(), ParameterError> {
        if value.matches(self.param_type) {
            Ok(())
        } else {
            Err(ParameterError::TypeMismatch {
                name: self.name.clone(),
                expected: self.param_type,
                found: value.to_string(),
            })
        }
    }
}

#[derive(Deserialize)]
struct RawParameter {
    name: String,
    display_name: String,
    description: String,
    param_type: ParameterType,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    value: Option<Value>,
}

impl TryFrom<RawParameter> for Parameter {
    type Error = ParameterError;

    fn try_from(raw: RawParameter) -> Result<Self, Self::Error> {
        let convert = |json: Option<Value>| -> Result<Option<ParameterValue>, ParameterError> {
            json.filter(|v| !v.is_null())
                .map(|v| {
                    ParameterValue::from_json(raw.param_type, &v).ok_or_else(|| ParameterError::TypeMismatch {
                        name: raw.name.clone(),
                        expected: raw.param_type,
                        found: v.to_string(),
                    })
                })
                .transpose()
        };
        let default = convert(raw.default)?;
        let value = convert(raw.value)?;
        Ok(Self {
            name: raw.name,
            display_name: raw.display_name,
            description: raw.description,
            param_type: raw.param_type,
            default,
            value,
        })
    }
}

/// An ordered collection of named, typed parameters describing one invocation's inputs.
///
/// A parameter set is built fresh for every request and owned by the caller. Services hand it
/// back through [`crate::service::Service::release_parameters`], which consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    name: String,
    description: String,
    parameters: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Add a parameter. Names must be unique within the set.
    pub fn add(&mut self, parameter: Parameter) -> Result<&mut Self, ParameterError> {
        if self.get(parameter.name()).is_some() {
            return Err(ParameterError::Duplicate(parameter.name));
        }
        self.parameters.push(parameter);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.name == name)
    }

    /// The current (or default) value of the named parameter.
    pub fn value(&self, name: &str) -> Option<&ParameterValue> {
        self.get(name).and_then(Parameter::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Set the value of a named parameter, checking it against the declared type.
    pub fn set_value(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match self.get_mut(name) {
            Some(param) => param.set_value(value),
            None => Err(ParameterError::UnknownParameter(name.to_string())),
        }
    }

    /// Map externally supplied name/value pairs onto this set.
    ///
    /// Every name must belong to a declared parameter, and every value must be convertible to that
    /// parameter's type. Values are applied in order; on error, the values applied so far remain.
    pub fn apply_values(&mut self, values: &Map<String, Value>) -> Result<(), ParameterError> {
        for (name, raw) in values {
            let param = self
                .get_mut(name)
                .ok_or_else(|| ParameterError::UnknownParameter(name.clone()))?;
            let value = ParameterValue::from_json(param.param_type, raw).ok_or_else(|| {
                ParameterError::TypeMismatch {
                    name: name.clone(),
                    expected: param.param_type,
                    found: raw.to_string(),
                }
            })?;
            param.set_value(value)?;
        }
        Ok(())
    }

    /// Apply `name=value` pairs, parsing each value according to the declared type.
    pub fn apply_strings<'a, I>(&mut self, pairs: I) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for pair in pairs {
            let (name, text) = pair
                .split_once('=')
                .ok_or_else(|| ParameterError::InvalidValue {
                    name: pair.to_string(),
                    reason: "expected name=value".to_string(),
                })?;
            let name = name.trim();
            let param = self
                .get_mut(name)
                .ok_or_else(|| ParameterError::UnknownParameter(name.to_string()))?;
            let value = ParameterValue::parse(param.param_type, text).ok_or_else(|| {
                ParameterError::TypeMismatch {
                    name: name.to_string(),
                    expected: param.param_type,
                    found: text.to_string(),
                }
            })?;
            param.set_value(value)?;
        }
        Ok(())
    }
}

/// A domain-specific source of parameter definitions.
///
/// Services delegate both the population of their parameter sets and the lookup of parameter
/// types to a provider, so the provider is the single source of truth for names and types.
pub trait ParameterProvider: Send + Sync {
    /// Add this provider's parameters to `set`.
    fn add_parameters(&self, set: &mut ParameterSet) -> Result<(), ParameterError>;

    /// The type of the named parameter.
    fn parameter_type(&self, name: &str) -> Result<ParameterType, ParameterError>;
}
