//! Per-step metadata attached to every captured snapshot.
//!
//! A step's metadata is a mapping with a few recognized fields:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `step` | Position in capture order, assigned by the tracer |
//! | `description` | Free text shown in the frame title |
//! | `highlight_*` | Sets of cells, keys, nodes, edges or indices of interest |
//! | `code` | Source location and optional excerpt for the step |
//!
//! Anything else is carried through untouched in [`Annotations::extra`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix of metadata keys that carry highlight sets.
pub const HIGHLIGHT_PREFIX: &str = "highlight_";

/// Error type for metadata parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetadataError {
    /// Metadata must be a mapping (or null for "no metadata").
    #[error("Metadata must be a mapping, got {0}")]
    NotAMapping(String),
    /// A recognized field has the wrong shape.
    #[error("Invalid metadata field `{field}`: {reason}")]
    InvalidField {
        /// Field name as it appeared in the mapping.
        field: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Source code associated with a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeContext {
    /// Source file of the capture call.
    pub file: Option<String>,
    /// Line of the capture call.
    pub line: Option<u32>,
    /// Caller-supplied source excerpt.
    pub excerpt: Option<String>,
}

impl CodeContext {
    /// Create a context holding only an excerpt.
    pub fn excerpt(excerpt: impl Into<String>) -> Self {
        Self {
            excerpt: Some(excerpt.into()),
            ..Self::default()
        }
    }

    /// Create a context from a source location.
    pub fn location(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
            excerpt: None,
        }
    }

    /// `file:line`, if both are known.
    pub fn location_label(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{file}:{line}")),
            (Some(file), None) => Some(file.clone()),
            _ => None,
        }
    }
}

/// Caller-supplied metadata for a single capture.
///
/// Built with the chained setters, or parsed from a JSON mapping with
/// [`Annotations::from_value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    /// Human-readable description of the step.
    pub description: Option<String>,
    /// Source code associated with the step.
    pub code: Option<CodeContext>,
    /// Highlight sets keyed by kind (`nodes`, `edges`, `indices`, ...).
    ///
    /// The kind is the metadata key without the `highlight_` prefix.
    pub highlights: BTreeMap<String, Vec<Value>>,
    /// Unrecognized fields, passed through opaquely.
    pub extra: BTreeMap<String, Value>,
}

impl Annotations {
    /// Create empty annotations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a source excerpt.
    pub fn code(mut self, excerpt: impl Into<String>) -> Self {
        let code = self.code.get_or_insert_with(CodeContext::default);
        code.excerpt = Some(excerpt.into());
        self
    }

    /// Add a highlight set of the given kind.
    ///
    /// Values that cannot be represented as JSON are skipped.
    pub fn highlight<I, V>(mut self, kind: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        let values = values
            .into_iter()
            .filter_map(|v| serde_json::to_value(v).ok());
        self.highlights.entry(kind.into()).or_default().extend(values);
        self
    }

    /// Set an opaque field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Parse annotations from a JSON mapping.
    ///
    /// `null` yields empty annotations. A caller-supplied `step` is dropped:
    /// step numbers are always assigned by the tracer.
    pub fn from_value(value: Value) -> Result<Self, MetadataError> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => return Err(MetadataError::NotAMapping(type_name(&other).to_string())),
        };

        let mut annotations = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "step" => {
                    tracing::debug!(?value, "ignoring caller-supplied step");
                }
                "description" => match value {
                    Value::String(s) => annotations.description = Some(s),
                    Value::Null => {}
                    other => {
                        return Err(MetadataError::InvalidField {
                            field: key,
                            reason: format!("expected string, got {}", type_name(&other)),
                        })
                    }
                },
                "code" => annotations.code = parse_code(&key, value)?,
                _ => {
                    if let Some(kind) = key.strip_prefix(HIGHLIGHT_PREFIX) {
                        let values = match value {
                            Value::Array(values) => values,
                            Value::Null => Vec::new(),
                            scalar => vec![scalar],
                        };
                        annotations.highlights.insert(kind.to_string(), values);
                    } else {
                        annotations.extra.insert(key, value);
                    }
                }
            }
        }
        Ok(annotations)
    }
}

fn parse_code(field: &str, value: Value) -> Result<Option<CodeContext>, MetadataError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(CodeContext::excerpt(s))),
        obj @ Value::Object(_) => serde_json::from_value(obj)
            .map(Some)
            .map_err(|e| MetadataError::InvalidField {
                field: field.to_string(),
                reason: e.to_string(),
            }),
        other => Err(MetadataError::InvalidField {
            field: field.to_string(),
            reason: format!("expected string or mapping, got {}", type_name(&other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

/// Metadata of one stored step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMetadata {
    /// Step index, strictly increasing in capture order from 0.
    pub step: usize,
    /// When the snapshot was captured.
    pub captured_at: DateTime<Utc>,
    /// Caller-supplied annotations.
    pub annotations: Annotations,
}

impl StepMetadata {
    /// Create metadata for a step.
    pub fn new(step: usize, annotations: Annotations) -> Self {
        Self {
            step,
            captured_at: Utc::now(),
            annotations,
        }
    }

    /// Non-empty description, if any.
    pub fn description(&self) -> Option<&str> {
        self.annotations
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
    }

    /// Source code associated with the step.
    pub fn code(&self) -> Option<&CodeContext> {
        self.annotations.code.as_ref()
    }

    /// Highlight set of the given kind (empty if absent).
    pub fn highlight(&self, kind: &str) -> &[Value] {
        self.annotations
            .highlights
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Opaque field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.annotations.extra.get(name)
    }

    /// Flatten back into the mapping form (`step`, `description`,
    /// `highlight_*`, `code`, extras).
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, value) in &self.annotations.extra {
            map.insert(key.clone(), value.clone());
        }
        map.insert("step".to_string(), Value::from(self.step));
        if let Some(description) = &self.annotations.description {
            map.insert("description".to_string(), Value::String(description.clone()));
        }
        if let Some(code) = &self.annotations.code {
            if let Ok(code) = serde_json::to_value(code) {
                map.insert("code".to_string(), code);
            }
        }
        for (kind, values) in &self.annotations.highlights {
            map.insert(format!("{HIGHLIGHT_PREFIX}{kind}"), Value::Array(values.clone()));
        }
        map
    }
}
