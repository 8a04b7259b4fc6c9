//! # Runtime Schema Validation
//!
//! Validates return documents against a JSON Schema (Draft 7) whose
//! `definitions` table names every sub-section. A sub-section is validated
//! in isolation by compiling a thin wrapper schema that points at its
//! definition while keeping the full table in scope for nested `$ref`s.
//!
//! ## Custom formats
//!
//! The `pan` format ([`PAN_FORMAT`]) is registered on every compiled
//! validator and checked with [`Pan::is_valid`]. Format assertions are
//! switched on explicitly.
//!
//! ## Determinism
//!
//! Violations are sorted by instance path, then schema path, then message,
//! so two validations of the same document against the same schema yield
//! identical results.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use itr_core::Pan;

/// Name of the extension format for permanent account numbers.
pub const PAN_FORMAT: &str = "pan";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures of the validator itself, as opposed to findings about a document.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The schema file could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoad {
        /// Path or identifier of the schema that failed to load.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The schema could not be compiled into a validator.
    #[error("failed to compile schema {schema_id}: {reason}")]
    SchemaCompile {
        /// The schema `$id`, with `#/definitions/NAME` for a sub-section.
        schema_id: String,
        /// Human-readable reason.
        reason: String,
    },

    /// No definition of that name exists in the schema.
    #[error("schema {schema_id} has no section named {section}")]
    SectionNotFound {
        /// The schema `$id`.
        schema_id: String,
        /// The requested section.
        section: String,
    },

    /// A typed document could not be turned into JSON.
    #[error("failed to serialize document: {0}")]
    DocumentSerialize(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One structural problem in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON Pointer to the offending value (empty for the document root).
    pub path: String,
    /// JSON Pointer into the schema for the keyword that failed.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
    /// The offending value.
    pub value: Value,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "path={path}: {}", self.message)
    }
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "violations", rename_all = "snake_case")]
pub enum ValidationResult {
    /// The document conforms.
    Valid,
    /// Every violation found, in a stable order.
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    fn from_violations(mut violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Self::Valid
        } else {
            violations.sort_by(|a, b| {
                (&a.path, &a.schema_path, &a.message).cmp(&(&b.path, &b.schema_path, &b.message))
            });
            Self::Invalid(violations)
        }
    }

    /// Whether the document conforms.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The violations; empty when valid.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(v) => v,
        }
    }
}

// ---------------------------------------------------------------------------
// ReturnValidator
// ---------------------------------------------------------------------------

/// A compiled validator for one return schema.
///
/// Holds the raw schema (for sub-section lookup) and the compiled root
/// validator. Read-only after construction and safe to share across
/// threads.
pub struct ReturnValidator {
    schema_id: String,
    schema: Value,
    root: jsonschema::Validator,
}

impl std::fmt::Debug for ReturnValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReturnValidator")
            .field("schema_id", &self.schema_id)
            .field("section_count", &self.section_names().len())
            .finish()
    }
}

impl ReturnValidator {
    /// Load and compile the schema at `path`.
    ///
    /// # Errors
    ///
    /// [`SchemaValidationError::SchemaLoad`] if the file cannot be read or
    /// is not JSON; [`SchemaValidationError::SchemaCompile`] if it is not a
    /// usable schema.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaValidationError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| SchemaValidationError::SchemaLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let schema: Value =
            serde_json::from_str(&content).map_err(|e| SchemaValidationError::SchemaLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let id = schema
            .get("$id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        Self::with_id(schema, id)
    }

    /// Compile an in-memory schema.
    ///
    /// # Errors
    ///
    /// [`SchemaValidationError::SchemaCompile`] if it is not a usable schema.
    pub fn from_value(schema: Value) -> Result<Self, SchemaValidationError> {
        let id = schema
            .get("$id")
            .and_then(Value::as_str)
            .unwrap_or("<inline>")
            .to_string();
        Self::with_id(schema, id)
    }

    fn with_id(schema: Value, schema_id: String) -> Result<Self, SchemaValidationError> {
        let root = compile(&schema, &schema_id)?;
        let sections = schema
            .get("definitions")
            .and_then(Value::as_object)
            .map_or(0, |d| d.len());
        tracing::debug!(schema_id = %schema_id, sections, "compiled return schema");
        Ok(Self {
            schema_id,
            schema,
            root,
        })
    }

    /// The schema `$id`, or its path when it has none.
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Every name in the schema's `definitions` table, sorted.
    pub fn section_names(&self) -> BTreeSet<&str> {
        self.definitions()
            .map(|defs| defs.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn definitions(&self) -> Option<&serde_json::Map<String, Value>> {
        self.schema.get("definitions").and_then(Value::as_object)
    }

    /// Validate a whole document.
    pub fn validate(&self, document: &Value) -> ValidationResult {
        let result = collect(&self.root, document);
        log_outcome(&self.schema_id, None, &result);
        result
    }

    /// Validate `section` against the definition named `name`.
    ///
    /// # Errors
    ///
    /// [`SchemaValidationError::SectionNotFound`] for an unknown name, or
    /// [`SchemaValidationError::SchemaCompile`] if the definition does not
    /// compile.
    pub fn validate_section(
        &self,
        section: &Value,
        name: &str,
    ) -> Result<ValidationResult, SchemaValidationError> {
        let defs = self
            .definitions()
            .filter(|defs| defs.contains_key(name))
            .ok_or_else(|| SchemaValidationError::SectionNotFound {
                schema_id: self.schema_id.clone(),
                section: name.to_string(),
            })?;

        let mut wrapper = json!({
            "$ref": format!("#/definitions/{name}"),
            "definitions": defs,
        });
        if let (Some(draft), Some(obj)) = (self.schema.get("$schema"), wrapper.as_object_mut()) {
            obj.insert("$schema".to_string(), draft.clone());
        }
        let section_id = format!("{}#/definitions/{name}", self.schema_id);
        let validator = compile(&wrapper, &section_id)?;

        let result = collect(&validator, section);
        log_outcome(&self.schema_id, Some(name), &result);
        Ok(result)
    }

    /// Serialize a typed document and validate it.
    ///
    /// # Errors
    ///
    /// [`SchemaValidationError::DocumentSerialize`] if serialization fails.
    pub fn validate_document<T: Serialize>(
        &self,
        document: &T,
    ) -> Result<ValidationResult, SchemaValidationError> {
        let value = serde_json::to_value(document)?;
        Ok(self.validate(&value))
    }
}

fn compile(
    schema: &Value,
    schema_id: &str,
) -> Result<jsonschema::Validator, SchemaValidationError> {
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft7)
        .should_validate_formats(true)
        .with_format(PAN_FORMAT, |s: &str| Pan::is_valid(s))
        .build(schema)
        .map_err(|e| SchemaValidationError::SchemaCompile {
            schema_id: schema_id.to_string(),
            reason: e.to_string(),
        })
}

fn collect(validator: &jsonschema::Validator, instance: &Value) -> ValidationResult {
    let violations = validator
        .iter_errors(instance)
        .map(|err| Violation {
            path: err.instance_path.to_string(),
            schema_path: err.schema_path.to_string(),
            message: err.to_string(),
            value: err.instance.clone().into_owned(),
        })
        .collect();
    ValidationResult::from_violations(violations)
}

fn log_outcome(schema_id: &str, section: Option<&str>, result: &ValidationResult) {
    match result {
        ValidationResult::Valid => {
            tracing::debug!(schema_id, section, "document conforms");
        }
        ValidationResult::Invalid(v) => {
            tracing::info!(
                schema_id,
                section,
                violations = v.len(),
                "document does not conform"
            );
        }
    }
}
