use crate::meta::Role;
use crate::reply::{IntoReply, Reply};
use http::StatusCode;
use serde::Serialize;

// ── Declaration time ───────────────────────────────────────

/// A route declaration that can never be honoured.
///
/// Raised while decorating handlers at startup. There is no recovery path:
/// the application should refuse to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// A query/headers/cookies model whose schema is not an object with properties.
    NotAnObject { role: Role, model: String },
    /// The schema could not be compiled into a validator.
    InvalidSchema { model: String, reason: String },
}

impl std::fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclarationError::NotAnObject { role, model } => write!(
                f,
                "Declaration error: {role} model '{model}' must be an object schema with properties"
            ),
            DeclarationError::InvalidSchema { model, reason } => {
                write!(f, "Declaration error: invalid schema for '{model}': {reason}")
            }
        }
    }
}

impl std::error::Error for DeclarationError {}

// ── Spec generation ────────────────────────────────────────

/// An inconsistency found while assembling the OpenAPI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecGenerationError {
    /// A route references a model that is not in the schema registry.
    MissingSchema { operation: String, schema: String },
    /// A path template could not be parsed.
    InvalidPath { path: String, reason: String },
}

impl std::fmt::Display for SpecGenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecGenerationError::MissingSchema { operation, schema } => write!(
                f,
                "Spec generation error: operation '{operation}' references unknown schema '{schema}'"
            ),
            SpecGenerationError::InvalidPath { path, reason } => {
                write!(f, "Spec generation error: invalid path '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for SpecGenerationError {}

// ── Request time ───────────────────────────────────────────

/// A field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: &str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.to_string(),
        }
    }
}

/// Incoming request data did not match the declared schemas.
///
/// Answered with `422 Unprocessable Entity`; the handler never runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestValidationError {
    pub errors: Vec<FieldError>,
}

impl std::fmt::Display for RequestValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request validation error: {} errors", self.errors.len())
    }
}

impl std::error::Error for RequestValidationError {}

impl IntoReply for RequestValidationError {
    fn into_reply(self) -> Reply {
        let body = serde_json::json!({
            "error": "Validation failed",
            "details": self.errors,
        });
        Reply::new(StatusCode::UNPROCESSABLE_ENTITY, body)
    }
}

/// A handler produced a body that breaks its own response declaration.
///
/// This is a server-side defect, answered with `500` and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseValidationError {
    pub status: StatusCode,
    pub model: String,
    pub errors: Vec<String>,
}

impl std::fmt::Display for ResponseValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Response validation error: {} body does not match '{}': {}",
            self.status,
            self.model,
            self.errors.join("; ")
        )
    }
}

impl std::error::Error for ResponseValidationError {}

impl IntoReply for ResponseValidationError {
    fn into_reply(self) -> Reply {
        Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "Response validation failed")
    }
}
