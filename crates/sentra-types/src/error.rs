use thiserror::Error;

/// Request-shape errors, rejected before the pipeline runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("malformed field {field}: {reason}")]
    MalformedField {
        field: &'static str,
        reason: String,
    },
}
