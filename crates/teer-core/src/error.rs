//! Error types for payload validation.

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised when a payload fails its structural invariants.
///
/// Validation runs before any network call, so a payload that produces one of
/// these errors is never partially sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The payload (or a nested value) is not a JSON object.
    #[error("{0} must be a JSON object")]
    NotAnObject(String),

    /// A required field is absent.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A required string field is present but empty.
    #[error("field must not be empty: {0}")]
    EmptyField(String),

    /// A field has the wrong JSON type.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// Dotted path of the offending field.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A token count is negative.
    #[error("token count must not be negative: {field}={value}")]
    NegativeTokenCount {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected value.
        value: i64,
    },

    /// Billing fields carry both `meter` and `meters`.
    #[error("billing fields must set exactly one of `meter` or `meters`, found both")]
    ConflictingMeters,

    /// Billing fields carry neither `meter` nor `meters`.
    #[error("billing fields must set exactly one of `meter` or `meters`, found neither")]
    MissingMeter,

    /// Billing provider other than `stripe`.
    #[error("unsupported billing provider: {0}")]
    UnsupportedBillingProvider(String),

    /// LLM provider without a usage adapter.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Metadata value is an object or array.
    #[error("metadata value for `{0}` must be a string, number, or bool")]
    NonScalarMetadata(String),

    /// Timestamp is not RFC 3339 / ISO-8601.
    #[error("invalid timestamp `{value}`: {reason}")]
    InvalidTimestamp {
        /// The rejected timestamp.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// The value passed every explicit check but still does not match the schema.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl ValidationError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub(crate) fn empty(field: impl Into<String>) -> Self {
        Self::EmptyField(field.into())
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
