//! Domain error types.

/// Raised when a stored record or a computation input fails validation.
///
/// This is the only error kind the derivation core itself produces. It is
/// always raised synchronously at the point of computation; callers decide
/// whether to skip the record or abort the batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("non-numeric {field}: {value:?}")]
    NonNumeric { field: &'static str, value: String },

    #[error("entry price must be positive, got {0}")]
    NonPositiveEntry(f64),

    #[error("empty symbol")]
    EmptySymbol,

    #[error("unknown trade action: {0:?}")]
    UnknownAction(String),

    #[error("unknown option type: {0:?}")]
    UnknownOptionType(String),

    #[error("unknown trade status: {0:?}")]
    UnknownStatus(String),

    #[error("invalid {field}: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("active record carries exit fields")]
    ExitFieldsOnActive,

    #[error("trade is already closed")]
    AlreadyClosed,
}

/// Top-level error type for calldesk.
#[derive(Debug, thiserror::Error)]
pub enum CalldeskError {
    #[error("store error: {reason}")]
    Store { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("push delivery error: {reason}")]
    Push { reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CalldeskError> for std::process::ExitCode {
    fn from(err: &CalldeskError) -> Self {
        let code: u8 = match err {
            CalldeskError::Io(_) => 1,
            CalldeskError::ConfigParse { .. }
            | CalldeskError::ConfigMissing { .. }
            | CalldeskError::ConfigInvalid { .. } => 2,
            CalldeskError::Store { .. } | CalldeskError::Push { .. } => 3,
            CalldeskError::Validation(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}
