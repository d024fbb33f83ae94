//! Error taxonomy for the contact model.
//!
//! Every error here is recoverable at the user-interaction boundary:
//! validation failures leave local state untouched, remote failures leave
//! the last successful load in place.

use thiserror::Error;

use crate::fields::Field;

/// A raw value was rejected by a field's format rule, or named no field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown field \"{0}\"")]
    UnknownField(String),

    #[error("{field}: \"{value}\" is not a date in {expected} format")]
    InvalidDate {
        field: Field,
        value: String,
        expected: &'static str,
    },

    #[error("Tier: \"{0}\" is not a whole number")]
    TierNotNumeric(String),

    #[error("Tier: {0} is not one of 0, 1, 2, 3 or 9")]
    TierOutOfRange(i64),

    #[error("no contact at row {0}")]
    NoSuchRecord(usize),
}

/// Failure talking to the directory service.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("directory credentials unavailable: {0}")]
    Credentials(String),

    #[error("directory request failed: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("directory returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("directory response could not be decoded: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Error from sorting by a column index that names no field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("no sortable column at index {0}")]
    UnknownField(usize),
}

/// Configuration could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot determine home directory; set MARTIN_HOME")]
    NoHome,
}

/// Anything an edit or reload can surface to the user.
#[derive(Debug, Error)]
pub enum MartinErr {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl MartinErr {
    /// Whether re-entering the value can fix this.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
