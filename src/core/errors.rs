//! RGD-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, GridError>;

/// Top-level error type for the reservation grid engine.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("[RGD-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[RGD-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[RGD-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[RGD-2001] malformed status feed: {details}")]
    MalformedFeed { details: String },

    #[error("[RGD-2002] unparseable date value {value:?}: {details}")]
    DateParse { value: String, details: String },

    #[error("[RGD-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[RGD-3001] invalid negotiation transition from {state} on {input}")]
    InvalidTransition {
        state: &'static str,
        input: &'static str,
    },

    #[error("[RGD-3002] proposal response flagged a change but carried no result data")]
    MissingProposalData,

    #[error("[RGD-3101] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GridError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "RGD-1001",
            Self::MissingConfig { .. } => "RGD-1002",
            Self::ConfigParse { .. } => "RGD-1003",
            Self::MalformedFeed { .. } => "RGD-2001",
            Self::DateParse { .. } => "RGD-2002",
            Self::Serialization { .. } => "RGD-2101",
            Self::InvalidTransition { .. } => "RGD-3001",
            Self::MissingProposalData => "RGD-3002",
            Self::Io { .. } => "RGD-3101",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Feed and transition errors are structural; only IO is transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Convenience constructor for a malformed-feed failure.
    #[must_use]
    pub fn malformed_feed(details: impl Into<String>) -> Self {
        Self::MalformedFeed {
            details: details.into(),
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for GridError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for GridError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_errors() -> Vec<GridError> {
        vec![
            GridError::InvalidConfig {
                details: String::new(),
            },
            GridError::MissingConfig {
                path: PathBuf::new(),
            },
            GridError::ConfigParse {
                context: "",
                details: String::new(),
            },
            GridError::MalformedFeed {
                details: String::new(),
            },
            GridError::DateParse {
                value: String::new(),
                details: String::new(),
            },
            GridError::Serialization {
                context: "",
                details: String::new(),
            },
            GridError::InvalidTransition {
                state: "idle",
                input: "accept",
            },
            GridError::MissingProposalData,
            GridError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = sample_errors();
        let codes: Vec<&str> = errors.iter().map(GridError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn error_codes_have_rgd_prefix() {
        for err in &sample_errors() {
            assert!(
                err.code().starts_with("RGD-"),
                "code {} must start with RGD-",
                err.code()
            );
        }
    }

    #[test]
    fn error_display_includes_code() {
        let err = GridError::malformed_feed("expected 7 day buckets, got 5");
        let msg = err.to_string();
        assert!(
            msg.contains("RGD-2001"),
            "display should contain error code: {msg}"
        );
        assert!(
            msg.contains("7 day buckets"),
            "display should contain details: {msg}"
        );
    }

    #[test]
    fn only_io_is_retryable() {
        for err in &sample_errors() {
            let expect = matches!(err, GridError::Io { .. });
            assert_eq!(err.is_retryable(), expect, "retryable mismatch: {err}");
        }
    }

    #[test]
    fn io_convenience_constructor() {
        let err = GridError::io(
            "/tmp/events.jsonl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "RGD-3101");
        assert!(err.to_string().contains("/tmp/events.jsonl"));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GridError = json_err.into();
        assert_eq!(err.code(), "RGD-2101");
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: GridError = toml_err.into();
        assert_eq!(err.code(), "RGD-1003");
    }
}
