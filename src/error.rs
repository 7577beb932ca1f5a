//! Errors for every step of an export: geocoding, submission, validation, output.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Connection, DNS, TLS or timeout failure before a response arrived.
    #[error("network error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("overpass rejected the query ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("still rate limited after {0} attempts")]
    RateLimited(u32),

    #[error("area '{0}' could not be geocoded")]
    AreaNotFound(String),

    #[error("unsupported query shortcut: {0}")]
    UnsupportedShortcut(String),

    #[error("unexpected CSV header: expected [{expected}], found [{found}]")]
    UnexpectedHeader { expected: String, found: String },

    #[error("CSV line {line} has {found} fields, expected {expected}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a failed export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never got an answer.
    Network,
    /// A service answered, but with an error or with data we cannot accept.
    Api,
    /// Local files, settings or query templates.
    Local,
}

impl QueryError {
    pub fn kind(&self) -> FailureKind {
        match self {
            QueryError::Transport(_) => FailureKind::Network,
            QueryError::Api { .. }
            | QueryError::RateLimited(_)
            | QueryError::AreaNotFound(_)
            | QueryError::UnexpectedHeader { .. }
            | QueryError::MalformedRow { .. } => FailureKind::Api,
            QueryError::UnsupportedShortcut(_)
            | QueryError::Csv(_)
            | QueryError::Json(_)
            | QueryError::Io(_)
            | QueryError::Config(_) => FailureKind::Local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_and_api_failures_are_told_apart() {
        let network = QueryError::Transport(ureq::Error::ConnectionFailed);
        assert_eq!(network.kind(), FailureKind::Network);

        let api = QueryError::Api {
            status: 400,
            message: "parse error".into(),
        };
        assert_eq!(api.kind(), FailureKind::Api);
        assert_eq!(QueryError::AreaNotFound("Nowhere".into()).kind(), FailureKind::Api);
        assert_eq!(QueryError::Config("bad".into()).kind(), FailureKind::Local);
    }

    #[test]
    fn messages_name_the_problem() {
        let err = QueryError::MalformedRow {
            line: 3,
            expected: 7,
            found: 6,
        };
        assert_eq!(err.to_string(), "CSV line 3 has 6 fields, expected 7");
        assert_eq!(
            QueryError::AreaNotFound("Atlantis".into()).to_string(),
            "area 'Atlantis' could not be geocoded"
        );
    }
}
