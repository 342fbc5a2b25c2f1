//! Error types for bookrag

use serde::Serialize;
use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Configuration,
    Validation,
    Embedding,
    Retrieval,
    Generation,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::Validation => "validation",
            Stage::Embedding => "embedding",
            Stage::Retrieval => "retrieval",
            Stage::Generation => "generation",
        };
        f.write_str(name)
    }
}

/// Core error types for the bookrag system
///
/// Messages carry provider detail but never credentials.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Generation error: {0}")]
    Generation(String),
}

impl Error {
    /// The pipeline stage this error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            Error::Configuration(_) => Stage::Configuration,
            Error::Validation(_) => Stage::Validation,
            Error::Embedding(_) => Stage::Embedding,
            Error::Retrieval(_) => Stage::Retrieval,
            Error::Generation(_) => Stage::Generation,
        }
    }

    /// The message without the stage prefix
    pub fn detail(&self) -> &str {
        match self {
            Error::Configuration(msg)
            | Error::Validation(msg)
            | Error::Embedding(msg)
            | Error::Retrieval(msg)
            | Error::Generation(msg) => msg,
        }
    }

    /// Re-attribute an error to `stage`, keeping the original message
    pub fn at_stage(self, stage: Stage) -> Self {
        if self.stage() == stage {
            return self;
        }

        let detail = self.to_string();
        match stage {
            Stage::Configuration => Error::Configuration(detail),
            Stage::Validation => Error::Validation(detail),
            Stage::Embedding => Error::Embedding(detail),
            Stage::Retrieval => Error::Retrieval(detail),
            Stage::Generation => Error::Generation(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_matches_variant() {
        assert_eq!(Error::Embedding("x".into()).stage(), Stage::Embedding);
        assert_eq!(Error::Retrieval("x".into()).stage(), Stage::Retrieval);
        assert_eq!(Error::Generation("x".into()).stage(), Stage::Generation);
        assert_eq!(Error::Validation("x".into()).stage(), Stage::Validation);
    }

    #[test]
    fn test_display_includes_stage() {
        let err = Error::Retrieval("collection `books` not found".into());
        assert_eq!(err.to_string(), "Retrieval error: collection `books` not found");
        assert_eq!(err.detail(), "collection `books` not found");
        assert_eq!(err.stage().to_string(), "retrieval");
    }

    #[test]
    fn test_at_stage() {
        let same = Error::Generation("quota exceeded".into()).at_stage(Stage::Generation);
        assert_eq!(same, Error::Generation("quota exceeded".into()));

        let moved = Error::Configuration("bad url".into()).at_stage(Stage::Retrieval);
        assert_eq!(moved, Error::Retrieval("Configuration error: bad url".into()));
    }
}
