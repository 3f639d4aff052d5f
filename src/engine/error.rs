//! Errors returned by the engine API.

use std::fmt;
use std::io;

use crate::board::{FenError, MoveParseError};

/// Error type for engine operations
#[derive(Debug)]
pub enum EngineError {
    /// The position description could not be parsed
    InvalidFen(FenError),
    /// A move in a move list could not be applied
    InvalidMove { index: usize, source: MoveParseError },
    /// A search session is already running
    SearchInProgress,
    /// A coordinator thread could not be started
    ThreadSpawn(io::Error),
    /// A coordinator thread is gone
    CoordinatorGone,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidFen(err) => write!(f, "Invalid position: {err}"),
            EngineError::InvalidMove { index, source } => {
                write!(f, "Move {} of the move list: {source}", index + 1)
            }
            EngineError::SearchInProgress => write!(f, "A search is already running"),
            EngineError::ThreadSpawn(err) => write!(f, "Could not start engine thread: {err}"),
            EngineError::CoordinatorGone => write!(f, "Engine threads have exited"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::InvalidFen(err) => Some(err),
            EngineError::InvalidMove { source, .. } => Some(source),
            EngineError::ThreadSpawn(err) => Some(err),
            EngineError::SearchInProgress | EngineError::CoordinatorGone => None,
        }
    }
}

impl From<FenError> for EngineError {
    fn from(err: FenError) -> Self {
        EngineError::InvalidFen(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn wraps_parse_errors_with_source() {
        let err = EngineError::from(FenError::OpponentInCheck);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Invalid position"));

        let err = EngineError::InvalidMove {
            index: 1,
            source: MoveParseError::IllegalMove {
                notation: "e2e5".into(),
            },
        };
        assert_eq!(err.to_string(), "Move 2 of the move list: Illegal move 'e2e5'");
    }
}
