//! Error types for the rule engine.
//!
//! Every failure is a caller-contract violation: nothing here is transient,
//! and a failed operation never leaves the board partially mutated.

use thiserror::Error;

/// Errors raised by board, game and history operations.
#[derive(Error, Debug)]
pub enum ChessError {
    /// Operation attempted while the board or game is in the wrong phase.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// A referenced piece does not exist where it was expected.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The requested destination is not a legal move for the piece.
    #[error("No move to the given destination is available: to={to}, piece={piece}")]
    IllegalDestination { to: String, piece: String },

    /// Internal consistency failure; correct calling code never sees this.
    #[error("Invariant violated: {message}")]
    InvariantViolation { message: String },

    /// Accessor called before the owning aggregate exists.
    #[error("Not initialized: {resource_name}")]
    Uninitialized { resource_name: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChessError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        ChessError::InvalidState {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ChessError::NotFound {
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        ChessError::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn uninitialized(resource_name: impl Into<String>) -> Self {
        ChessError::Uninitialized {
            resource_name: resource_name.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChessError::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type alias for rule engine operations.
pub type ChessResult<T> = Result<T, ChessError>;
