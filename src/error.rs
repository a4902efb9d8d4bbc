use thiserror::Error;

use crate::session::SessionState;

/// Top-level error type for the placement engine.
#[derive(Debug, Error)]
pub enum MusterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors related to loading or validating rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse rules: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid rule value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Errors related to formation layout requests.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("a formation needs at least one model")]
    EmptyFormation,
}

/// Errors raised by the interactive placement session.
///
/// Rejected placements are not errors; they come back as ordinary outcomes.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {operation} while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("only {placed} of {total} models are placed")]
    Incomplete { placed: usize, total: usize },

    #[error("unit is out of coherency ({} model(s) too far from the unit)", violating.len())]
    Incoherent { violating: Vec<usize> },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Convenience type alias for results using [`MusterError`].
pub type Result<T> = std::result::Result<T, MusterError>;
