use thiserror::Error;

/// Unified result type for the crate.
pub type Result<T> = std::result::Result<T, BarError>;

/// Errors surfaced by layout construction and terminal output.
#[derive(Debug, Error)]
pub enum BarError {
    #[error("max steps must be greater than zero (got {0})")]
    InvalidMaxSteps(u32),
    #[error("`{0}` must not be empty")]
    EmptyText(&'static str),
    #[error("indicator {0:?} is not a printable character")]
    InvalidIndicator(char),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
