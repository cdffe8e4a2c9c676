//! Construction-time failures
//!
//! Per-tick work never fails; everything that can go wrong is caught while
//! the game loop is being assembled.

/// Error raised while resolving the scene, loading sounds or reading settings
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("required scene node '{0}' not found")]
    MissingNode(&'static str),
    #[error("scene has more than one node for role {0}")]
    DuplicateRole(&'static str),
    #[error("required sound '{0}' could not be loaded")]
    MissingSound(String),
    #[error("invalid setting {field}: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: String,
    },
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SetupResult<T> = Result<T, SetupError>;
