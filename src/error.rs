use crate::entitlements::LimitedResource;

/// The main error type for the application core.
#[derive(Debug, thiserror::Error)]
pub enum VerdantError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Subscription backend error: {0}")]
    Backend(String),

    /// A free-tier usage ceiling was reached.
    #[error("Free-tier limit reached for {resource}: {current}/{max}")]
    LimitExceeded {
        resource: LimitedResource,
        current: u32,
        max: u32,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl VerdantError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Whether this error is a gating refusal rather than a failure.
    #[must_use]
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Self::LimitExceeded { .. })
    }
}

/// Convenience result type for the crate.
pub type Result<T> = std::result::Result<T, VerdantError>;
