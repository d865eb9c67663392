pub mod types;

pub mod conversion;

// Re-export commonly used types
pub use conversion::{ErrorDetail, REDACTED_MESSAGE};
pub use types::BackendError;

/// Result alias used by handlers and storage helpers
pub type BackendResult<T> = Result<T, BackendError>;
