//! Unified error types for pict_engine

use thiserror::Error;

use crate::TransferMode;

/// Main error type for compositing operations.
///
/// All variants are deterministic functions of the input: retrying the same
/// operation yields the same error, so callers should surface them as a
/// decode failure for the current picture instead of retrying.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CompositeError {
    #[error("Unsupported transfer mode code: {code}")]
    UnsupportedMode { code: u16 },

    #[error("Transfer mode '{mode}' is undefined for colored destination pixels")]
    UndefinedOperation { mode: TransferMode },

    #[error("Blend weight {weight} out of range (0..=65535)")]
    InvalidWeight { weight: u32 },
}

/// Result type alias for pict_engine operations
pub type Result<T> = std::result::Result<T, CompositeError>;
