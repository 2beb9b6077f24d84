//! Crate-level error type.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::permissions::Permission;
use crate::session::Role;

/// Failure of a single engine operation.
///
/// Batch helpers attach one of these to each failed item instead of
/// aborting the batch.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source could not be turned into a raster.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The raster could not be serialized.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A caller-supplied parameter was rejected before any decoding.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The session's role lacks the permission for this operation.
    #[error("Role {role} is not allowed to {permission}")]
    PermissionDenied { role: Role, permission: Permission },

    /// The batch was cancelled before this item started.
    #[error("Operation cancelled")]
    Cancelled,

    /// The record store rejected a write.
    #[error("Record store error: {0}")]
    Store(String),

    /// The engine configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for failures caused by the source image itself.
    pub fn is_decode(&self) -> bool {
        matches!(self, EngineError::Decode(_))
    }
}
