// Payload parsing and the API error taxonomy
// Client faults map to 4xx, store faults to 5xx

use hyper::StatusCode;

use crate::store::{NewPuppy, PuppyPatch, StoreError};

/// Errors a handler can surface to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or invalid request payload (client fault).
    #[error("invalid puppy payload: {0}")]
    Validation(String),
    /// Failure reported by the record store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status this error surfaces as.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Unavailable { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Parse and validate a create/replace payload.
pub fn parse_new_puppy(body: &[u8]) -> Result<NewPuppy, ApiError> {
    let new: NewPuppy = serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("invalid JSON: {e}")))?;
    new.validate().map_err(ApiError::Validation)?;
    Ok(new)
}

/// Parse and validate a partial-update payload.
pub fn parse_puppy_patch(body: &[u8]) -> Result<PuppyPatch, ApiError> {
    let patch: PuppyPatch = serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("invalid JSON: {e}")))?;
    patch.validate().map_err(ApiError::Validation)?;
    Ok(patch)
}
