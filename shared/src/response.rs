//! API response envelope types
//!
//! All endpoints answer with either `{ "message": ..., ...payload }` on
//! success or `{ "error": ... }` on failure. The payload-carrying success
//! bodies are defined next to their handlers; these are the two shared
//! envelope halves.

use serde::{Deserialize, Serialize};

/// Bare success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
