//! Shared types for the Stay marketplace
//!
//! Common request/response types used in API communication between
//! stay-server and clients, plus small utilities.

pub mod client;
pub mod response;
pub mod util;

// Re-exports
pub use response::{ErrorBody, MessageResponse};
pub use serde::{Deserialize, Serialize};
