//! Request and response bodies for the `/auth` and `/entries` endpoints.
//!
//! Conventions:
//! - `*Request`  → deserialized from the client JSON body
//! - `*Response` → serialized to client JSON
//! - The client wrapper in `crate::client` reuses these types, so the wire
//!   shapes live in exactly one place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::user::UserSummary;

// ============================================================================
// Common
// ============================================================================

/// Standard message response (OPTIONS acknowledgement, delete confirmation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Error envelope as seen by clients. `message` is only set on 500s.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Auth
// ============================================================================

pub const ACTION_REGISTER: &str = "register";
pub const ACTION_LOGIN: &str = "login";

/// POST /auth
///
/// Credentials are optional at parse time so an unknown action is reported
/// as such; register and login require both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub action: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl AuthRequest {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.username.as_deref()?, self.password.as_deref()?))
    }
}

/// Response for register (201) and login (200)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserSummary,
}

// ============================================================================
// Entries
// ============================================================================

/// POST /entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEntryRequest {
    /// Trusted as sent; see `handlers::entries::resolve_user_id`.
    #[serde(default)]
    pub user_id: Option<i32>,
    pub date: NaiveDate,
    #[serde(default)]
    pub mood: Option<i32>,
    #[serde(default)]
    pub sleep: Option<f64>,
    #[serde(default)]
    pub stress: Option<i32>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub activities: Option<Vec<String>>,
}

/// DELETE /entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEntryRequest {
    #[serde(default)]
    pub user_id: Option<i32>,
    pub date: NaiveDate,
}

/// GET /entries body (optional) and query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSelector {
    #[serde(default)]
    pub user_id: Option<i32>,
}
