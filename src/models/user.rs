/// Account model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A platform account.
///
/// `reset_token` and `reset_token_expires_at` are set and cleared together;
/// repository operations never write one without the other.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Normalized (trimmed, lower-cased) email address
    pub email: String,
    pub alias: String,
    pub display_name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: String,
        alias: String,
        display_name: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            alias,
            display_name,
            password_hash,
            is_blocked: false,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
        }
    }
}
