//! Credential recovery: reset-token issuance and one-time consumption.
//!
//! Per-account state machine: NoActiveToken -> TokenIssued -> (Consumed |
//! Expired). Issuing while a token is active overwrites it (last-write-wins
//! within an account); the superseded token stops matching and becomes
//! unusable. An expired token stays on the account until a successful reset
//! or a later reissue clears it.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Duration;
use rand::RngCore;
use tracing::info;

use crate::clock::Clock;
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::security::password;
use crate::services::email::Mailer;
use crate::validators;

/// Reset token length in raw bytes (256 bits before encoding)
const RESET_TOKEN_BYTES: usize = 32;

pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

impl CredentialService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            mailer,
            clock,
            token_ttl,
        }
    }

    /// Issue a reset token for `email` and dispatch the recovery mail.
    ///
    /// Succeeds silently when no account matches, or when the account is
    /// blocked: the response must not reveal whether an email is registered.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let email = normalize_email(email);
        if !validators::validate_email(&email) {
            return Err(AppError::InvalidEmail(email));
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            info!("password reset requested for unknown email; responding silently");
            return Ok(());
        };

        if user.is_blocked {
            // Blocked accounts look identical to absent ones from outside
            info!(user_id = %user.id, "password reset requested for blocked account; skipping");
            return Ok(());
        }

        let token = generate_reset_token();
        let expires_at = self.clock.now() + self.token_ttl;

        self.users
            .store_reset_token(user.id, &token, expires_at)
            .await?;
        self.mailer.send_password_reset(&user.email, &token).await?;

        info!(user_id = %user.id, "password reset token issued");
        Ok(())
    }

    /// Consume `token` and set `new_password` on its account.
    ///
    /// The token and its expiry are cleared together on success; an expired
    /// token is reported as such but left in place.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::TokenMissing);
        }

        let Some(user) = self.users.find_by_reset_token(token).await? else {
            return Err(AppError::TokenInvalid);
        };
        let Some(expires_at) = user.reset_token_expires_at else {
            return Err(AppError::TokenInvalid);
        };
        if expires_at < self.clock.now() {
            return Err(AppError::TokenExpired);
        }

        if let Some(violation) = validators::password_policy_violation(new_password) {
            return Err(AppError::WeakPassword(violation.to_string()));
        }
        if password::verify_password(new_password, &user.password_hash)? {
            return Err(AppError::PasswordReused);
        }

        let password_hash = password::hash_password(new_password)?;
        self.users
            .update_password_and_clear_reset_token(user.id, &password_hash)
            .await?;

        info!(user_id = %user.id, "password reset completed");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 256-bit random reset token, URL-safe base64 without padding
fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
