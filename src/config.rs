//! Configuration management for the account service.
//!
//! Settings load from environment variables with development defaults;
//! a `.env` file is honored in debug builds.

use anyhow::{Context, Result};
use std::env;
use tracing::info;

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub email: EmailSettings,
    pub recovery: RecoverySettings,
    pub captcha: CaptchaSettings,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self> {
        // Load .env file in development
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
            info!("Loaded .env file for development");
        }

        Ok(Settings {
            server: ServerSettings::from_env()?,
            database: DatabaseSettings::from_env()?,
            email: EmailSettings::from_env()?,
            recovery: RecoverySettings::from_env()?,
            captcha: CaptchaSettings::from_env()?,
        })
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            acquire_timeout: env::var("DATABASE_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT")?,
        })
    }
}

/// Outbound email (SMTP) configuration
///
/// An empty `SMTP_HOST` puts the mailer in no-op mode.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub use_starttls: bool,
}

impl EmailSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "1025".to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@example.com".to_string()),
            use_starttls: env::var("SMTP_USE_STARTTLS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}

/// Credential-recovery configuration
#[derive(Debug, Clone)]
pub struct RecoverySettings {
    /// Reset-token lifetime in hours
    pub token_ttl_hours: i64,
    /// Base URL embedded in recovery emails; the token is appended as a query parameter
    pub reset_base_url: String,
    /// Attempts admitted per client within the sliding window
    pub max_attempts: u32,
    /// Sliding window length in seconds
    pub window_secs: i64,
    /// Path of the append-only attempt log
    pub attempt_log: String,
}

impl RecoverySettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            token_ttl_hours: env::var("RESET_TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("Invalid RESET_TOKEN_TTL_HOURS")?,
            reset_base_url: env::var("PASSWORD_RESET_BASE_URL")
                .unwrap_or_else(|_| "https://app.example.com/reset-password".to_string()),
            max_attempts: env::var("RECOVERY_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("Invalid RECOVERY_MAX_ATTEMPTS")?,
            window_secs: env::var("RECOVERY_WINDOW_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .context("Invalid RECOVERY_WINDOW_SECS")?,
            attempt_log: env::var("RECOVERY_ATTEMPT_LOG")
                .unwrap_or_else(|_| "logs/forgot-password.log".to_string()),
        })
    }
}

/// CAPTCHA challenge configuration
#[derive(Debug, Clone)]
pub struct CaptchaSettings {
    /// Challenge lifetime in seconds
    pub ttl_secs: i64,
    /// Number of characters in the challenge code
    pub code_length: usize,
}

impl CaptchaSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            ttl_secs: env::var("CAPTCHA_TTL_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .context("Invalid CAPTCHA_TTL_SECS")?,
            code_length: env::var("CAPTCHA_CODE_LENGTH")
                .unwrap_or_else(|_| "6".to_string())
                .parse()
                .context("Invalid CAPTCHA_CODE_LENGTH")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captcha_settings_from_env() {
        env::set_var("CAPTCHA_TTL_SECS", "60");
        env::set_var("CAPTCHA_CODE_LENGTH", "8");

        let settings = CaptchaSettings::from_env().unwrap();

        assert_eq!(settings.ttl_secs, 60);
        assert_eq!(settings.code_length, 8);

        env::remove_var("CAPTCHA_TTL_SECS");
        env::remove_var("CAPTCHA_CODE_LENGTH");
    }

    #[test]
    fn test_recovery_settings_defaults() {
        env::remove_var("RESET_TOKEN_TTL_HOURS");
        env::remove_var("RECOVERY_MAX_ATTEMPTS");
        env::remove_var("RECOVERY_WINDOW_SECS");

        let settings = RecoverySettings::from_env().unwrap();

        assert_eq!(settings.token_ttl_hours, 1);
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.window_secs, 600);
        assert_eq!(settings.attempt_log, "logs/forgot-password.log");
    }

    #[test]
    fn test_server_settings_invalid_port() {
        env::set_var("SERVER_PORT", "not-a-port");

        let result = ServerSettings::from_env();
        assert!(result.is_err());

        env::remove_var("SERVER_PORT");
    }
}
