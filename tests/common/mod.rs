//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use account_service::clock::ManualClock;
use account_service::db::{InMemoryUserRepository, UserRepository};
use account_service::error::Result;
use account_service::models::User;
use account_service::security::password;
use account_service::services::captcha::CaptchaStore;
use account_service::services::credential::CredentialService;
use account_service::services::email::Mailer;
use account_service::services::rate_limit::RecoveryRateLimiter;
use account_service::AppState;

/// Mailer double that records dispatched recovery tokens.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, t)| t.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, recipient: &str, token: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub mailer: Arc<RecordingMailer>,
    pub users: Arc<InMemoryUserRepository>,
    // Keeps the rate-limit log directory alive for the harness lifetime
    pub _log_dir: TempDir,
}

pub fn harness() -> TestHarness {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
    ));
    let users = Arc::new(InMemoryUserRepository::new());
    let mailer = Arc::new(RecordingMailer::default());
    let log_dir = tempfile::tempdir().expect("failed to create tempdir");

    let credentials = Arc::new(CredentialService::new(
        users.clone(),
        mailer.clone(),
        clock.clone(),
        Duration::hours(1),
    ));
    let captcha = Arc::new(CaptchaStore::new(Duration::seconds(120), 6, clock.clone()));
    let rate_limiter = Arc::new(RecoveryRateLimiter::new(
        log_dir.path().join("forgot-password.log"),
        3,
        Duration::minutes(10),
        clock.clone(),
    ));

    TestHarness {
        state: AppState {
            users: users.clone(),
            credentials,
            captcha,
            rate_limiter,
        },
        clock,
        mailer,
        users,
        _log_dir: log_dir,
    }
}

/// Seed an account whose current password is `OldPass123!`.
pub async fn seed_user(users: &InMemoryUserRepository, email: &str, alias: &str) -> User {
    let hash = password::hash_password("OldPass123!").expect("failed to hash password");
    let user = User::new(email.to_string(), alias.to_string(), None, hash);
    users.create(&user).await.expect("failed to seed user");
    user
}
