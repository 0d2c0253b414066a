pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod validators;

pub use config::Settings;
pub use error::{AppError, Result};

use std::sync::Arc;

use crate::db::UserRepository;
use crate::services::captcha::CaptchaStore;
use crate::services::credential::CredentialService;
use crate::services::rate_limit::RecoveryRateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub credentials: Arc<CredentialService>,
    pub captcha: Arc<CaptchaStore>,
    pub rate_limiter: Arc<RecoveryRateLimiter>,
}
