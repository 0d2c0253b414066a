pub mod captcha;
pub mod credential;
pub mod email;
pub mod rate_limit;

pub use captcha::{CaptchaChallenge, CaptchaStore};
pub use credential::CredentialService;
pub use email::{Mailer, SmtpMailer};
pub use rate_limit::RecoveryRateLimiter;
