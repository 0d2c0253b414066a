pub mod auth;
pub mod captcha;
pub mod health;
pub mod users;

pub use auth::{forgot_password, reset_password};
pub use captcha::{generate_captcha, verify_captcha};
pub use health::health_check;
pub use users::{check_alias, register};
