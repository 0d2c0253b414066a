/// Credential recovery handlers
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Client identity for rate limiting: the literal network-layer source
/// address. Forwarded headers are deliberately not consulted.
fn client_identity(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Handle forgot password request
/// POST /api/v1/auth/forgot-password
///
/// The admission check runs before the attempt is recorded; rejected
/// requests are not logged. The response is the same whether or not the
/// email is registered.
pub async fn forgot_password(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let client = client_identity(&req);

    let attempts = match state.rate_limiter.recent_attempts(&client) {
        Ok(attempts) => attempts,
        Err(e) => {
            warn!(error = %e, "recovery attempt log unreadable; admitting request (fail-open)");
            0
        }
    };
    if attempts >= state.rate_limiter.max_attempts() {
        return Err(AppError::RateLimitExceeded);
    }
    if let Err(e) = state.rate_limiter.record_attempt(&client) {
        warn!(error = %e, "failed to record recovery attempt; continuing (fail-open)");
    }

    state
        .credentials
        .request_password_reset(&payload.email)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "If the email is registered, a recovery link has been sent.".to_string(),
    }))
}

/// Handle password reset request
/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    state: web::Data<AppState>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .credentials
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password updated successfully.".to_string(),
    }))
}
