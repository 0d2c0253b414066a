/// CAPTCHA challenge handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CaptchaGenerateResponse {
    pub token: String,
    /// Challenge code; rendering it as an image is the caller's concern
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptchaVerifyRequest {
    pub token: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct CaptchaVerifyResponse {
    pub valid: bool,
}

/// POST /api/v1/captcha/generate
pub async fn generate_captcha(state: web::Data<AppState>) -> HttpResponse {
    let challenge = state.captcha.generate();

    HttpResponse::Ok().json(CaptchaGenerateResponse {
        token: challenge.token,
        code: challenge.code,
    })
}

/// POST /api/v1/captcha/verify
pub async fn verify_captcha(
    state: web::Data<AppState>,
    payload: web::Json<CaptchaVerifyRequest>,
) -> HttpResponse {
    let valid = state
        .captcha
        .verify_and_consume(&payload.token, &payload.answer);

    HttpResponse::Ok().json(CaptchaVerifyResponse { valid })
}
