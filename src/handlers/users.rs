/// Account registration handlers
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::User;
use crate::security::password;
use crate::validators;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "crate::validators::validate_email_shape_validator"))]
    pub email: String,
    #[validate(custom(function = "crate::validators::validate_alias_shape_validator"))]
    pub alias: String,
    pub display_name: Option<String>,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub email: String,
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct AliasAvailabilityResponse {
    pub available: bool,
}

/// Register endpoint handler
/// POST /api/v1/users/register
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    if payload.password != payload.password_confirm {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }
    if let Some(violation) = validators::password_policy_violation(&payload.password) {
        return Err(AppError::WeakPassword(violation.to_string()));
    }

    let email = payload.email.trim().to_lowercase();

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if state.users.find_by_alias(&payload.alias).await?.is_some() {
        return Err(AppError::Conflict("Alias already taken".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user = User::new(
        email,
        payload.alias.clone(),
        payload.display_name.clone(),
        password_hash,
    );
    state.users.create(&user).await?;

    tracing::info!(user_id = %user.id, "account registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        user_id: user.id,
        email: user.email,
        alias: user.alias,
    }))
}

/// Alias availability handler
/// GET /api/v1/users/check-alias/{alias}
pub async fn check_alias(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let alias = path.into_inner();
    let available =
        validators::validate_alias(&alias) && state.users.find_by_alias(&alias).await?.is_none();

    Ok(HttpResponse::Ok().json(AliasAvailabilityResponse { available }))
}
