//! Authentication route handlers.

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::customer::Customer;
use crate::services::auth::AuthService;
use crate::services::email::generate_reset_code;
use crate::state::AppState;

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the bearer token and the account.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub customer: Customer,
}

/// Forgot-password request.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset-password request.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new customer account.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Customer>)> {
    let auth = AuthService::new(state.pool());
    let customer = auth
        .register(
            &body.email,
            &body.password,
            body.first_name.trim(),
            body.last_name.trim(),
            body.phone.as_deref(),
        )
        .await?;

    tracing::info!(customer_id = %customer.id, "Customer registered");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Login with email and password.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool());
    let (customer, token) = auth.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse { token, customer }))
}

/// Revoke the presented bearer token.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AckResponse>> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    let auth = AuthService::new(state.pool());
    auth.logout(token).await?;

    Ok(Json(AckResponse {
        success: true,
        message: "logged out".to_string(),
    }))
}

/// Request a password reset code.
///
/// Always answers 200 with the same body, so the endpoint does not leak
/// which email addresses have accounts.
#[instrument(skip(state, body))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<AckResponse>> {
    let auth = AuthService::new(state.pool());
    let code = generate_reset_code();

    if let Some(customer) = auth.request_reset(&body.email, &code).await? {
        if let Some(email) = state.email() {
            let email = email.clone();
            let to = customer.email.to_string();
            tokio::spawn(async move {
                if let Err(e) = email.send_reset_code(&to, &code).await {
                    tracing::error!("Failed to send reset code: {e}");
                }
            });
        } else {
            tracing::warn!(customer_id = %customer.id, "Reset requested but SMTP is disabled");
        }
    }

    Ok(Json(AckResponse {
        success: true,
        message: "if the address has an account, a reset code is on its way".to_string(),
    }))
}

/// Verify a reset code and set the new password.
#[instrument(skip(state, body))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<AckResponse>> {
    let auth = AuthService::new(state.pool());
    auth.reset_password(&body.email, &body.code, &body.new_password)
        .await?;

    Ok(Json(AckResponse {
        success: true,
        message: "password updated".to_string(),
    }))
}
