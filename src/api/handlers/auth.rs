use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ApiJson;
use crate::api::state::AppState;
use crate::auth::{validate_login, validate_registration, LoginRequest, PasswordHasher, RegistrationRequest};
use crate::models::{NewUser, UserProfile};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

// PBKDF2 is deliberately slow; keep it off the async workers
async fn hash_password(hasher: PasswordHasher, password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

async fn verify_password(hasher: PasswordHasher, password: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))
}

#[tracing::instrument(skip(state, request))]
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegistrationRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validate_registration(&request)?;

    let password_hash = hash_password(state.passwords.clone(), request.password).await?;

    let user = state
        .store
        .create_user(NewUser {
            name: request.name.trim().to_string(),
            email: request.email.to_lowercase(),
            password_hash,
        })
        .await?;

    let token = state.tokens.issue(user.id)?;

    info!(user_id = %user.id, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.to_profile(),
        }),
    ))
}

#[tracing::instrument(skip(state, request))]
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    validate_login(&request)?;

    let Some(credentials) = state.store.find_user_by_email(&request.email.to_lowercase()).await? else {
        warn!("Login for unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let valid = verify_password(
        state.passwords.clone(),
        request.password,
        credentials.password_hash,
    )
    .await?;

    if !valid {
        warn!(user_id = %credentials.user.id, "Login with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.tokens.issue(credentials.user.id)?;

    info!(user_id = %credentials.user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: credentials.user.to_profile(),
    }))
}
