// ABOUTME: HTTP request handlers for user accounts and token issuance
// ABOUTME: Registration, email/password token exchange and the caller's own profile

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use larder_security::{PublicUser, UserCreateInput, UserUpdateInput};

use crate::auth::CurrentUser;
use crate::db::DbState;
use crate::error::{ApiResult, AppError};
use crate::extract::ApiJson;

/// Name recorded against tokens issued through `/api/user/token`
const LOGIN_TOKEN_NAME: &str = "login";

pub async fn create_user(
    State(db): State<DbState>,
    ApiJson(input): ApiJson<UserCreateInput>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    info!("Registering user: {}", input.email);

    let user = db.user_storage.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Exchange credentials for a freshly minted token
pub async fn create_token(
    State(db): State<DbState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let Some(user) = db
        .user_storage
        .authenticate(&request.email, &request.password)
        .await?
    else {
        warn!("Rejected credentials for {}", request.email);
        return Err(AppError::InvalidCredentials);
    };

    let generated = db
        .token_storage
        .create_token(user.id, LOGIN_TOKEN_NAME)
        .await?;
    info!("Issued token {} for user {}", generated.id, user.id);

    Ok(Json(TokenResponse {
        token: generated.token,
    }))
}

/// Revoke the token the request was authenticated with
pub async fn delete_token(State(db): State<DbState>, user: CurrentUser) -> ApiResult<StatusCode> {
    info!("Revoking token {} for user {}", user.token_id, user.id);

    db.token_storage
        .revoke_token(user.id, &user.token_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_me(State(db): State<DbState>, user: CurrentUser) -> ApiResult<Json<PublicUser>> {
    let user = db.user_storage.get_user(user.id).await?;
    Ok(Json(user.into()))
}

/// Update the caller's name and/or password
pub async fn update_me(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiJson(input): ApiJson<UserUpdateInput>,
) -> ApiResult<Json<PublicUser>> {
    info!("Updating profile for user {}", user.id);

    let user = db.user_storage.update_user(user.id, input).await?;
    Ok(Json(user.into()))
}
