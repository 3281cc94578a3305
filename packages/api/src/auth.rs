// ABOUTME: Token authentication middleware and the authenticated-user extractor
// ABOUTME: Resolves `Authorization: Token <key>` or `X-API-Token` to the owning user

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use larder_security::TokenStorage;

use crate::db::DbState;
use crate::error::AppError;

/// Alternate header carrying a bare token
pub const API_TOKEN_HEADER: &str = "X-API-Token";

/// Scheme expected in the `Authorization` header
pub const TOKEN_SCHEME: &str = "Token";

/// Routes that don't require authentication
const PUBLIC_ROUTES: &[(Method, &str)] = &[
    (Method::GET, "/api/health"),
    (Method::POST, "/api/user/create"),
    (Method::POST, "/api/user/token"),
];

/// The user a request was authenticated as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub token_id: String,
}

fn requires_authentication(method: &Method, path: &str) -> bool {
    !PUBLIC_ROUTES
        .iter()
        .any(|(public_method, public_path)| public_method == method && *public_path == path)
}

/// Pull the token out of `Authorization: Token <key>`, falling back to `X-API-Token`
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let from_authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, key) = value.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case(TOKEN_SCHEME).then(|| key.trim())
        });

    from_authorization
        .or_else(|| {
            headers
                .get(API_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
        })
        .filter(|token| !token.is_empty())
}

/// API token validation middleware
pub async fn api_token_middleware(
    State(db): State<DbState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if !requires_authentication(request.method(), &path) {
        debug!(path = %path, "Public route, skipping token validation");
        return Ok(next.run(request).await);
    }

    let Some(token) = extract_token(request.headers()).map(str::to_string) else {
        warn!(path = %path, "Missing API token");
        return Err(AppError::Unauthorized);
    };

    let token_info = db.token_storage.verify_token(&token).await.map_err(|e| {
        warn!(error = %e, "Token verification failed");
        AppError::Unauthorized
    })?;

    let Some(token_info) = token_info else {
        warn!(path = %path, "Invalid API token provided");
        return Err(AppError::Unauthorized);
    };

    let token_hash = TokenStorage::hash_token(&token);
    if let Err(e) = db.token_storage.update_last_used(&token_hash).await {
        // Not fatal for the request
        warn!(error = %e, "Failed to update token last_used timestamp");
    }

    debug!(path = %path, user_id = token_info.user_id, "API token validated");

    request.extensions_mut().insert(CurrentUser {
        id: token_info.user_id,
        token_id: token_info.id,
    });

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
