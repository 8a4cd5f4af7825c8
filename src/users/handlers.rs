use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderName, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::dto::{LoginRequest, RegisterRequest};
use super::service;
use crate::auth::{AuthUser, JwtKeys};
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.validate()?;

    let user = service::register(state.store.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "User registered successfully",
            "data": { "user": user }
        })),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<([(HeaderName, String); 1], Json<Value>), AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.validate()?;

    let jwt = JwtKeys::from_ref(&state);
    let outcome = service::login(state.store.as_ref(), &jwt, payload).await?;

    let cookie = session_cookie(&outcome.token, jwt.ttl.as_secs());
    Ok((
        [(SET_COOKIE, cookie)],
        Json(json!({
            "status": "success",
            "data": { "token": outcome.token, "role": outcome.role }
        })),
    ))
}

#[instrument]
async fn logout() -> ([(HeaderName, String); 1], Json<Value>) {
    // overwrite the token with an already-expired cookie
    let cookie = "token=loggedout; Path=/; Max-Age=0; HttpOnly".to_string();
    ([(SET_COOKIE, cookie)], Json(json!({ "status": "success" })))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let profile = service::get_profile(state.store.as_ref(), user.id).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "user": profile }
    })))
}

fn session_cookie(token: &str, max_age_secs: u64) -> String {
    let mut cookie =
        format!("token={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Strict");
    if !crate::config::dev_mode() {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_and_bounded() {
        let cookie = session_cookie("abc", 3600);
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
    }
}
