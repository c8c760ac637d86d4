use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, SignupRequest, StatusMessage},
        jwt::{AuthUser, JwtKeys},
        password::hash_password,
        repo::User,
        services::{self, ACCOUNT_EXISTS, INVALID_CREDENTIALS},
    },
    error::ApiError,
    session::SessionId,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/delete-account", post(delete_account))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    SessionId(sid): SessionId,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    // Throttle precheck: once the session has burnt its attempts, the
    // credentials are not even looked at and the counter stays put.
    let attempts = state.sessions.login_attempts(sid);
    if attempts >= state.config.max_login_attempts {
        warn!(session_id = %sid, attempts, "sign-in attempts exhausted");
        return Err(ApiError::Throttled);
    }

    payload.email = services::normalize_email(&payload.email);

    let user = User::find_by_email(&state.db, &payload.email).await?;
    let ok = services::credentials_match(user.as_ref(), &payload.password)?;

    let Some(user) = user.filter(|_| ok) else {
        let attempts = state.sessions.record_failed_login(sid);
        warn!(session_id = %sid, attempts, "login with invalid credentials");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    state.sessions.sign_in(sid, user.id);

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id, sid)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        session_id: sid,
        user: PublicUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
        },
    }))
}

/// Clears the session's auth state and its attempt counter. Deliberately
/// does not require a signed-in user: a throttled anonymous session resets
/// itself the same way.
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    SessionId(sid): SessionId,
) -> Json<StatusMessage> {
    state.sessions.sign_out(sid);
    info!(session_id = %sid, "signed out");
    Json(StatusMessage {
        message: "Signed out successfully!".into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    SessionId(sid): SessionId,
    Json(mut payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = services::normalize_email(&payload.email);

    services::validate_signup(
        &payload.email,
        &payload.first_name,
        &payload.password,
        &payload.confirm_password,
    )
    .map_err(|msg| {
        warn!(email = %payload.email, reason = msg, "signup rejected");
        ApiError::Validation(msg.into())
    })?;

    let hash = hash_password(&payload.password)?;

    let user = match User::create(&state.db, &payload.email, &payload.first_name, &hash).await {
        Ok(u) => u,
        Err(sqlx::Error::Database(db_err))
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            warn!(email = %payload.email, "email already registered");
            return Err(ApiError::Conflict(ACCOUNT_EXISTS.into()));
        }
        Err(e) => return Err(ApiError::Database(e)),
    };

    // Registration implies login: bind the session and wipe the counter.
    state.sessions.sign_in(sid, user.id);

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id, sid)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(AuthResponse {
        access_token,
        session_id: sid,
        user: PublicUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
        },
    }))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StatusMessage>, ApiError> {
    let deleted = User::delete_with_interactions(&state.db, auth.user_id).await?;

    // The session dies either way; a token for a vanished account must not
    // keep authenticating.
    state.sessions.sign_out(auth.session_id);

    if !deleted {
        warn!(user_id = %auth.user_id, "delete-account for unknown user");
        return Err(ApiError::NotFound("User not found.".into()));
    }

    info!(user_id = %auth.user_id, "account deleted");
    Ok(Json(StatusMessage {
        message: "Your account has successfully been deleted.".into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
    }))
}
