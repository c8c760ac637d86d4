use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
    swipes::dto::{DepletedRequest, DepletedResponse, SwipeRequest, SwipeResponse},
    swipes::repo,
};

pub fn swipe_routes() -> Router<AppState> {
    Router::new()
        .route("/swipes", post(swipe))
        .route("/swipes/depleted", post(depleted))
}

/// Record a right/left judgment for the signed-in user.
#[instrument(skip(state, payload))]
pub async fn swipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, ApiError> {
    let (car_id, swiped_right) = payload.resolve().map_err(|msg| {
        warn!(user_id = %auth.user_id, reason = msg, "malformed swipe");
        ApiError::Validation(msg.into())
    })?;

    let interaction = repo::record(&state.db, auth.user_id, car_id, swiped_right)
        .await
        .map_err(ApiError::Database)?;

    info!(
        user_id = %auth.user_id,
        car_id,
        swiped_right,
        interaction_id = interaction.id,
        "swipe recorded"
    );
    Ok(Json(SwipeResponse {
        status: "success",
        car_id,
        swiped_right,
    }))
}

/// Acknowledge that the client's deck ran out. No state is touched; a
/// payload without a genuine boolean flag is rejected.
#[instrument]
pub async fn depleted(
    Json(payload): Json<DepletedRequest>,
) -> Result<Json<DepletedResponse>, ApiError> {
    match payload.is_empty() {
        Some(true) => Ok(Json(DepletedResponse {
            message: "No more cards available",
        })),
        Some(false) => Ok(Json(DepletedResponse {
            message: "Cards still available",
        })),
        None => Err(ApiError::Validation("Invalid request".into())),
    }
}
