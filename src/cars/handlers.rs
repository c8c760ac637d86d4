use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    cars::dto::{
        CardInfo, ExploreResponse, FullDetails, GridCar, SavedResponse, ToggleCountRequest,
        ToggleCountResponse,
    },
    cars::repo,
    error::ApiError,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/cars/explore", get(explore))
        .route("/cars/saved", get(saved))
        .route("/cars/:id", get(single_view))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/cars/:id/toggle-count", post(toggle_count))
}

/// The swipe deck: cars the signed-in user has not judged yet.
#[instrument(skip(state))]
pub async fn explore(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ExploreResponse>, ApiError> {
    let candidates = repo::candidates_for(&state.db, auth.user_id).await?;
    let cars: Vec<CardInfo> = candidates.iter().map(CardInfo::from).collect();
    Ok(Json(ExploreResponse {
        cars_remain: !cars.is_empty(),
        cars,
    }))
}

/// Cars the user swiped right on, with their current popularity.
#[instrument(skip(state))]
pub async fn saved(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SavedResponse>, ApiError> {
    let liked = repo::liked_by(&state.db, auth.user_id).await?;
    let cars: Vec<GridCar> = liked.iter().map(GridCar::from).collect();
    Ok(Json(SavedResponse {
        liked_exist: !cars.is_empty(),
        cars,
    }))
}

#[instrument(skip(state))]
pub async fn single_view(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<FullDetails>, ApiError> {
    let car = repo::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Car not found".into()))?;
    Ok(Json(FullDetails::from(car)))
}

/// Direct popularity adjustment. Independent of the swipe ledger: no
/// interaction row is read or written here.
#[instrument(skip(state, payload))]
pub async fn toggle_count(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ToggleCountRequest>,
) -> Result<Json<ToggleCountResponse>, ApiError> {
    let Some(liked) = payload.liked() else {
        warn!(car_id = id, "toggle-count with non-boolean liked");
        return Err(ApiError::Validation("Invalid liked value".into()));
    };

    let like_count = repo::adjust_popularity(&state.db, id, liked)
        .await?
        .ok_or_else(|| ApiError::NotFound("Car not found".into()))?;

    info!(car_id = id, liked, like_count, "popularity adjusted");
    Ok(Json(ToggleCountResponse { like_count }))
}
