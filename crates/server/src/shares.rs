//! Trip sharing endpoints (owner-only).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::share::{TripShareUpsert, TripShareView, TripSharesResponse};
use engine::{ShareRole, User};

use crate::{ServerError, server::ServerState};

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripSharesResponse>, ServerError> {
    let shares = state
        .engine
        .list_trip_shares(trip_id, &user.username)
        .await?
        .into_iter()
        .map(|share| TripShareView {
            username: share.username,
            role: share.role.as_str().to_string(),
        })
        .collect();

    Ok(Json(TripSharesResponse { shares }))
}

pub async fn upsert(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<TripShareUpsert>,
) -> Result<StatusCode, ServerError> {
    let role = ShareRole::try_from(payload.role.as_str())?;
    state
        .engine
        .share_trip(trip_id, &payload.username, role, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path((trip_id, username)): Path<(Uuid, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .unshare_trip(trip_id, &username, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
