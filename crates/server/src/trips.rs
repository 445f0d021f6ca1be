use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::trip::{TripListResponse, TripNew, TripPatch, TripView};
use engine::{Money, Trip, TripStatus, User};

use crate::{ServerError, server::ServerState};

fn trip_view(trip: Trip) -> TripView {
    TripView {
        id: trip.id,
        owner: trip.user_id,
        destination: trip.destination,
        start_date: trip.start_date,
        end_date: trip.end_date,
        travelers: trip.travelers,
        budget_minor: trip.budget.minor(),
        status: trip.status.as_str().to_string(),
        notes: trip.notes,
        created_at: trip.created_at,
    }
}

fn parse_status(status: Option<&str>) -> Result<Option<TripStatus>, ServerError> {
    Ok(status.map(TripStatus::try_from).transpose()?)
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TripNew>,
) -> Result<(StatusCode, Json<TripView>), ServerError> {
    let mut cmd = engine::TripNew::new(payload.destination, payload.start_date, payload.end_date)
        .travelers(payload.travelers.unwrap_or(1))
        .budget(Money::new(payload.budget_minor.unwrap_or(0)));
    if let Some(status) = parse_status(payload.status.as_deref())? {
        cmd = cmd.status(status);
    }
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }

    let trip = state.engine.create_trip(&user.username, cmd).await?;
    Ok((StatusCode::CREATED, Json(trip_view(trip))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<TripListResponse>, ServerError> {
    let trips = state
        .engine
        .list_trips(&user.username)
        .await?
        .into_iter()
        .map(trip_view)
        .collect();
    Ok(Json(TripListResponse { trips }))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<TripView>, ServerError> {
    let trip = state.engine.trip(trip_id, &user.username).await?;
    Ok(Json(trip_view(trip)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<TripPatch>,
) -> Result<Json<TripView>, ServerError> {
    let patch = engine::TripPatch {
        destination: payload.destination,
        start_date: payload.start_date,
        end_date: payload.end_date,
        travelers: payload.travelers,
        budget: payload.budget_minor.map(Money::new),
        status: parse_status(payload.status.as_deref())?,
        notes: payload.notes,
    };
    let trip = state
        .engine
        .update_trip(trip_id, patch, &user.username)
        .await?;
    Ok(Json(trip_view(trip)))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_trip(trip_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
