use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::itinerary::{
    DayNew, DayPatch, DayView, ItemNew, ItemPatch, ItemView, ItineraryView,
};
use engine::{ItineraryDay, ItineraryItem, Money, User, parse_time};

use crate::{ServerError, server::ServerState};

fn item_view(item: ItineraryItem) -> ItemView {
    ItemView {
        id: item.id,
        day_id: item.day_id,
        title: item.title,
        start_time: item.start_time.map(|time| time.format("%H:%M").to_string()),
        location: item.location,
        activity_id: item.activity_id,
        cost_minor: item.cost.minor(),
        notes: item.notes,
        position: item.position,
    }
}

fn day_view(day: ItineraryDay) -> DayView {
    DayView {
        id: day.id,
        trip_id: day.trip_id,
        day_number: day.day_number,
        date: day.date,
        title: day.title,
        notes: day.notes,
        items: day.items.into_iter().map(item_view).collect(),
    }
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<ItineraryView>, ServerError> {
    let days = state
        .engine
        .itinerary(trip_id, &user.username)
        .await?
        .into_iter()
        .map(day_view)
        .collect();
    Ok(Json(ItineraryView { trip_id, days }))
}

pub async fn add_day(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<DayNew>,
) -> Result<(StatusCode, Json<DayView>), ServerError> {
    let cmd = engine::DayNew {
        day_number: payload.day_number,
        date: payload.date,
        title: payload.title,
        notes: payload.notes,
    };
    let day = state.engine.add_day(trip_id, cmd, &user.username).await?;
    Ok((StatusCode::CREATED, Json(day_view(day))))
}

pub async fn update_day(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<DayPatch>,
) -> Result<Json<DayView>, ServerError> {
    let patch = engine::DayPatch {
        day_number: payload.day_number,
        date: payload.date,
        title: payload.title,
        notes: payload.notes,
    };
    let day = state
        .engine
        .update_day(day_id, patch, &user.username)
        .await?;
    Ok(Json(day_view(day)))
}

pub async fn delete_day(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_day(day_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<ItemNew>,
) -> Result<(StatusCode, Json<ItemView>), ServerError> {
    let cmd = engine::ItemNew {
        title: payload.title,
        start_time: payload.start_time.as_deref().map(parse_time).transpose()?,
        location: payload.location,
        activity_id: payload.activity_id,
        cost: Money::new(payload.cost_minor.unwrap_or(0)),
        notes: payload.notes,
    };
    let item = state.engine.add_item(day_id, cmd, &user.username).await?;
    Ok((StatusCode::CREATED, Json(item_view(item))))
}

pub async fn update_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ItemPatch>,
) -> Result<Json<ItemView>, ServerError> {
    let patch = engine::ItemPatch {
        title: payload.title,
        start_time: payload.start_time.as_deref().map(parse_time).transpose()?,
        location: payload.location,
        cost: payload.cost_minor.map(Money::new),
        notes: payload.notes,
        position: payload.position,
    };
    let item = state
        .engine
        .update_item(item_id, patch, &user.username)
        .await?;
    Ok(Json(item_view(item)))
}

pub async fn delete_item(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_item(item_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
