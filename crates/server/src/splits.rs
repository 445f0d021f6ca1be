use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::split::{
    BalanceView, ShareSettle, SplitBalancesResponse, SplitListResponse, SplitNew, SplitShareView,
    SplitView,
};
use engine::{ExpenseSplit, Money, ParticipantInput, SplitShare, SplitType, User};

use crate::{ServerError, server::ServerState};

fn share_view(share: SplitShare) -> SplitShareView {
    SplitShareView {
        id: share.id,
        split_id: share.split_id,
        participant: share.participant,
        amount_minor: share.amount.minor(),
        settled: share.settled,
    }
}

fn split_view(split: ExpenseSplit) -> SplitView {
    SplitView {
        id: split.id,
        trip_id: split.trip_id,
        description: split.description,
        total_minor: split.total.minor(),
        paid_by: split.paid_by,
        split_type: split.split_type.as_str().to_string(),
        created_at: split.created_at,
        shares: split.shares.into_iter().map(share_view).collect(),
    }
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<SplitNew>,
) -> Result<(StatusCode, Json<SplitView>), ServerError> {
    let participants = payload
        .participants
        .into_iter()
        .map(|participant| ParticipantInput {
            name: participant.name,
            amount: participant.amount_minor.map(Money::new),
            percent_bp: participant.percent_bp,
        })
        .collect();
    let cmd = engine::SplitNew {
        description: payload.description,
        total: Money::new(payload.total_minor),
        paid_by: payload.paid_by,
        split_type: SplitType::try_from(payload.split_type.as_str())?,
        participants,
    };

    let split = state
        .engine
        .create_split(trip_id, cmd, &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(split_view(split))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<SplitListResponse>, ServerError> {
    let splits = state
        .engine
        .list_splits(trip_id, &user.username)
        .await?
        .into_iter()
        .map(split_view)
        .collect();
    Ok(Json(SplitListResponse { splits }))
}

pub async fn balances(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<SplitBalancesResponse>, ServerError> {
    let balances = state
        .engine
        .split_balances(trip_id, &user.username)
        .await?
        .into_iter()
        .map(|balance| BalanceView {
            participant: balance.participant,
            paid_minor: balance.paid.minor(),
            owed_minor: balance.owed.minor(),
            net_minor: balance.net.minor(),
        })
        .collect();
    Ok(Json(SplitBalancesResponse { trip_id, balances }))
}

pub async fn settle(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(share_id): Path<Uuid>,
    Json(payload): Json<ShareSettle>,
) -> Result<Json<SplitShareView>, ServerError> {
    let share = state
        .engine
        .settle_share(share_id, payload.settled, &user.username)
        .await?;
    Ok(Json(share_view(share)))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(split_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_split(split_id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
