//! Budget ledger endpoints. Owner only: shared users get a 404.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::budget::{
    BudgetSummaryView, CategoryDriftView, CategoryListResponse, CategoryNew, CategoryPatch,
    CategoryView, ReconcileRequest, ReconcileResponse, TransactionListResponse, TransactionNew,
    TransactionView,
};
use engine::{BudgetCategory, BudgetTransaction, Money, TransactionKind, User};

use crate::{ServerError, server::ServerState};

fn category_view(category: BudgetCategory) -> CategoryView {
    CategoryView {
        remaining_minor: category.remaining().minor(),
        id: category.id,
        trip_id: category.trip_id,
        name: category.name,
        allocated_minor: category.allocated.minor(),
        spent_minor: category.spent.minor(),
        color: category.color,
        icon: category.icon,
    }
}

fn transaction_view(transaction: BudgetTransaction) -> TransactionView {
    TransactionView {
        id: transaction.id,
        budget_category_id: transaction.category_id,
        description: transaction.description,
        amount_minor: transaction.amount.minor(),
        kind: transaction.kind.as_str().to_string(),
        transaction_date: transaction.transaction_date,
        created_at: transaction.created_at,
    }
}

pub async fn summary(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<BudgetSummaryView>, ServerError> {
    let summary = state
        .engine
        .trip_budget_summary(trip_id, &user.username)
        .await?;
    Ok(Json(BudgetSummaryView {
        trip_id,
        trip_budget_minor: summary.trip_budget.minor(),
        categories: summary.categories.into_iter().map(category_view).collect(),
        total_allocated_minor: summary.total_allocated.minor(),
        total_spent_minor: summary.total_spent.minor(),
        remaining_minor: summary.remaining.minor(),
    }))
}

pub async fn reconcile(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<ReconcileRequest>,
) -> Result<Json<ReconcileResponse>, ServerError> {
    let report = state
        .engine
        .reconcile_budget(trip_id, payload.repair, &user.username)
        .await?;
    Ok(Json(ReconcileResponse {
        checked: report.checked,
        drifted: report
            .drifted
            .into_iter()
            .map(|drift| CategoryDriftView {
                category_id: drift.category_id,
                name: drift.name,
                cached_minor: drift.cached.minor(),
                recomputed_minor: drift.recomputed.minor(),
            })
            .collect(),
        repaired: report.repaired,
    }))
}

pub async fn create_category(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let mut cmd = engine::CategoryNew::new(payload.trip_id, payload.name)
        .allocated(Money::new(payload.allocated_minor.unwrap_or(0)));
    if let Some(color) = payload.color {
        cmd = cmd.color(color);
    }
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }

    let category = state.engine.create_category(cmd, &user.username).await?;
    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn list_categories(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories(trip_id, &user.username)
        .await?
        .into_iter()
        .map(category_view)
        .collect();
    Ok(Json(CategoryListResponse { categories }))
}

pub async fn update_category(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryPatch>,
) -> Result<Json<CategoryView>, ServerError> {
    let patch = engine::CategoryPatch {
        name: payload.name,
        allocated: payload.allocated_minor.map(Money::new),
        spent: payload.spent_minor.map(Money::new),
        color: payload.color,
        icon: payload.icon,
    };
    let category = state
        .engine
        .update_category(category_id, patch, &user.username)
        .await?;
    Ok(Json(category_view(category)))
}

pub async fn delete_category(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_category(category_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_transaction(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let kind = payload
        .kind
        .as_deref()
        .map(TransactionKind::try_from)
        .transpose()?
        .unwrap_or_default();
    let cmd = engine::TransactionNew::new(
        payload.budget_category_id,
        payload.description,
        Money::new(payload.amount_minor),
        payload.transaction_date,
    )
    .kind(kind);

    let transaction = state.engine.add_transaction(cmd, &user.username).await?;
    Ok((StatusCode::CREATED, Json(transaction_view(transaction))))
}

pub async fn list_transactions(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .engine
        .list_transactions(category_id, &user.username)
        .await?
        .into_iter()
        .map(transaction_view)
        .collect();
    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn delete_transaction(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(transaction_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
