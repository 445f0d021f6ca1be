use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use std::{net::SocketAddr, sync::Arc};

use crate::{budget, cities, itinerary, shares, splits, trips};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolves `Authorization: Bearer <token>` to a user and stores it in the
/// request extensions. Missing, malformed or unknown tokens get a 401.
async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(bearer) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = state
        .engine
        .user_by_token(bearer.token())
        .await
        .map_err(|err| {
            tracing::error!("failed to resolve bearer token: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/trips", post(trips::create).get(trips::list))
        .route(
            "/trips/{id}",
            get(trips::get).patch(trips::update).delete(trips::remove),
        )
        .route("/trips/{id}/budget", get(budget::summary))
        .route("/trips/{id}/budget/reconcile", post(budget::reconcile))
        .route("/trips/{id}/budget/categories", get(budget::list_categories))
        .route("/budget/categories", post(budget::create_category))
        .route(
            "/budget/categories/{id}",
            patch(budget::update_category).delete(budget::delete_category),
        )
        .route(
            "/budget/categories/{id}/transactions",
            get(budget::list_transactions),
        )
        .route("/budget/transactions", post(budget::add_transaction))
        .route(
            "/budget/transactions/{id}",
            delete(budget::delete_transaction),
        )
        .route("/trips/{id}/itinerary", get(itinerary::get))
        .route("/trips/{id}/itinerary/days", post(itinerary::add_day))
        .route(
            "/itinerary/days/{id}",
            patch(itinerary::update_day).delete(itinerary::delete_day),
        )
        .route("/itinerary/days/{id}/items", post(itinerary::add_item))
        .route(
            "/itinerary/items/{id}",
            patch(itinerary::update_item).delete(itinerary::delete_item),
        )
        .route("/cities", get(cities::list))
        .route("/cities/{id}", get(cities::get))
        .route("/trips/{id}/recommendations", post(cities::recommend))
        .route("/trips/{id}/splits", post(splits::create).get(splits::list))
        .route("/trips/{id}/splits/balances", get(splits::balances))
        .route("/splits/shares/{id}", patch(splits::settle))
        .route("/splits/{id}", delete(splits::remove))
        .route("/trips/{id}/shares", get(shares::list).post(shares::upsert))
        .route("/trips/{id}/shares/{username}", delete(shares::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_with_listener(engine, listener).await
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
