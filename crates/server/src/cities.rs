//! City catalog and activity recommendations.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use api_types::{
    city::{ActivityView, CityDetail, CityListResponse, CityQuery, CityView},
    recommendation::{RecommendationRequest, RecommendationResponse, RecommendationView},
};
use engine::{Activity, City, User};

use crate::{ServerError, server::ServerState};

fn city_view(city: City) -> CityView {
    CityView {
        id: city.id,
        name: city.name,
        country: city.country,
        description: city.description,
        avg_daily_cost_minor: city.avg_daily_cost.minor(),
    }
}

fn activity_view(activity: Activity) -> ActivityView {
    ActivityView {
        id: activity.id,
        city_id: activity.city_id,
        name: activity.name,
        category: activity.category,
        price_minor: activity.price.minor(),
        rating_tenths: activity.rating_tenths,
        duration_minutes: activity.duration_minutes,
        description: activity.description,
    }
}

pub async fn list(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<CityListResponse>, ServerError> {
    let cities = state
        .engine
        .list_cities(query.q.as_deref())
        .await?
        .into_iter()
        .map(city_view)
        .collect();
    Ok(Json(CityListResponse { cities }))
}

pub async fn get(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(city_id): Path<Uuid>,
) -> Result<Json<CityDetail>, ServerError> {
    let detail = state.engine.city(city_id).await?;
    Ok(Json(CityDetail {
        city: city_view(detail.city),
        activities: detail.activities.into_iter().map(activity_view).collect(),
    }))
}

pub async fn recommend(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(trip_id): Path<Uuid>,
    Json(payload): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ServerError> {
    let recommendations = state
        .engine
        .recommend_activities(trip_id, &payload.interests, payload.limit, &user.username)
        .await?
        .into_iter()
        .map(|recommendation| RecommendationView {
            activity: activity_view(recommendation.activity),
            score: recommendation.score,
            matches_interest: recommendation.matches_interest,
        })
        .collect();
    Ok(Json(RecommendationResponse {
        trip_id,
        recommendations,
    }))
}
