//! JSON request and response bodies of the Itinera HTTP API.
//!
//! Money is always carried as integer minor units in `*_minor` fields.
//! Enumerated values (`status`, `kind`, `split_type`, `role`) travel as plain
//! strings and are validated by the server, so an unknown value is reported
//! as a validation error rather than a JSON decoding failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod trip {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub destination: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        /// Defaults to 1.
        pub travelers: Option<u32>,
        /// Defaults to 0.
        pub budget_minor: Option<i64>,
        /// Defaults to `planned`.
        pub status: Option<String>,
        pub notes: Option<String>,
    }

    /// Partial update: absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TripPatch {
        pub destination: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub travelers: Option<u32>,
        pub budget_minor: Option<i64>,
        pub status: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: Uuid,
        pub owner: String,
        pub destination: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub travelers: u32,
        pub budget_minor: i64,
        pub status: String,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripListResponse {
        pub trips: Vec<TripView>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub trip_id: Uuid,
        pub name: String,
        pub allocated_minor: Option<i64>,
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    /// Partial update. `spent_minor` overrides the cached spend and shows up
    /// as drift in the next reconciliation.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryPatch {
        pub name: Option<String>,
        pub allocated_minor: Option<i64>,
        pub spent_minor: Option<i64>,
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub trip_id: Uuid,
        pub name: String,
        pub allocated_minor: i64,
        pub spent_minor: i64,
        /// `allocated_minor - spent_minor`.
        pub remaining_minor: i64,
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub budget_category_id: Uuid,
        pub description: String,
        /// Must be >= 0; the direction comes from `kind`.
        pub amount_minor: i64,
        pub transaction_date: NaiveDate,
        /// `expense` (default) or `income`.
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub budget_category_id: Uuid,
        pub description: String,
        pub amount_minor: i64,
        pub kind: String,
        pub transaction_date: NaiveDate,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSummaryView {
        pub trip_id: Uuid,
        pub trip_budget_minor: i64,
        pub categories: Vec<CategoryView>,
        pub total_allocated_minor: i64,
        pub total_spent_minor: i64,
        /// `trip_budget_minor - total_spent_minor`.
        pub remaining_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReconcileRequest {
        /// Overwrite drifted caches with the recomputed totals.
        #[serde(default)]
        pub repair: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryDriftView {
        pub category_id: Uuid,
        pub name: String,
        pub cached_minor: i64,
        pub recomputed_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReconcileResponse {
        pub checked: usize,
        pub drifted: Vec<CategoryDriftView>,
        pub repaired: bool,
    }
}

pub mod itinerary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DayNew {
        pub day_number: u32,
        pub date: Option<NaiveDate>,
        pub title: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DayPatch {
        pub day_number: Option<u32>,
        pub date: Option<NaiveDate>,
        pub title: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub title: String,
        /// `HH:MM`.
        pub start_time: Option<String>,
        pub location: Option<String>,
        pub activity_id: Option<Uuid>,
        pub cost_minor: Option<i64>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ItemPatch {
        pub title: Option<String>,
        /// `HH:MM`.
        pub start_time: Option<String>,
        pub location: Option<String>,
        pub cost_minor: Option<i64>,
        pub notes: Option<String>,
        pub position: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: Uuid,
        pub day_id: Uuid,
        pub title: String,
        pub start_time: Option<String>,
        pub location: Option<String>,
        pub activity_id: Option<Uuid>,
        pub cost_minor: i64,
        pub notes: Option<String>,
        pub position: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DayView {
        pub id: Uuid,
        pub trip_id: Uuid,
        pub day_number: u32,
        pub date: Option<NaiveDate>,
        pub title: Option<String>,
        pub notes: Option<String>,
        pub items: Vec<ItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItineraryView {
        pub trip_id: Uuid,
        pub days: Vec<DayView>,
    }
}

pub mod city {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CityQuery {
        pub q: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CityView {
        pub id: Uuid,
        pub name: String,
        pub country: String,
        pub description: Option<String>,
        pub avg_daily_cost_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CityListResponse {
        pub cities: Vec<CityView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ActivityView {
        pub id: Uuid,
        pub city_id: Uuid,
        pub name: String,
        pub category: String,
        pub price_minor: i64,
        /// Tenths of a star, `0..=50`.
        pub rating_tenths: u8,
        pub duration_minutes: Option<u32>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CityDetail {
        pub city: CityView,
        pub activities: Vec<ActivityView>,
    }
}

pub mod recommendation {
    use super::*;
    use crate::city::ActivityView;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecommendationRequest {
        #[serde(default)]
        pub interests: Vec<String>,
        /// Defaults to 10, capped at 50.
        pub limit: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecommendationView {
        pub activity: ActivityView,
        pub score: i64,
        pub matches_interest: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecommendationResponse {
        pub trip_id: Uuid,
        pub recommendations: Vec<RecommendationView>,
    }
}

pub mod split {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantNew {
        pub name: String,
        /// Required for `exact` splits.
        pub amount_minor: Option<i64>,
        /// Required for `percentage` splits, in basis points (`10000` = 100%).
        pub percent_bp: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        pub description: String,
        pub total_minor: i64,
        pub paid_by: String,
        /// `equal`, `exact` or `percentage`.
        pub split_type: String,
        pub participants: Vec<ParticipantNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitShareView {
        pub id: Uuid,
        pub split_id: Uuid,
        pub participant: String,
        pub amount_minor: i64,
        pub settled: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub id: Uuid,
        pub trip_id: Uuid,
        pub description: String,
        pub total_minor: i64,
        pub paid_by: String,
        pub split_type: String,
        pub created_at: DateTime<Utc>,
        pub shares: Vec<SplitShareView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitListResponse {
        pub splits: Vec<SplitView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShareSettle {
        pub settled: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub participant: String,
        pub paid_minor: i64,
        pub owed_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitBalancesResponse {
        pub trip_id: Uuid,
        pub balances: Vec<BalanceView>,
    }
}

pub mod share {
    use super::*;

    /// Request body for granting or changing a user's access to a trip.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripShareUpsert {
        pub username: String,
        /// `viewer` or `editor`.
        pub role: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripShareView {
        pub username: String,
        pub role: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripSharesResponse {
        pub shares: Vec<TripShareView>,
    }
}
