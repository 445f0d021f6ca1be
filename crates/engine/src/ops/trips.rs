use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Trip, TripNew, TripPatch, budget_categories, budget_transactions,
    expense_splits, itinerary_days, itinerary_items, split_shares, trip_shares, trips,
    util::{normalize_optional_text, normalize_required_text, require_non_negative, validate_date_range},
};

use super::{Engine, with_tx};

fn validate_travelers(travelers: u32) -> ResultEngine<i32> {
    if travelers == 0 {
        return Err(EngineError::InvalidAmount(
            "travelers must be >= 1".to_string(),
        ));
    }
    i32::try_from(travelers)
        .map_err(|_| EngineError::InvalidAmount("too many travelers".to_string()))
}

impl Engine {
    /// Creates a trip owned by `user_id`.
    pub async fn create_trip(&self, user_id: &str, cmd: TripNew) -> ResultEngine<Trip> {
        let destination = normalize_required_text(&cmd.destination, "destination")?;
        validate_date_range(cmd.start_date, cmd.end_date)?;
        let travelers = validate_travelers(cmd.travelers)?;
        require_non_negative(cmd.budget, "budget")?;

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let model = trips::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                destination: ActiveValue::Set(destination),
                start_date: ActiveValue::Set(cmd.start_date),
                end_date: ActiveValue::Set(cmd.end_date),
                travelers: ActiveValue::Set(travelers),
                budget_minor: ActiveValue::Set(cmd.budget.minor()),
                status: ActiveValue::Set(cmd.status.as_str().to_string()),
                notes: ActiveValue::Set(normalize_optional_text(cmd.notes.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(trip_id = %model.id, "trip created");
            Trip::try_from(model)
        })
    }

    /// Returns a trip visible to `user_id` (owned or shared).
    pub async fn trip(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<Trip> {
        with_tx!(self, |db_tx| {
            let (model, _) = self.require_trip_read(&db_tx, trip_id, user_id).await?;
            Trip::try_from(model)
        })
    }

    /// Lists owned and shared trips, ordered by start date.
    pub async fn list_trips(&self, user_id: &str) -> ResultEngine<Vec<Trip>> {
        with_tx!(self, |db_tx| {
            let shared_ids: Vec<String> = trip_shares::Entity::find()
                .filter(trip_shares::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|share| share.trip_id)
                .collect();

            let models = trips::Entity::find()
                .filter(
                    trips::Column::UserId
                        .eq(user_id.to_string())
                        .or(trips::Column::Id.is_in(shared_ids)),
                )
                .order_by_asc(trips::Column::StartDate)
                .order_by_asc(trips::Column::Destination)
                .all(&db_tx)
                .await?;

            models.into_iter().map(Trip::try_from).collect()
        })
    }

    /// Applies a partial update. Owner or editor.
    pub async fn update_trip(
        &self,
        trip_id: Uuid,
        patch: TripPatch,
        user_id: &str,
    ) -> ResultEngine<Trip> {
        if patch.is_empty() {
            return Err(EngineError::EmptyPatch);
        }

        with_tx!(self, |db_tx| {
            let model = self.require_trip_write(&db_tx, trip_id, user_id).await?;
            let start_date = patch.start_date.unwrap_or(model.start_date);
            let end_date = patch.end_date.unwrap_or(model.end_date);
            validate_date_range(start_date, end_date)?;

            let mut active: trips::ActiveModel = model.into();
            if let Some(destination) = patch.destination.as_deref() {
                active.destination =
                    ActiveValue::Set(normalize_required_text(destination, "destination")?);
            }
            if patch.start_date.is_some() {
                active.start_date = ActiveValue::Set(start_date);
            }
            if patch.end_date.is_some() {
                active.end_date = ActiveValue::Set(end_date);
            }
            if let Some(travelers) = patch.travelers {
                active.travelers = ActiveValue::Set(validate_travelers(travelers)?);
            }
            if let Some(budget) = patch.budget {
                require_non_negative(budget, "budget")?;
                active.budget_minor = ActiveValue::Set(budget.minor());
            }
            if let Some(status) = patch.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(notes) = patch.notes.as_deref() {
                active.notes = ActiveValue::Set(normalize_optional_text(Some(notes)));
            }

            let model = active.update(&db_tx).await?;
            Trip::try_from(model)
        })
    }

    /// Deletes a trip and everything it owns. Owner only.
    pub async fn delete_trip(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_trip_owner(&db_tx, trip_id, user_id).await?;
            let trip_key = trip_id.to_string();

            let category_ids: Vec<String> = budget_categories::Entity::find()
                .filter(budget_categories::Column::TripId.eq(trip_key.clone()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|category| category.id)
                .collect();
            budget_transactions::Entity::delete_many()
                .filter(budget_transactions::Column::CategoryId.is_in(category_ids))
                .exec(&db_tx)
                .await?;
            budget_categories::Entity::delete_many()
                .filter(budget_categories::Column::TripId.eq(trip_key.clone()))
                .exec(&db_tx)
                .await?;

            let day_ids = self.trip_day_ids(&db_tx, trip_id).await?;
            itinerary_items::Entity::delete_many()
                .filter(itinerary_items::Column::DayId.is_in(day_ids))
                .exec(&db_tx)
                .await?;
            itinerary_days::Entity::delete_many()
                .filter(itinerary_days::Column::TripId.eq(trip_key.clone()))
                .exec(&db_tx)
                .await?;

            let split_ids: Vec<String> = expense_splits::Entity::find()
                .filter(expense_splits::Column::TripId.eq(trip_key.clone()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|split| split.id)
                .collect();
            split_shares::Entity::delete_many()
                .filter(split_shares::Column::SplitId.is_in(split_ids))
                .exec(&db_tx)
                .await?;
            expense_splits::Entity::delete_many()
                .filter(expense_splits::Column::TripId.eq(trip_key.clone()))
                .exec(&db_tx)
                .await?;

            trip_shares::Entity::delete_many()
                .filter(trip_shares::Column::TripId.eq(trip_key.clone()))
                .exec(&db_tx)
                .await?;
            trips::Entity::delete_by_id(trip_key).exec(&db_tx).await?;

            tracing::debug!(%trip_id, "trip deleted");
            Ok(())
        })
    }
}
