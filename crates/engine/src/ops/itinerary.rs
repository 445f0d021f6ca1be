use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    DayNew, DayPatch, EngineError, ItemNew, ItemPatch, ItineraryDay, ItineraryItem, ResultEngine,
    activities, itinerary_days, itinerary_items, trips,
    util::{normalize_optional_text, normalize_required_text, require_non_negative},
};

use super::{Engine, with_tx};

fn day_number_column(day_number: u32) -> ResultEngine<i32> {
    if day_number == 0 {
        return Err(EngineError::InvalidAmount(
            "day number must be >= 1".to_string(),
        ));
    }
    i32::try_from(day_number).map_err(|_| EngineError::InvalidAmount("day number too large".to_string()))
}

fn position_column(position: u32) -> ResultEngine<i32> {
    i32::try_from(position).map_err(|_| EngineError::InvalidAmount("position too large".to_string()))
}

fn check_day_date(trip: &trips::Model, date: Option<NaiveDate>) -> ResultEngine<()> {
    match date {
        Some(date) if date < trip.start_date || date > trip.end_date => {
            Err(EngineError::InvalidDate(format!(
                "day date {date} is outside the trip ({} - {})",
                trip.start_date, trip.end_date
            )))
        }
        _ => Ok(()),
    }
}

impl Engine {
    async fn ensure_day_number_free(
        &self,
        db_tx: &DatabaseTransaction,
        trip_id: &str,
        day_number: i32,
    ) -> ResultEngine<()> {
        let taken = itinerary_days::Entity::find()
            .filter(itinerary_days::Column::TripId.eq(trip_id.to_string()))
            .filter(itinerary_days::Column::DayNumber.eq(day_number))
            .one(db_tx)
            .await?
            .is_some();
        if taken {
            return Err(EngineError::ExistingKey(format!("day {day_number}")));
        }
        Ok(())
    }

    async fn day_trip(
        &self,
        db_tx: &DatabaseTransaction,
        day: &itinerary_days::Model,
    ) -> ResultEngine<trips::Model> {
        trips::Entity::find_by_id(day.trip_id.clone())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))
    }

    /// Full itinerary of a trip: days by number, items by position then time.
    pub async fn itinerary(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<Vec<ItineraryDay>> {
        with_tx!(self, |db_tx| {
            self.require_trip_read(&db_tx, trip_id, user_id).await?;
            let day_models = itinerary_days::Entity::find()
                .filter(itinerary_days::Column::TripId.eq(trip_id.to_string()))
                .order_by_asc(itinerary_days::Column::DayNumber)
                .all(&db_tx)
                .await?;
            let day_ids: Vec<String> = day_models.iter().map(|day| day.id.clone()).collect();

            let mut items_by_day: HashMap<Uuid, Vec<ItineraryItem>> = HashMap::new();
            for model in itinerary_items::Entity::find()
                .filter(itinerary_items::Column::DayId.is_in(day_ids))
                .order_by_asc(itinerary_items::Column::Position)
                .order_by_asc(itinerary_items::Column::StartTime)
                .all(&db_tx)
                .await?
            {
                let item = ItineraryItem::try_from(model)?;
                items_by_day.entry(item.day_id).or_default().push(item);
            }

            day_models
                .into_iter()
                .map(|model| {
                    let mut day = ItineraryDay::try_from(model)?;
                    day.items = items_by_day.remove(&day.id).unwrap_or_default();
                    Ok(day)
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn add_day(
        &self,
        trip_id: Uuid,
        cmd: DayNew,
        user_id: &str,
    ) -> ResultEngine<ItineraryDay> {
        let day_number = day_number_column(cmd.day_number)?;

        with_tx!(self, |db_tx| {
            let trip = self.require_trip_write(&db_tx, trip_id, user_id).await?;
            check_day_date(&trip, cmd.date)?;
            self.ensure_day_number_free(&db_tx, &trip.id, day_number)
                .await?;

            let model = itinerary_days::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                trip_id: ActiveValue::Set(trip.id),
                day_number: ActiveValue::Set(day_number),
                date: ActiveValue::Set(cmd.date),
                title: ActiveValue::Set(normalize_optional_text(cmd.title.as_deref())),
                notes: ActiveValue::Set(normalize_optional_text(cmd.notes.as_deref())),
            }
            .insert(&db_tx)
            .await?;
            ItineraryDay::try_from(model)
        })
    }

    pub async fn update_day(
        &self,
        day_id: Uuid,
        patch: DayPatch,
        user_id: &str,
    ) -> ResultEngine<ItineraryDay> {
        if patch.is_empty() {
            return Err(EngineError::EmptyPatch);
        }
        let day_number = patch.day_number.map(day_number_column).transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_day_write(&db_tx, day_id, user_id).await?;
            let trip = self.day_trip(&db_tx, &model).await?;
            check_day_date(&trip, patch.date)?;
            if let Some(day_number) = day_number
                && day_number != model.day_number
            {
                self.ensure_day_number_free(&db_tx, &trip.id, day_number)
                    .await?;
            }

            let mut active: itinerary_days::ActiveModel = model.into();
            if let Some(day_number) = day_number {
                active.day_number = ActiveValue::Set(day_number);
            }
            if let Some(date) = patch.date {
                active.date = ActiveValue::Set(Some(date));
            }
            if let Some(title) = patch.title.as_deref() {
                active.title = ActiveValue::Set(normalize_optional_text(Some(title)));
            }
            if let Some(notes) = patch.notes.as_deref() {
                active.notes = ActiveValue::Set(normalize_optional_text(Some(notes)));
            }
            let model = active.update(&db_tx).await?;
            ItineraryDay::try_from(model)
        })
    }

    /// Deletes a day and its items.
    pub async fn delete_day(&self, day_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_day_write(&db_tx, day_id, user_id).await?;
            itinerary_items::Entity::delete_many()
                .filter(itinerary_items::Column::DayId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            itinerary_days::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Appends an item at the end of a day.
    pub async fn add_item(
        &self,
        day_id: Uuid,
        cmd: ItemNew,
        user_id: &str,
    ) -> ResultEngine<ItineraryItem> {
        let title = normalize_required_text(&cmd.title, "item title")?;
        require_non_negative(cmd.cost, "cost")?;

        with_tx!(self, |db_tx| {
            let day = self.require_day_write(&db_tx, day_id, user_id).await?;
            if let Some(activity_id) = cmd.activity_id {
                activities::Entity::find_by_id(activity_id.to_string())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("activity not exists".to_string()))?;
            }

            let last = itinerary_items::Entity::find()
                .filter(itinerary_items::Column::DayId.eq(day.id.clone()))
                .order_by_desc(itinerary_items::Column::Position)
                .one(&db_tx)
                .await?;
            let position = last.map_or(0, |item| item.position + 1);

            let model = itinerary_items::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                day_id: ActiveValue::Set(day.id),
                title: ActiveValue::Set(title),
                start_time: ActiveValue::Set(cmd.start_time),
                location: ActiveValue::Set(normalize_optional_text(cmd.location.as_deref())),
                activity_id: ActiveValue::Set(cmd.activity_id.map(|id| id.to_string())),
                cost_minor: ActiveValue::Set(cmd.cost.minor()),
                notes: ActiveValue::Set(normalize_optional_text(cmd.notes.as_deref())),
                position: ActiveValue::Set(position),
            }
            .insert(&db_tx)
            .await?;
            ItineraryItem::try_from(model)
        })
    }

    pub async fn update_item(
        &self,
        item_id: Uuid,
        patch: ItemPatch,
        user_id: &str,
    ) -> ResultEngine<ItineraryItem> {
        if patch.is_empty() {
            return Err(EngineError::EmptyPatch);
        }
        let title = patch
            .title
            .as_deref()
            .map(|title| normalize_required_text(title, "item title"))
            .transpose()?;
        if let Some(cost) = patch.cost {
            require_non_negative(cost, "cost")?;
        }
        let position = patch.position.map(position_column).transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_item_write(&db_tx, item_id, user_id).await?;
            let mut active: itinerary_items::ActiveModel = model.into();
            if let Some(title) = title {
                active.title = ActiveValue::Set(title);
            }
            if let Some(start_time) = patch.start_time {
                active.start_time = ActiveValue::Set(Some(start_time));
            }
            if let Some(location) = patch.location.as_deref() {
                active.location = ActiveValue::Set(normalize_optional_text(Some(location)));
            }
            if let Some(cost) = patch.cost {
                active.cost_minor = ActiveValue::Set(cost.minor());
            }
            if let Some(notes) = patch.notes.as_deref() {
                active.notes = ActiveValue::Set(normalize_optional_text(Some(notes)));
            }
            if let Some(position) = position {
                active.position = ActiveValue::Set(position);
            }
            let model = active.update(&db_tx).await?;
            ItineraryItem::try_from(model)
        })
    }

    pub async fn delete_item(&self, item_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_item_write(&db_tx, item_id, user_id).await?;
            itinerary_items::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
