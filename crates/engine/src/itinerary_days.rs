//! Itinerary days of a trip.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, ItineraryItem, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItineraryDay {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub day_number: u32,
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub notes: Option<String>,
    /// Filled by [`Engine::itinerary`](crate::Engine::itinerary), empty otherwise.
    pub items: Vec<ItineraryItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "itinerary_days")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub day_number: i32,
    pub date: Option<Date>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Trips,
    #[sea_orm(has_many = "super::itinerary_items::Entity")]
    Items,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::itinerary_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ItineraryDay {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let day_number = u32::try_from(model.day_number)
            .map_err(|_| EngineError::InvalidAmount("invalid day number".to_string()))?;
        Ok(Self {
            id: parse_uuid(&model.id, "itinerary day")?,
            trip_id: parse_uuid(&model.trip_id, "trip")?,
            day_number,
            date: model.date,
            title: model.title,
            notes: model.notes,
            items: Vec::new(),
        })
    }
}
