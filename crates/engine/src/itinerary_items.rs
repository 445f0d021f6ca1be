//! Items scheduled on an itinerary day. An item may point at a catalog
//! activity; recommendations skip activities already referenced this way.

use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItineraryItem {
    pub id: Uuid,
    pub day_id: Uuid,
    pub title: String,
    pub start_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub activity_id: Option<Uuid>,
    pub cost: Money,
    pub notes: Option<String>,
    pub position: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "itinerary_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub title: String,
    pub start_time: Option<Time>,
    pub location: Option<String>,
    pub activity_id: Option<String>,
    pub cost_minor: i64,
    pub notes: Option<String>,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::itinerary_days::Entity",
        from = "Column::DayId",
        to = "super::itinerary_days::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Days,
}

impl Related<super::itinerary_days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Days.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ItineraryItem {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let position = u32::try_from(model.position)
            .map_err(|_| EngineError::InvalidAmount("invalid item position".to_string()))?;
        Ok(Self {
            id: parse_uuid(&model.id, "itinerary item")?,
            day_id: parse_uuid(&model.day_id, "itinerary day")?,
            title: model.title,
            start_time: model.start_time,
            location: model.location,
            activity_id: model
                .activity_id
                .as_deref()
                .map(|id| parse_uuid(id, "activity"))
                .transpose()?,
            cost: Money::new(model.cost_minor),
            notes: model.notes,
            position,
        })
    }
}
