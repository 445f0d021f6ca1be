//! Activity catalog entries, one city each.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

/// Highest rating, in tenths of a star (5.0 stars).
pub const MAX_RATING_TENTHS: u8 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    pub id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    /// Lower-case interest tag (`culture`, `food`, `nature`, ...).
    pub category: String,
    pub price: Money,
    pub rating_tenths: u8,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub city_id: String,
    pub name: String,
    pub category: String,
    pub price_minor: i64,
    pub rating_tenths: i32,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cities::Entity",
        from = "Column::CityId",
        to = "super::cities::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cities,
}

impl Related<super::cities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Activity {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let rating_tenths = u8::try_from(model.rating_tenths)
            .ok()
            .filter(|rating| *rating <= MAX_RATING_TENTHS)
            .ok_or_else(|| EngineError::InvalidAmount("invalid activity rating".to_string()))?;
        let duration_minutes = model
            .duration_minutes
            .map(u32::try_from)
            .transpose()
            .map_err(|_| EngineError::InvalidAmount("invalid activity duration".to_string()))?;
        Ok(Self {
            id: parse_uuid(&model.id, "activity")?,
            city_id: parse_uuid(&model.city_id, "city")?,
            name: model.name,
            category: model.category,
            price: Money::new(model.price_minor),
            rating_tenths,
            duration_minutes,
            description: model.description,
        })
    }
}
