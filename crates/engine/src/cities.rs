//! City catalog. Readable by every authenticated user.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Activity, EngineError, Money, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub description: Option<String>,
    pub avg_daily_cost: Money,
}

/// A city together with its catalog activities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityDetail {
    pub city: City,
    pub activities: Vec<Activity>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub country: String,
    pub description: Option<String>,
    pub avg_daily_cost_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activities::Entity")]
    Activities,
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for City {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "city")?,
            name: model.name,
            country: model.country,
            description: model.description,
            avg_daily_cost: Money::new(model.avg_daily_cost_minor),
        })
    }
}
