//! A `Trip` is the root of the ownership tree: budget categories, itinerary
//! days, expense splits and shares all hang off it and are checked through
//! its `user_id`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Planned,
    Upcoming,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Upcoming => "upcoming",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for TripStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "planned" => Ok(Self::Planned),
            "upcoming" => Ok(Self::Upcoming),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidStatus(format!(
                "invalid trip status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub id: Uuid,
    pub user_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u32,
    pub budget: Money,
    pub status: TripStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Number of calendar days covered by the trip, both ends included.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Date,
    pub travelers: i32,
    pub budget_minor: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::budget_categories::Entity")]
    BudgetCategories,
}

impl Related<super::budget_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Trip {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let travelers = u32::try_from(model.travelers)
            .map_err(|_| EngineError::InvalidAmount("invalid travelers count".to_string()))?;
        Ok(Self {
            id: parse_uuid(&model.id, "trip")?,
            user_id: model.user_id,
            destination: model.destination,
            start_date: model.start_date,
            end_date: model.end_date,
            travelers,
            budget: Money::new(model.budget_minor),
            status: TripStatus::try_from(model.status.as_str())?,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}
