//! Shared expenses split between trip participants.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, SplitShare, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    Equal,
    Exact,
    Percentage,
}

impl SplitType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percentage => "percentage",
        }
    }
}

impl TryFrom<&str> for SplitType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percentage" => Ok(Self::Percentage),
            other => Err(EngineError::InvalidSplit(format!(
                "invalid split type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseSplit {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub description: String,
    pub total: Money,
    pub paid_by: String,
    pub split_type: SplitType,
    pub created_at: DateTime<Utc>,
    pub shares: Vec<SplitShare>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub description: String,
    pub total_minor: i64,
    pub paid_by: String,
    pub split_type: String,
    pub created_at: DateTimeUtc,
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
    #[sea_orm(has_many = "super::split_shares::Entity")]
    Shares,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::split_shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(Model, Vec<SplitShare>)> for ExpenseSplit {
    type Error = EngineError;

    fn try_from((model, shares): (Model, Vec<SplitShare>)) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense split")?,
            trip_id: parse_uuid(&model.trip_id, "trip")?,
            description: model.description,
            total: Money::new(model.total_minor),
            paid_by: model.paid_by,
            split_type: SplitType::try_from(model.split_type.as_str())?,
            created_at: model.created_at,
            shares,
        })
    }
}
