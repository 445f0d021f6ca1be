//! Budget categories: named buckets under a trip with a planned allocation
//! and a running `spent` total.
//!
//! `spent_minor` is a materialized cache of the signed transaction amounts,
//! kept in sync by the ledger operations.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub name: String,
    pub allocated: Money,
    pub spent: Money,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl BudgetCategory {
    /// `allocated - spent`; negative when the category is over budget.
    pub fn remaining(&self) -> Money {
        self.allocated - self.spent
    }

    pub fn is_balanced(&self) -> bool {
        self.allocated == self.spent
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub name: String,
    pub allocated_minor: i64,
    pub spent_minor: i64,
    pub color: Option<String>,
    pub icon: Option<String>,
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
    #[sea_orm(has_many = "super::budget_transactions::Entity")]
    Transactions,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::budget_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BudgetCategory {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "budget category")?,
            trip_id: parse_uuid(&model.trip_id, "trip")?,
            name: model.name,
            allocated: Money::new(model.allocated_minor),
            spent: Money::new(model.spent_minor),
            color: model.color,
            icon: model.icon,
        })
    }
}
