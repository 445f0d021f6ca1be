//! Budget transactions: a single expense or income recorded against a budget
//! category. The stored amount is never negative; the direction lives in
//! `kind`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, TransactionKind, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetTransaction {
    pub id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub amount: Money,
    pub kind: TransactionKind,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category_id: String,
    pub description: String,
    pub amount_minor: i64,
    pub kind: String,
    pub transaction_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budget_categories::Entity",
        from = "Column::CategoryId",
        to = "super::budget_categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    BudgetCategories,
}

impl Related<super::budget_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BudgetTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "budget transaction")?,
            category_id: parse_uuid(&model.category_id, "budget category")?,
            description: model.description,
            amount: Money::new(model.amount_minor),
            kind: TransactionKind::try_from(model.kind.as_str())?,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
        })
    }
}
