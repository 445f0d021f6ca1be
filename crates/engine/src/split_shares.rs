//! One participant's portion of an expense split.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitShare {
    pub id: Uuid,
    pub split_id: Uuid,
    pub participant: String,
    pub amount: Money,
    pub settled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "split_shares")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub split_id: String,
    pub participant: String,
    pub amount_minor: i64,
    pub settled: bool,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_splits::Entity",
        from = "Column::SplitId",
        to = "super::expense_splits::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Splits,
}

impl Related<super::expense_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for SplitShare {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "split share")?,
            split_id: parse_uuid(&model.split_id, "expense split")?,
            participant: model.participant,
            amount: Money::new(model.amount_minor),
            settled: model.settled,
        })
    }
}
