use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ExpenseSplit, ParticipantBalance, ResultEngine, SplitNew, SplitShare,
    expense_splits, split, split_shares, util::normalize_required_text,
};

use super::{Engine, with_tx};

impl Engine {
    async fn load_splits(
        &self,
        db_tx: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<Vec<ExpenseSplit>> {
        let split_models = expense_splits::Entity::find()
            .filter(expense_splits::Column::TripId.eq(trip_id.to_string()))
            .order_by_desc(expense_splits::Column::CreatedAt)
            .all(db_tx)
            .await?;
        let split_ids: Vec<String> = split_models.iter().map(|split| split.id.clone()).collect();

        let mut shares_by_split: HashMap<String, Vec<SplitShare>> = HashMap::new();
        for model in split_shares::Entity::find()
            .filter(split_shares::Column::SplitId.is_in(split_ids))
            .order_by_asc(split_shares::Column::Position)
            .all(db_tx)
            .await?
        {
            let split_id = model.split_id.clone();
            shares_by_split
                .entry(split_id)
                .or_default()
                .push(SplitShare::try_from(model)?);
        }

        split_models
            .into_iter()
            .map(|model| {
                let shares = shares_by_split.remove(&model.id).unwrap_or_default();
                ExpenseSplit::try_from((model, shares))
            })
            .collect()
    }

    /// Splits an expense between participants. Owner or editor.
    pub async fn create_split(
        &self,
        trip_id: Uuid,
        cmd: SplitNew,
        user_id: &str,
    ) -> ResultEngine<ExpenseSplit> {
        let description = normalize_required_text(&cmd.description, "description")?;
        let paid_by = normalize_required_text(&cmd.paid_by, "paid_by")?;
        let amounts = split::compute_shares(cmd.total, cmd.split_type, &cmd.participants)?;

        with_tx!(self, |db_tx| {
            self.require_trip_write(&db_tx, trip_id, user_id).await?;

            let split_model = expense_splits::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                trip_id: ActiveValue::Set(trip_id.to_string()),
                description: ActiveValue::Set(description),
                total_minor: ActiveValue::Set(cmd.total.minor()),
                paid_by: ActiveValue::Set(paid_by),
                split_type: ActiveValue::Set(cmd.split_type.as_str().to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            let mut shares = Vec::with_capacity(amounts.len());
            for (position, (participant, amount)) in amounts.into_iter().enumerate() {
                let position = i32::try_from(position).map_err(|_| {
                    EngineError::InvalidSplit("too many participants".to_string())
                })?;
                let model = split_shares::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4().to_string()),
                    split_id: ActiveValue::Set(split_model.id.clone()),
                    participant: ActiveValue::Set(participant),
                    amount_minor: ActiveValue::Set(amount.minor()),
                    settled: ActiveValue::Set(false),
                    position: ActiveValue::Set(position),
                }
                .insert(&db_tx)
                .await?;
                shares.push(SplitShare::try_from(model)?);
            }

            tracing::debug!(split_id = %split_model.id, shares = shares.len(), "expense split created");
            ExpenseSplit::try_from((split_model, shares))
        })
    }

    /// Lists a trip's splits, newest first, with their shares.
    pub async fn list_splits(
        &self,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<ExpenseSplit>> {
        with_tx!(self, |db_tx| {
            self.require_trip_read(&db_tx, trip_id, user_id).await?;
            self.load_splits(&db_tx, trip_id).await
        })
    }

    /// Marks a share settled or unsettled.
    pub async fn settle_share(
        &self,
        share_id: Uuid,
        settled: bool,
        user_id: &str,
    ) -> ResultEngine<SplitShare> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_split_share_write(&db_tx, share_id, user_id)
                .await?;
            let mut active: split_shares::ActiveModel = model.into();
            active.settled = ActiveValue::Set(settled);
            let model = active.update(&db_tx).await?;
            SplitShare::try_from(model)
        })
    }

    /// Deletes a split and its shares.
    pub async fn delete_split(&self, split_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_split_write(&db_tx, split_id, user_id).await?;
            split_shares::Entity::delete_many()
                .filter(split_shares::Column::SplitId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            expense_splits::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Per-participant balances over unsettled shares.
    pub async fn split_balances(
        &self,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<ParticipantBalance>> {
        with_tx!(self, |db_tx| {
            self.require_trip_read(&db_tx, trip_id, user_id).await?;
            let splits = self.load_splits(&db_tx, trip_id).await?;
            split::balances(&splits)
        })
    }
}
