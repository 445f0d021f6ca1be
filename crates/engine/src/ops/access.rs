use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, ShareRole, budget_categories, budget_transactions,
    expense_splits, itinerary_days, itinerary_items, split_shares, trip_shares, trips, users,
};

use super::Engine;

/// How the caller reaches a trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripAccess {
    Owner,
    Shared(ShareRole),
}

impl TripAccess {
    pub fn can_write(self) -> bool {
        match self {
            Self::Owner => true,
            Self::Shared(role) => role.can_write(),
        }
    }
}

fn trip_not_found() -> EngineError {
    EngineError::KeyNotFound("trip not exists".to_string())
}

/// Generates a `require_*` method that loads a trip child row, checks the
/// caller may write the parent trip and returns the row.
macro_rules! impl_require_trip_child_write {
    ($require_fn:ident, $entity:path, $model:ty, $trip_col:ident, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<$model> {
            let model = <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))?;
            let trip_id = crate::util::parse_uuid(&model.$trip_col, "trip")?;
            self.require_trip_write(db, trip_id, user_id)
                .await
                .map_err(|err| match err {
                    EngineError::KeyNotFound(_) => EngineError::KeyNotFound($err_msg.to_string()),
                    other => other,
                })?;
            Ok(model)
        }
    };
}

impl Engine {
    async fn find_trip(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<Option<trips::Model>> {
        trips::Entity::find_by_id(trip_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn share_role(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Option<ShareRole>> {
        let row = trip_shares::Entity::find_by_id((trip_id.to_string(), user_id.to_string()))
            .one(db)
            .await?;
        row.as_ref()
            .map(|share| ShareRole::try_from(share.role.as_str()))
            .transpose()
    }

    /// Trip lookup restricted to its owner. Every ledger operation goes
    /// through here.
    pub(super) async fn require_trip_owner(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<trips::Model> {
        let model = self
            .find_trip(db, trip_id)
            .await?
            .ok_or_else(trip_not_found)?;
        if model.user_id != user_id {
            return Err(trip_not_found());
        }
        Ok(model)
    }

    pub(super) async fn require_trip_read(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(trips::Model, TripAccess)> {
        let model = self
            .find_trip(db, trip_id)
            .await?
            .ok_or_else(trip_not_found)?;
        if model.user_id == user_id {
            return Ok((model, TripAccess::Owner));
        }
        let role = self
            .share_role(db, trip_id, user_id)
            .await?
            .ok_or_else(trip_not_found)?;
        Ok((model, TripAccess::Shared(role)))
    }

    /// Owner or `editor` share. A `viewer` gets the same `KeyNotFound` as a
    /// stranger.
    pub(super) async fn require_trip_write(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<trips::Model> {
        let (model, access) = self.require_trip_read(db, trip_id, user_id).await?;
        if !access.can_write() {
            return Err(trip_not_found());
        }
        Ok(model)
    }

    /// Loads a budget category whose trip is owned by `user_id`.
    pub(super) async fn require_category_owner(
        &self,
        db: &DatabaseTransaction,
        category_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<budget_categories::Model> {
        let not_found = || EngineError::KeyNotFound("budget category not exists".to_string());
        let (category, trip) = budget_categories::Entity::find_by_id(category_id.to_string())
            .find_also_related(trips::Entity)
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        match trip {
            Some(trip) if trip.user_id == user_id => Ok(category),
            _ => Err(not_found()),
        }
    }

    /// Loads a budget transaction and its category, both owned by `user_id`.
    pub(super) async fn require_transaction_owner(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(budget_transactions::Model, budget_categories::Model)> {
        let not_found = || EngineError::KeyNotFound("budget transaction not exists".to_string());
        let transaction = budget_transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        let category_id = crate::util::parse_uuid(&transaction.category_id, "budget category")?;
        let category = self
            .require_category_owner(db, category_id, user_id)
            .await
            .map_err(|err| match err {
                EngineError::KeyNotFound(_) => not_found(),
                other => other,
            })?;
        Ok((transaction, category))
    }

    impl_require_trip_child_write!(
        require_day_write,
        itinerary_days::Entity,
        itinerary_days::Model,
        trip_id,
        "itinerary day not exists"
    );

    impl_require_trip_child_write!(
        require_split_write,
        expense_splits::Entity,
        expense_splits::Model,
        trip_id,
        "expense split not exists"
    );

    /// Loads an itinerary item whose trip the caller may write.
    pub(super) async fn require_item_write(
        &self,
        db: &DatabaseTransaction,
        item_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<itinerary_items::Model> {
        let not_found = || EngineError::KeyNotFound("itinerary item not exists".to_string());
        let item = itinerary_items::Entity::find_by_id(item_id.to_string())
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        let day_id = crate::util::parse_uuid(&item.day_id, "itinerary day")?;
        self.require_day_write(db, day_id, user_id)
            .await
            .map_err(|err| match err {
                EngineError::KeyNotFound(_) => not_found(),
                other => other,
            })?;
        Ok(item)
    }

    /// Loads a split share whose trip the caller may write.
    pub(super) async fn require_split_share_write(
        &self,
        db: &DatabaseTransaction,
        share_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<split_shares::Model> {
        let not_found = || EngineError::KeyNotFound("split share not exists".to_string());
        let share = split_shares::Entity::find_by_id(share_id.to_string())
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        let split_id = crate::util::parse_uuid(&share.split_id, "expense split")?;
        self.require_split_write(db, split_id, user_id)
            .await
            .map_err(|err| match err {
                EngineError::KeyNotFound(_) => not_found(),
                other => other,
            })?;
        Ok(share)
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    /// Ids of all itinerary days of a trip.
    pub(super) async fn trip_day_ids(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<Vec<String>> {
        Ok(itinerary_days::Entity::find()
            .filter(itinerary_days::Column::TripId.eq(trip_id.to_string()))
            .all(db)
            .await?
            .into_iter()
            .map(|day| day.id)
            .collect())
    }
}
