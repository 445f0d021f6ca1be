use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    BudgetCategory, BudgetTotals, BudgetTransaction, CategoryDrift, CategoryNew, CategoryPatch,
    EngineError, Money, ReconcileReport, ResultEngine, TransactionKind, TransactionNew,
    budget_categories, budget_transactions, ledger,
    util::{normalize_optional_text, normalize_required_text, require_non_negative},
};

use super::{Engine, with_tx};

/// Budget overview of a trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetSummary {
    pub trip_budget: Money,
    pub categories: Vec<BudgetCategory>,
    pub total_allocated: Money,
    pub total_spent: Money,
    /// `trip_budget - total_spent`.
    pub remaining: Money,
}

impl Engine {
    /// Adds `delta` to a category's cached `spent` with a single
    /// `SET spent_minor = spent_minor + ?` statement.
    ///
    /// The statement only matches while the result stays within `i64`, so an
    /// overflowing add or revert leaves the row untouched and reports
    /// `InvalidAmount`.
    async fn bump_spent(
        &self,
        db_tx: &DatabaseTransaction,
        category_id: &str,
        delta: Money,
    ) -> ResultEngine<()> {
        if delta.is_zero() {
            return Ok(());
        }
        let in_range = if delta.is_negative() {
            budget_categories::Column::SpentMinor.gte(i64::MIN.saturating_sub(delta.minor()))
        } else {
            budget_categories::Column::SpentMinor.lte(i64::MAX.saturating_sub(delta.minor()))
        };
        let result = budget_categories::Entity::update_many()
            .col_expr(
                budget_categories::Column::SpentMinor,
                Expr::col(budget_categories::Column::SpentMinor).add(delta.minor()),
            )
            .filter(budget_categories::Column::Id.eq(category_id.to_string()))
            .filter(in_range)
            .exec(db_tx)
            .await?;
        if result.rows_affected == 1 {
            return Ok(());
        }

        let exists = budget_categories::Entity::find_by_id(category_id.to_string())
            .one(db_tx)
            .await?
            .is_some();
        if exists {
            tracing::warn!(
                %category_id,
                delta = delta.minor(),
                "spent update rejected: out of range"
            );
            Err(EngineError::InvalidAmount("amount too large".to_string()))
        } else {
            Err(EngineError::KeyNotFound(
                "budget category not exists".to_string(),
            ))
        }
    }

    async fn trip_categories(
        &self,
        db_tx: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<Vec<budget_categories::Model>> {
        Ok(budget_categories::Entity::find()
            .filter(budget_categories::Column::TripId.eq(trip_id.to_string()))
            .order_by_asc(budget_categories::Column::Name)
            .all(db_tx)
            .await?)
    }

    /// Creates a budget category with `spent = 0`.
    pub async fn create_category(
        &self,
        cmd: CategoryNew,
        user_id: &str,
    ) -> ResultEngine<BudgetCategory> {
        let name = normalize_required_text(&cmd.name, "category name")?;
        require_non_negative(cmd.allocated, "allocated")?;

        with_tx!(self, |db_tx| {
            self.require_trip_owner(&db_tx, cmd.trip_id, user_id).await?;
            let model = budget_categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                trip_id: ActiveValue::Set(cmd.trip_id.to_string()),
                name: ActiveValue::Set(name),
                allocated_minor: ActiveValue::Set(cmd.allocated.minor()),
                spent_minor: ActiveValue::Set(0),
                color: ActiveValue::Set(normalize_optional_text(cmd.color.as_deref())),
                icon: ActiveValue::Set(normalize_optional_text(cmd.icon.as_deref())),
            }
            .insert(&db_tx)
            .await?;
            BudgetCategory::try_from(model)
        })
    }

    /// Lists a trip's categories ordered by name.
    pub async fn list_categories(
        &self,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<BudgetCategory>> {
        with_tx!(self, |db_tx| {
            self.require_trip_owner(&db_tx, trip_id, user_id).await?;
            self.trip_categories(&db_tx, trip_id)
                .await?
                .into_iter()
                .map(BudgetCategory::try_from)
                .collect()
        })
    }

    pub async fn update_category(
        &self,
        category_id: Uuid,
        patch: CategoryPatch,
        user_id: &str,
    ) -> ResultEngine<BudgetCategory> {
        if patch.is_empty() {
            return Err(EngineError::EmptyPatch);
        }
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_text(name, "category name"))
            .transpose()?;
        if let Some(allocated) = patch.allocated {
            require_non_negative(allocated, "allocated")?;
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owner(&db_tx, category_id, user_id)
                .await?;
            let previous_spent = Money::new(model.spent_minor);

            let mut active: budget_categories::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(allocated) = patch.allocated {
                active.allocated_minor = ActiveValue::Set(allocated.minor());
            }
            if let Some(spent) = patch.spent {
                active.spent_minor = ActiveValue::Set(spent.minor());
            }
            if let Some(color) = patch.color.as_deref() {
                active.color = ActiveValue::Set(normalize_optional_text(Some(color)));
            }
            if let Some(icon) = patch.icon.as_deref() {
                active.icon = ActiveValue::Set(normalize_optional_text(Some(icon)));
            }

            let model = active.update(&db_tx).await?;
            if let Some(spent) = patch.spent
                && spent != previous_spent
            {
                tracing::info!(
                    %category_id,
                    from = previous_spent.minor(),
                    to = spent.minor(),
                    "manual spent adjustment"
                );
            }
            BudgetCategory::try_from(model)
        })
    }

    /// Deletes a category together with its transactions.
    pub async fn delete_category(&self, category_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owner(&db_tx, category_id, user_id)
                .await?;
            budget_transactions::Entity::delete_many()
                .filter(budget_transactions::Column::CategoryId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            budget_categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Records a transaction and applies its signed amount to the category.
    ///
    /// The insert and the `spent` increment share one database transaction.
    pub async fn add_transaction(
        &self,
        cmd: TransactionNew,
        user_id: &str,
    ) -> ResultEngine<BudgetTransaction> {
        let description = normalize_required_text(&cmd.description, "description")?;
        let delta = ledger::signed_amount(cmd.kind, cmd.amount)?;

        with_tx!(self, |db_tx| {
            let category = self
                .require_category_owner(&db_tx, cmd.category_id, user_id)
                .await?;
            let model = budget_transactions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                category_id: ActiveValue::Set(category.id.clone()),
                description: ActiveValue::Set(description),
                amount_minor: ActiveValue::Set(cmd.amount.minor()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                transaction_date: ActiveValue::Set(cmd.transaction_date),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            self.bump_spent(&db_tx, &category.id, delta).await?;

            tracing::debug!(
                transaction_id = %model.id,
                category_id = %category.id,
                delta = delta.minor(),
                "budget transaction added"
            );
            BudgetTransaction::try_from(model)
        })
    }

    /// Lists a category's transactions, newest first.
    pub async fn list_transactions(
        &self,
        category_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<BudgetTransaction>> {
        with_tx!(self, |db_tx| {
            let category = self
                .require_category_owner(&db_tx, category_id, user_id)
                .await?;
            budget_transactions::Entity::find()
                .filter(budget_transactions::Column::CategoryId.eq(category.id))
                .order_by_desc(budget_transactions::Column::TransactionDate)
                .order_by_desc(budget_transactions::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(BudgetTransaction::try_from)
                .collect()
        })
    }

    /// Deletes a transaction and reverts its signed amount on the category.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (transaction, category) = self
                .require_transaction_owner(&db_tx, transaction_id, user_id)
                .await?;
            let kind = TransactionKind::try_from(transaction.kind.as_str())?;
            let delta = ledger::signed_amount(kind, Money::new(transaction.amount_minor))?;

            budget_transactions::Entity::delete_by_id(transaction.id.clone())
                .exec(&db_tx)
                .await?;
            self.bump_spent(&db_tx, &category.id, -delta).await?;

            tracing::debug!(
                %transaction_id,
                category_id = %category.id,
                delta = -delta.minor(),
                "budget transaction deleted"
            );
            Ok(())
        })
    }

    /// Trip budget with its categories and totals summed at read time.
    pub async fn trip_budget_summary(
        &self,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<BudgetSummary> {
        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owner(&db_tx, trip_id, user_id).await?;
            let categories = self
                .trip_categories(&db_tx, trip_id)
                .await?
                .into_iter()
                .map(BudgetCategory::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let trip_budget = Money::new(trip.budget_minor);
            let totals = BudgetTotals::compute(trip_budget, &categories)?;
            Ok(BudgetSummary {
                trip_budget,
                categories,
                total_allocated: totals.total_allocated,
                total_spent: totals.total_spent,
                remaining: totals.remaining,
            })
        })
    }

    /// Recomputes every category's `spent` from its transactions.
    ///
    /// With `repair` the cached totals are overwritten by the recomputed ones.
    pub async fn reconcile_budget(
        &self,
        trip_id: Uuid,
        repair: bool,
        user_id: &str,
    ) -> ResultEngine<ReconcileReport> {
        with_tx!(self, |db_tx| {
            self.require_trip_owner(&db_tx, trip_id, user_id).await?;
            let categories = self.trip_categories(&db_tx, trip_id).await?;
            let category_ids: Vec<String> =
                categories.iter().map(|category| category.id.clone()).collect();

            let mut history: HashMap<String, Vec<(TransactionKind, Money)>> = HashMap::new();
            for transaction in budget_transactions::Entity::find()
                .filter(budget_transactions::Column::CategoryId.is_in(category_ids))
                .all(&db_tx)
                .await?
            {
                let kind = TransactionKind::try_from(transaction.kind.as_str())?;
                history
                    .entry(transaction.category_id)
                    .or_default()
                    .push((kind, Money::new(transaction.amount_minor)));
            }

            let mut report = ReconcileReport {
                checked: categories.len(),
                drifted: Vec::new(),
                repaired: false,
            };
            for category in categories {
                let recomputed =
                    ledger::replay_spent(history.remove(&category.id).unwrap_or_default())?;
                let cached = Money::new(category.spent_minor);
                if cached == recomputed {
                    continue;
                }
                tracing::warn!(
                    category_id = %category.id,
                    cached = cached.minor(),
                    recomputed = recomputed.minor(),
                    "budget category spent drifted"
                );
                let category_id = crate::util::parse_uuid(&category.id, "budget category")?;
                if repair {
                    let mut active: budget_categories::ActiveModel = category.clone().into();
                    active.spent_minor = ActiveValue::Set(recomputed.minor());
                    active.update(&db_tx).await?;
                }
                report.drifted.push(CategoryDrift {
                    category_id,
                    name: category.name,
                    cached,
                    recomputed,
                });
            }
            report.repaired = repair && !report.drifted.is_empty();
            Ok(report)
        })
    }
}
