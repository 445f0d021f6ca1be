//! Budget ledger arithmetic.
//!
//! A budget category carries a denormalized `spent` total. Every transaction
//! recorded against the category contributes a *signed amount* to it:
//!
//! - `expense` adds its amount,
//! - `income` subtracts its amount.
//!
//! The database keeps the total incrementally (see `ops::budget`), this module
//! holds the arithmetic both paths share: the delta applied on insert, its
//! inverse applied on delete, the from-scratch replay used by reconciliation
//! and the trip-level summary totals.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BudgetCategory, EngineError, Money, ResultEngine};

/// Direction of a budget transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(EngineError::InvalidKind(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

/// Returns the delta a transaction applies to its category `spent` total.
///
/// `amount` is the stored, non-negative transaction amount.
pub fn signed_amount(kind: TransactionKind, amount: Money) -> ResultEngine<Money> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(
            "amount must be >= 0".to_string(),
        ));
    }
    Ok(match kind {
        TransactionKind::Expense => amount,
        TransactionKind::Income => -amount,
    })
}

/// Applies a transaction to a running `spent` total.
pub fn apply(spent: Money, kind: TransactionKind, amount: Money) -> ResultEngine<Money> {
    spent
        .checked_add(signed_amount(kind, amount)?)
        .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
}

/// Reverses [`apply`]: `revert(apply(s, k, a), k, a) == s`.
pub fn revert(spent: Money, kind: TransactionKind, amount: Money) -> ResultEngine<Money> {
    spent
        .checked_sub(signed_amount(kind, amount)?)
        .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
}

/// Recomputes a `spent` total from scratch.
pub fn replay_spent<I>(transactions: I) -> ResultEngine<Money>
where
    I: IntoIterator<Item = (TransactionKind, Money)>,
{
    transactions
        .into_iter()
        .try_fold(Money::ZERO, |spent, (kind, amount)| apply(spent, kind, amount))
}

/// Trip-level budget totals, summed over the category rows at read time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetTotals {
    pub total_allocated: Money,
    pub total_spent: Money,
    /// `trip_budget - total_spent`.
    pub remaining: Money,
}

impl BudgetTotals {
    pub fn compute<'a, I>(trip_budget: Money, categories: I) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = &'a BudgetCategory>,
    {
        let (allocated, spent): (Vec<Money>, Vec<Money>) = categories
            .into_iter()
            .map(|category| (category.allocated, category.spent))
            .unzip();
        let total_allocated = Money::try_sum(allocated)?;
        let total_spent = Money::try_sum(spent)?;
        let remaining = trip_budget
            .checked_sub(total_spent)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
        Ok(Self {
            total_allocated,
            total_spent,
            remaining,
        })
    }
}

/// A category whose cached `spent` disagrees with its transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryDrift {
    pub category_id: Uuid,
    pub name: String,
    pub cached: Money,
    pub recomputed: Money,
}

/// Result of a reconciliation pass over a trip's categories.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub checked: usize,
    pub drifted: Vec<CategoryDrift>,
    pub repaired: bool,
}

impl ReconcileReport {
    pub fn is_consistent(&self) -> bool {
        self.drifted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(allocated: i64, spent: i64) -> BudgetCategory {
        BudgetCategory {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            name: "Food".to_string(),
            allocated: Money::new(allocated),
            spent: Money::new(spent),
            color: None,
            icon: None,
        }
    }

    #[test]
    fn signed_amount_follows_kind() {
        assert_eq!(
            signed_amount(TransactionKind::Expense, Money::new(200)).unwrap(),
            Money::new(200)
        );
        assert_eq!(
            signed_amount(TransactionKind::Income, Money::new(50)).unwrap(),
            Money::new(-50)
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = signed_amount(TransactionKind::Expense, Money::new(-1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(matches!(
            TransactionKind::try_from("refund"),
            Err(EngineError::InvalidKind(_))
        ));
        assert_eq!(
            TransactionKind::try_from("income").unwrap(),
            TransactionKind::Income
        );
    }

    #[test]
    fn apply_then_revert_is_identity() {
        let start = Money::new(1234);
        for kind in [TransactionKind::Expense, TransactionKind::Income] {
            for amount in [0, 1, 99, 100_000] {
                let amount = Money::new(amount);
                let applied = apply(start, kind, amount).unwrap();
                assert_eq!(revert(applied, kind, amount).unwrap(), start);
            }
        }
    }

    #[test]
    fn zero_amount_is_noop() {
        let spent = Money::new(500);
        assert_eq!(apply(spent, TransactionKind::Expense, Money::ZERO).unwrap(), spent);
        assert_eq!(apply(spent, TransactionKind::Income, Money::ZERO).unwrap(), spent);
    }

    #[test]
    fn scenario_expense_income_then_delete_expense() {
        let mut spent = Money::ZERO;
        spent = apply(spent, TransactionKind::Expense, Money::new(200_00)).unwrap();
        assert_eq!(spent, Money::new(200_00));
        assert_eq!(Money::new(1000_00) - spent, Money::new(800_00));

        spent = apply(spent, TransactionKind::Income, Money::new(50_00)).unwrap();
        assert_eq!(spent, Money::new(150_00));

        spent = revert(spent, TransactionKind::Expense, Money::new(200_00)).unwrap();
        assert_eq!(spent, Money::new(-50_00));
    }

    #[test]
    fn replay_matches_incremental_application() {
        let history = [
            (TransactionKind::Expense, Money::new(1999)),
            (TransactionKind::Income, Money::new(500)),
            (TransactionKind::Expense, Money::new(1)),
            (TransactionKind::Expense, Money::ZERO),
        ];
        let incremental = history
            .iter()
            .try_fold(Money::ZERO, |s, (k, a)| apply(s, *k, *a))
            .unwrap();
        assert_eq!(replay_spent(history).unwrap(), incremental);
        assert_eq!(incremental, Money::new(1500));
    }

    #[test]
    fn totals_scenario() {
        let categories = [category(1000_00, 300_00), category(1000_00, 300_00)];
        let totals = BudgetTotals::compute(Money::new(5000_00), &categories).unwrap();
        assert_eq!(totals.total_allocated, Money::new(2000_00));
        assert_eq!(totals.total_spent, Money::new(600_00));
        assert_eq!(totals.remaining, Money::new(4400_00));
    }

    #[test]
    fn totals_without_categories() {
        let categories: Vec<BudgetCategory> = Vec::new();
        let totals = BudgetTotals::compute(Money::new(100), &categories).unwrap();
        assert_eq!(totals.total_allocated, Money::ZERO);
        assert_eq!(totals.total_spent, Money::ZERO);
        assert_eq!(totals.remaining, Money::new(100));
    }
}
