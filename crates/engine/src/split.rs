//! Expense split arithmetic.
//!
//! Cents that cannot be divided evenly are handed out one at a time to the
//! first participants, in input order, so the shares always add up to the
//! split total exactly.

use std::collections::{BTreeMap, HashSet};

use crate::{EngineError, ExpenseSplit, Money, ResultEngine, SplitType};

/// Basis points making up 100%.
pub const FULL_PERCENT_BP: u32 = 10_000;

/// A participant as given by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantInput {
    pub name: String,
    /// Required for [`SplitType::Exact`].
    pub amount: Option<Money>,
    /// Required for [`SplitType::Percentage`], in basis points.
    pub percent_bp: Option<u32>,
}

impl ParticipantInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: None,
            percent_bp: None,
        }
    }

    #[must_use]
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn percent_bp(mut self, percent_bp: u32) -> Self {
        self.percent_bp = Some(percent_bp);
        self
    }
}

/// Computes each participant's share of `total`.
///
/// Returns `(participant, amount)` pairs in input order, with trimmed names.
pub fn compute_shares(
    total: Money,
    split_type: SplitType,
    participants: &[ParticipantInput],
) -> ResultEngine<Vec<(String, Money)>> {
    if total.minor() <= 0 {
        return Err(EngineError::InvalidAmount(
            "split total must be > 0".to_string(),
        ));
    }
    if participants.is_empty() {
        return Err(EngineError::InvalidSplit(
            "at least one participant is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(participants.len());
    for participant in participants {
        let name = participant.name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidName(
                "participant name must not be empty".to_string(),
            ));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(EngineError::InvalidSplit(format!(
                "duplicate participant: {name}"
            )));
        }
        names.push(name.to_string());
    }

    let amounts = match split_type {
        SplitType::Equal => equal_shares(total, participants.len()),
        SplitType::Exact => exact_shares(total, participants)?,
        SplitType::Percentage => percentage_shares(total, participants)?,
    };

    Ok(names.into_iter().zip(amounts).collect())
}

fn equal_shares(total: Money, count: usize) -> Vec<Money> {
    let count = count as i64;
    let base = total.minor() / count;
    let remainder = total.minor() % count;
    (0..count)
        .map(|idx| Money::new(base + i64::from(idx < remainder)))
        .collect()
}

fn exact_shares(total: Money, participants: &[ParticipantInput]) -> ResultEngine<Vec<Money>> {
    let mut amounts = Vec::with_capacity(participants.len());
    for participant in participants {
        let amount = participant.amount.ok_or_else(|| {
            EngineError::InvalidSplit(format!(
                "exact split requires an amount for {}",
                participant.name.trim()
            ))
        })?;
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "share amount must be >= 0".to_string(),
            ));
        }
        amounts.push(amount);
    }
    if Money::try_sum(amounts.iter().copied())? != total {
        return Err(EngineError::InvalidSplit(format!(
            "exact shares must add up to {total}"
        )));
    }
    Ok(amounts)
}

fn percentage_shares(total: Money, participants: &[ParticipantInput]) -> ResultEngine<Vec<Money>> {
    let mut points = Vec::with_capacity(participants.len());
    for participant in participants {
        let bp = participant.percent_bp.ok_or_else(|| {
            EngineError::InvalidSplit(format!(
                "percentage split requires a percentage for {}",
                participant.name.trim()
            ))
        })?;
        if bp > FULL_PERCENT_BP {
            return Err(EngineError::InvalidSplit(
                "percentage must be between 0 and 100".to_string(),
            ));
        }
        points.push(bp);
    }
    if points.iter().sum::<u32>() != FULL_PERCENT_BP {
        return Err(EngineError::InvalidSplit(
            "percentages must add up to 100".to_string(),
        ));
    }

    let total_minor = i128::from(total.minor());
    let mut amounts: Vec<i64> = points
        .iter()
        .map(|bp| {
            // Bounded by `total`, so the narrowing cannot fail.
            (total_minor * i128::from(*bp) / i128::from(FULL_PERCENT_BP)) as i64
        })
        .collect();
    let mut remainder = total.minor() - amounts.iter().sum::<i64>();
    for amount in amounts.iter_mut() {
        if remainder == 0 {
            break;
        }
        *amount += 1;
        remainder -= 1;
    }
    Ok(amounts.into_iter().map(Money::new).collect())
}

/// Net position of one participant across a trip's splits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantBalance {
    pub participant: String,
    /// Unsettled amounts other participants owe this one.
    pub paid: Money,
    /// Unsettled amounts this participant owes to payers.
    pub owed: Money,
    /// `paid - owed`; positive means the participant should be paid back.
    pub net: Money,
}

/// Aggregates unsettled shares into per-participant balances, ordered by name.
///
/// A payer's own share is neither paid nor owed. Totals that leave the `i64`
/// range are reported as `InvalidAmount`.
pub fn balances(splits: &[ExpenseSplit]) -> ResultEngine<Vec<ParticipantBalance>> {
    let too_large = || EngineError::InvalidAmount("amount too large".to_string());

    let mut totals: BTreeMap<String, (Money, Money)> = BTreeMap::new();
    for split in splits {
        for share in split.shares.iter().filter(|share| !share.settled) {
            if share.participant.eq_ignore_ascii_case(&split.paid_by) {
                continue;
            }
            let paid = &mut totals.entry(split.paid_by.clone()).or_default().0;
            *paid = paid.checked_add(share.amount).ok_or_else(too_large)?;
            let owed = &mut totals.entry(share.participant.clone()).or_default().1;
            *owed = owed.checked_add(share.amount).ok_or_else(too_large)?;
        }
    }
    totals
        .into_iter()
        .map(|(participant, (paid, owed))| {
            Ok(ParticipantBalance {
                net: paid.checked_sub(owed).ok_or_else(too_large)?,
                participant,
                paid,
                owed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::SplitShare;

    fn names(list: &[&str]) -> Vec<ParticipantInput> {
        list.iter().map(|name| ParticipantInput::named(*name)).collect()
    }

    #[test]
    fn equal_split_hands_out_remainder_first() {
        let shares =
            compute_shares(Money::new(100_00), SplitType::Equal, &names(&["a", "b", "c"]))
                .unwrap();
        let amounts: Vec<i64> = shares.iter().map(|(_, m)| m.minor()).collect();
        assert_eq!(amounts, vec![3334, 3333, 3333]);
    }

    #[test]
    fn exact_split_must_match_total() {
        let participants = vec![
            ParticipantInput::named("a").amount(Money::new(700)),
            ParticipantInput::named("b").amount(Money::new(200)),
        ];
        let err = compute_shares(Money::new(1000), SplitType::Exact, &participants).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSplit(_)));

        let participants = vec![
            ParticipantInput::named("a").amount(Money::new(700)),
            ParticipantInput::named("b").amount(Money::new(300)),
        ];
        let shares = compute_shares(Money::new(1000), SplitType::Exact, &participants).unwrap();
        assert_eq!(shares[1], ("b".to_string(), Money::new(300)));
    }

    #[test]
    fn percentage_split_rounds_down_then_distributes() {
        let participants = vec![
            ParticipantInput::named("a").percent_bp(3333),
            ParticipantInput::named("b").percent_bp(3333),
            ParticipantInput::named("c").percent_bp(3334),
        ];
        let shares = compute_shares(Money::new(1000), SplitType::Percentage, &participants).unwrap();
        let sum: i64 = shares.iter().map(|(_, m)| m.minor()).sum();
        assert_eq!(sum, 1000);
        assert_eq!(shares[0].1, Money::new(334));
    }

    #[test]
    fn percentage_split_must_cover_whole_total() {
        let participants = vec![
            ParticipantInput::named("a").percent_bp(5000),
            ParticipantInput::named("b").percent_bp(4000),
        ];
        assert!(matches!(
            compute_shares(Money::new(1000), SplitType::Percentage, &participants),
            Err(EngineError::InvalidSplit(_))
        ));
    }

    #[test]
    fn rejects_duplicates_and_empty_lists() {
        assert!(matches!(
            compute_shares(Money::new(1000), SplitType::Equal, &names(&["Ann", " ann "])),
            Err(EngineError::InvalidSplit(_))
        ));
        assert!(matches!(
            compute_shares(Money::new(1000), SplitType::Equal, &[]),
            Err(EngineError::InvalidSplit(_))
        ));
        assert!(matches!(
            compute_shares(Money::ZERO, SplitType::Equal, &names(&["a"])),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn balances_skip_settled_and_payer_shares() {
        let split_id = Uuid::new_v4();
        let share = |participant: &str, amount: i64, settled: bool| SplitShare {
            id: Uuid::new_v4(),
            split_id,
            participant: participant.to_string(),
            amount: Money::new(amount),
            settled,
        };
        let split = ExpenseSplit {
            id: split_id,
            trip_id: Uuid::new_v4(),
            description: "Dinner".to_string(),
            total: Money::new(9000),
            paid_by: "ann".to_string(),
            split_type: SplitType::Equal,
            created_at: Utc::now(),
            shares: vec![
                share("ann", 3000, false),
                share("bob", 3000, false),
                share("cid", 3000, true),
            ],
        };

        let balances = balances(&[split]).unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].participant, "ann");
        assert_eq!(balances[0].net, Money::new(3000));
        assert_eq!(balances[1].participant, "bob");
        assert_eq!(balances[1].owed, Money::new(3000));
        assert_eq!(balances[1].net, Money::new(-3000));
    }

    #[test]
    fn balances_report_overflow() {
        let huge_split = |paid_by: &str| {
            let split_id = Uuid::new_v4();
            ExpenseSplit {
                id: split_id,
                trip_id: Uuid::new_v4(),
                description: "Yacht".to_string(),
                total: Money::new(i64::MAX),
                paid_by: paid_by.to_string(),
                split_type: SplitType::Exact,
                created_at: Utc::now(),
                shares: vec![SplitShare {
                    id: Uuid::new_v4(),
                    split_id,
                    participant: "bob".to_string(),
                    amount: Money::new(i64::MAX),
                    settled: false,
                }],
            }
        };

        let err = balances(&[huge_split("ann"), huge_split("ann")]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}
