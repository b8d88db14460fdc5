//! Savings goal projection.
//!
//! Months are approximated as 30 days when measuring the time left before a
//! deadline; projected completion dates use calendar months.

use chrono::{Months, NaiveDate};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{FinanceError, FinanceResult};

const DAYS_PER_MONTH: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    pub monthly_contribution: Decimal,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        target_amount: Decimal,
        current_amount: Decimal,
        deadline: NaiveDate,
        monthly_contribution: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount,
            deadline,
            monthly_contribution,
        }
    }

    pub fn remaining_amount(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    pub fn project(&self, as_of: NaiveDate) -> FinanceResult<GoalProjection> {
        project_goal(self, as_of)
    }
}

/// Monthly saving needed to hit the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum RequiredContribution {
    Amount(Decimal),
    /// The deadline has passed with money still missing.
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum CompletionDate {
    On(NaiveDate),
    /// No contribution is being made and a gap remains.
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProjection {
    pub progress_percent: Decimal,
    pub months_remaining: u32,
    pub required_monthly_contribution: RequiredContribution,
    pub on_track: bool,
    pub projected_completion: CompletionDate,
}

pub fn project_goal(goal: &Goal, as_of: NaiveDate) -> FinanceResult<GoalProjection> {
    for (field, value) in [
        ("target amount", goal.target_amount),
        ("current amount", goal.current_amount),
        ("monthly contribution", goal.monthly_contribution),
    ] {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(FinanceError::invalid(format!(
                "{field} must not be negative (got {value})"
            )));
        }
    }

    let gap = goal.target_amount - goal.current_amount;
    let progress_percent = progress_percent(goal.current_amount, goal.target_amount);
    let months_remaining = months_until(as_of, goal.deadline);

    let required_monthly_contribution = if months_remaining > 0 {
        RequiredContribution::Amount((gap / Decimal::from(months_remaining)).max(Decimal::ZERO))
    } else if gap > Decimal::ZERO {
        RequiredContribution::Unbounded
    } else {
        RequiredContribution::Amount(Decimal::ZERO)
    };

    let on_track = match required_monthly_contribution {
        RequiredContribution::Amount(required) => goal.monthly_contribution >= required,
        RequiredContribution::Unbounded => false,
    };

    let projected_completion = projected_completion(gap, goal.monthly_contribution, as_of);

    debug!(
        goal = %goal.name,
        %progress_percent,
        months_remaining,
        on_track,
        "projected goal"
    );

    Ok(GoalProjection {
        progress_percent,
        months_remaining,
        required_monthly_contribution,
        on_track,
        projected_completion,
    })
}

/// Percentage of `target` already saved, clamped to `0..=100`; zero for a zero target.
pub fn progress_percent(current: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    // A ratio too large for `Decimal` is far past the target.
    current
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(dec!(100))
        .clamp(Decimal::ZERO, dec!(100))
        .round_dp(2)
}

/// Whole 30-day months from `as_of` to `deadline`, rounded up; zero once the deadline passes.
pub fn months_until(as_of: NaiveDate, deadline: NaiveDate) -> u32 {
    let days = (deadline - as_of).num_days();
    if days <= 0 {
        return 0;
    }
    let months = (days + DAYS_PER_MONTH - 1) / DAYS_PER_MONTH;
    u32::try_from(months).unwrap_or(u32::MAX)
}

fn projected_completion(gap: Decimal, contribution: Decimal, as_of: NaiveDate) -> CompletionDate {
    if gap <= Decimal::ZERO {
        return CompletionDate::On(as_of);
    }
    if contribution <= Decimal::ZERO {
        return CompletionDate::Unreachable;
    }
    gap.checked_div(contribution)
        .and_then(|months| months.ceil().to_u32())
        .and_then(|months| as_of.checked_add_months(Months::new(months)))
        .map(CompletionDate::On)
        .unwrap_or(CompletionDate::Unreachable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal(target: Decimal, current: Decimal, deadline: NaiveDate, monthly: Decimal) -> Goal {
        Goal::new("Emergency fund", target, current, deadline, monthly)
    }

    #[test]
    fn progress_is_clamped_to_one_hundred() {
        let as_of = date(2025, 1, 1);
        let projection = goal(dec!(1000), dec!(1500), date(2025, 6, 1), dec!(50))
            .project(as_of)
            .unwrap();
        assert_eq!(projection.progress_percent, dec!(100));
        assert_eq!(
            projection.projected_completion,
            CompletionDate::On(as_of)
        );
        assert_eq!(
            projection.required_monthly_contribution,
            RequiredContribution::Amount(Decimal::ZERO)
        );
        assert!(projection.on_track);
    }

    #[test]
    fn zero_target_reports_zero_progress() {
        let projection = goal(Decimal::ZERO, Decimal::ZERO, date(2025, 6, 1), Decimal::ZERO)
            .project(date(2025, 1, 1))
            .unwrap();
        assert_eq!(projection.progress_percent, Decimal::ZERO);
        assert!(projection.on_track);
    }

    #[test]
    fn months_remaining_rounds_partial_months_up() {
        let as_of = date(2025, 1, 1);
        assert_eq!(months_until(as_of, date(2025, 1, 31)), 1);
        assert_eq!(months_until(as_of, date(2025, 2, 1)), 2);
        assert_eq!(months_until(as_of, as_of), 0);
        assert_eq!(months_until(as_of, date(2024, 12, 1)), 0);
    }

    #[test]
    fn equal_contribution_is_on_track() {
        // 360 days -> 12 months, 1200 missing -> 100 a month.
        let as_of = date(2025, 1, 1);
        let deadline = as_of + chrono::Duration::days(360);
        let projection = goal(dec!(1200), Decimal::ZERO, deadline, dec!(100))
            .project(as_of)
            .unwrap();
        assert_eq!(projection.months_remaining, 12);
        assert_eq!(
            projection.required_monthly_contribution,
            RequiredContribution::Amount(dec!(100))
        );
        assert!(projection.on_track);
        assert_eq!(
            projection.projected_completion,
            CompletionDate::On(date(2026, 1, 1))
        );
    }

    #[test]
    fn short_contribution_is_behind() {
        let as_of = date(2025, 1, 1);
        let deadline = as_of + chrono::Duration::days(360);
        let projection = goal(dec!(1200), dec!(200), deadline, dec!(50))
            .project(as_of)
            .unwrap();
        assert_eq!(projection.progress_percent, dec!(16.67));
        assert!(!projection.on_track);
        // 1000 missing at 50 a month.
        assert_eq!(
            projection.projected_completion,
            CompletionDate::On(date(2026, 9, 1))
        );
    }

    #[test]
    fn past_deadline_with_gap_is_unbounded() {
        let projection = goal(dec!(500), dec!(100), date(2024, 12, 1), dec!(100))
            .project(date(2025, 1, 1))
            .unwrap();
        assert_eq!(projection.months_remaining, 0);
        assert_eq!(
            projection.required_monthly_contribution,
            RequiredContribution::Unbounded
        );
        assert!(!projection.on_track);
    }

    #[test]
    fn no_contribution_is_unreachable() {
        let projection = goal(dec!(500), dec!(100), date(2025, 12, 1), Decimal::ZERO)
            .project(date(2025, 1, 1))
            .unwrap();
        assert_eq!(projection.projected_completion, CompletionDate::Unreachable);
    }

    #[test]
    fn extreme_ratios_saturate_instead_of_overflowing() {
        let as_of = date(2025, 1, 1);
        let tiny = Decimal::new(1, 25);

        let projection = goal(dec!(1000000), Decimal::ZERO, date(2026, 1, 1), tiny)
            .project(as_of)
            .unwrap();
        assert_eq!(projection.projected_completion, CompletionDate::Unreachable);
        assert!(!projection.on_track);

        let projection = goal(tiny, dec!(1000000), date(2026, 1, 1), Decimal::ZERO)
            .project(as_of)
            .unwrap();
        assert_eq!(projection.progress_percent, dec!(100));
        assert_eq!(projection.projected_completion, CompletionDate::On(as_of));
        assert_eq!(progress_percent(dec!(1000000), tiny), dec!(100));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let err = goal(dec!(500), dec!(-1), date(2025, 12, 1), dec!(10))
            .project(date(2025, 1, 1))
            .unwrap_err();
        assert!(matches!(err, FinanceError::InvalidArgument(_)));
    }
}
