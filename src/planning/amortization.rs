//! Month-by-month debt amortization.
//!
//! The engine walks a balance forward one month at a time: interest accrues on
//! the outstanding balance, the rest of the fixed payment reduces principal.
//! A debt whose payment cannot outrun its interest, or that is still open after
//! [`MAX_PAYOFF_MONTHS`], resolves to [`AmortizationResult::Never`].

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::{monthly_rate, round_minor, round_up_minor};
use crate::errors::{FinanceError, FinanceResult};

/// Horizon after which a debt is treated as never paid off (50 years).
pub const MAX_PAYOFF_MONTHS: u32 = 600;

/// Remaining balance at or below this amount counts as paid off.
pub const PAYOFF_EPSILON: Decimal = dec!(0.01);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AmortizationResult {
    PaidOff { months: u32, total_interest: Decimal },
    Never,
}

impl AmortizationResult {
    pub fn months(&self) -> Option<u32> {
        match self {
            AmortizationResult::PaidOff { months, .. } => Some(*months),
            AmortizationResult::Never => None,
        }
    }

    pub fn total_interest(&self) -> Option<Decimal> {
        match self {
            AmortizationResult::PaidOff { total_interest, .. } => Some(*total_interest),
            AmortizationResult::Never => None,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        matches!(self, AmortizationResult::PaidOff { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub remaining_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub rows: Vec<AmortizationRow>,
    pub result: AmortizationResult,
}

/// A single liability as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,
    pub balance: Decimal,
    pub annual_rate_percent: Decimal,
    pub monthly_payment: Decimal,
}

impl Debt {
    pub fn new(
        name: impl Into<String>,
        balance: Decimal,
        annual_rate_percent: Decimal,
        monthly_payment: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            balance,
            annual_rate_percent,
            monthly_payment,
        }
    }

    pub fn amortize(&self) -> FinanceResult<AmortizationResult> {
        amortize(self.balance, self.annual_rate_percent, self.monthly_payment)
    }

    pub fn schedule(&self) -> FinanceResult<AmortizationSchedule> {
        amortization_schedule(self.balance, self.annual_rate_percent, self.monthly_payment)
    }

    /// Calendar date of the final payment, or `None` when the debt never clears.
    ///
    /// A payoff that lands past the last date chrono can represent is an error.
    pub fn payoff_date(&self, as_of: NaiveDate) -> FinanceResult<Option<NaiveDate>> {
        let Some(months) = self.amortize()?.months() else {
            return Ok(None);
        };
        as_of
            .checked_add_months(Months::new(months))
            .map(Some)
            .ok_or_else(|| {
                FinanceError::invalid(format!(
                    "payoff {months} months after {as_of} falls outside the calendar"
                ))
            })
    }
}

/// Aggregate view over a set of debts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub total_balance: Decimal,
    pub total_monthly_payment: Decimal,
    /// Balance-weighted annual rate; zero when nothing is owed.
    pub weighted_average_rate: Decimal,
    /// Names of debts whose payment never clears the balance.
    pub unpayable: Vec<String>,
}

pub fn amortize(
    balance: Decimal,
    annual_rate_percent: Decimal,
    monthly_payment: Decimal,
) -> FinanceResult<AmortizationResult> {
    run(balance, annual_rate_percent, monthly_payment, |_| {})
}

pub fn amortization_schedule(
    balance: Decimal,
    annual_rate_percent: Decimal,
    monthly_payment: Decimal,
) -> FinanceResult<AmortizationSchedule> {
    let mut rows = Vec::new();
    let result = run(balance, annual_rate_percent, monthly_payment, |row| {
        rows.push(row)
    })?;
    Ok(AmortizationSchedule { rows, result })
}

/// Fixed monthly installment (EMI) that retires `principal` in `months` payments.
pub fn installment_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: u32,
) -> FinanceResult<Decimal> {
    ensure_non_negative("principal", principal)?;
    ensure_non_negative("annual rate", annual_rate_percent)?;
    if months == 0 {
        return Err(FinanceError::invalid("term must be at least one month"));
    }
    if months > MAX_PAYOFF_MONTHS {
        return Err(FinanceError::invalid(format!(
            "term must not exceed {MAX_PAYOFF_MONTHS} months"
        )));
    }

    let rate = monthly_rate(annual_rate_percent);
    let term = Decimal::from(months);
    if rate.is_zero() {
        return Ok(round_up_minor(principal / term));
    }

    let mut growth = Decimal::ONE;
    for _ in 0..months {
        growth = growth.checked_mul(Decimal::ONE + rate).ok_or_else(out_of_range)?;
    }
    let payment = principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_mul(growth))
        .and_then(|scaled| scaled.checked_div(growth - Decimal::ONE))
        .ok_or_else(out_of_range)?;
    Ok(round_up_minor(payment))
}

pub fn summarize_debts(debts: &[Debt]) -> FinanceResult<DebtSummary> {
    let mut total_balance = Decimal::ZERO;
    let mut total_monthly_payment = Decimal::ZERO;
    let mut weighted_rate = Decimal::ZERO;
    let mut unpayable = Vec::new();

    for debt in debts {
        if !debt.amortize()?.is_paid_off() {
            unpayable.push(debt.name.clone());
        }
        total_balance = total_balance
            .checked_add(debt.balance)
            .ok_or_else(out_of_range)?;
        total_monthly_payment = total_monthly_payment
            .checked_add(debt.monthly_payment)
            .ok_or_else(out_of_range)?;
        weighted_rate = debt
            .balance
            .checked_mul(debt.annual_rate_percent)
            .and_then(|weight| weighted_rate.checked_add(weight))
            .ok_or_else(out_of_range)?;
    }

    let weighted_average_rate = if total_balance.is_zero() {
        Decimal::ZERO
    } else {
        round_minor(weighted_rate / total_balance)
    };

    Ok(DebtSummary {
        total_balance,
        total_monthly_payment,
        weighted_average_rate,
        unpayable,
    })
}

fn run(
    balance: Decimal,
    annual_rate_percent: Decimal,
    monthly_payment: Decimal,
    mut on_month: impl FnMut(AmortizationRow),
) -> FinanceResult<AmortizationResult> {
    ensure_non_negative("balance", balance)?;
    ensure_non_negative("annual rate", annual_rate_percent)?;
    ensure_non_negative("monthly payment", monthly_payment)?;

    let rate = monthly_rate(annual_rate_percent);
    let mut remaining = balance;
    let mut total_interest = Decimal::ZERO;
    let mut months = 0u32;

    while remaining > PAYOFF_EPSILON {
        if months >= MAX_PAYOFF_MONTHS {
            debug!(%balance, %monthly_payment, "payoff horizon exceeded");
            return Ok(AmortizationResult::Never);
        }
        let interest = remaining.checked_mul(rate).ok_or_else(out_of_range)?;
        let principal = monthly_payment - interest;
        if principal <= Decimal::ZERO {
            debug!(%balance, %interest, %monthly_payment, "payment does not cover interest");
            return Ok(AmortizationResult::Never);
        }

        let applied = principal.min(remaining);
        remaining -= principal;
        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(out_of_range)?;
        months += 1;

        on_month(AmortizationRow {
            month: months,
            payment: round_minor(interest + applied),
            interest: round_minor(interest),
            principal: round_minor(applied),
            remaining_balance: round_minor(remaining.max(Decimal::ZERO)),
        });
    }

    let total_interest = round_minor(total_interest);
    debug!(
        %balance,
        months,
        %total_interest,
        "amortization complete"
    );
    Ok(AmortizationResult::PaidOff {
        months,
        total_interest,
    })
}

fn out_of_range() -> FinanceError {
    FinanceError::invalid("amounts overflow the decimal range")
}

fn ensure_non_negative(field: &str, value: Decimal) -> FinanceResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FinanceError::invalid(format!(
            "{field} must not be negative (got {value})"
        )));
    }
    Ok(())
}
