use std::fmt;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::frequency::Frequency;
use crate::errors::{FinanceError, FinanceResult};

const MAX_FORECAST_OCCURRENCES: usize = 1024;
pub const DEFAULT_DUE_SOON_DAYS: u32 = 7;

/// Returns the first due date strictly after `now`, stepping whole periods from `last_due`.
///
/// A `last_due` already in the future is returned unchanged, so feeding the
/// result back in with the same `now` is a no-op.
pub fn advance(
    last_due: NaiveDate,
    frequency: Frequency,
    now: NaiveDate,
) -> FinanceResult<NaiveDate> {
    if last_due > now {
        return Ok(last_due);
    }
    let mut periods = frequency.periods_between(last_due, now).max(1);
    loop {
        let candidate = frequency.step(last_due, periods).ok_or_else(|| {
            FinanceError::invalid(format!(
                "{frequency} schedule from {last_due} overflows the calendar"
            ))
        })?;
        if candidate > now {
            debug!(%last_due, %frequency, %now, periods, next = %candidate, "advanced schedule");
            return Ok(candidate);
        }
        periods += 1;
    }
}

/// Billing state of a single due date. Derived, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Scheduled,
    DueSoon,
    Overdue,
    Paid,
}

impl BillStatus {
    pub fn classify(due: NaiveDate, now: NaiveDate, paid: bool, due_soon_days: u32) -> BillStatus {
        if paid {
            return BillStatus::Paid;
        }
        if due < now {
            return BillStatus::Overdue;
        }
        let cutoff = now + Duration::days(due_soon_days as i64);
        if due <= cutoff {
            BillStatus::DueSoon
        } else {
            BillStatus::Scheduled
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillStatus::Scheduled => "Scheduled",
            BillStatus::DueSoon => "Due Soon",
            BillStatus::Overdue => "Overdue",
            BillStatus::Paid => "Paid",
        };
        f.write_str(label)
    }
}

/// A bill, subscription or EMI that repeats on a fixed cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurringTransaction {
    pub name: String,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub next_due: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurringTransaction {
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
        frequency: Frequency,
        next_due: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            frequency,
            next_due,
            end_date: None,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn status(&self, now: NaiveDate, paid: bool, due_soon_days: u32) -> BillStatus {
        BillStatus::classify(self.next_due, now, paid, due_soon_days)
    }

    pub fn is_finished(&self) -> bool {
        self.end_date.is_some_and(|end| self.next_due > end)
    }

    /// Moves `next_due` past `now`. Returns the number of periods skipped.
    pub fn roll_forward(&mut self, now: NaiveDate) -> FinanceResult<u32> {
        let next = advance(self.next_due, self.frequency, now)?;
        let skipped = if next == self.next_due {
            0
        } else {
            self.frequency.periods_between(self.next_due, next).max(1)
        };
        self.next_due = next;
        Ok(skipped)
    }

    /// Due dates from `next_due` up to and including `end`, bounded by `end_date`.
    pub fn occurrences_until(&self, end: NaiveDate) -> Vec<NaiveDate> {
        let limit = match self.end_date {
            Some(series_end) => series_end.min(end),
            None => end,
        };
        let mut dates = Vec::new();
        let mut periods = 0u32;
        while dates.len() < MAX_FORECAST_OCCURRENCES {
            let Some(date) = self.frequency.step(self.next_due, periods) else {
                break;
            };
            if date > limit {
                break;
            }
            dates.push(date);
            periods += 1;
        }
        dates
    }

    /// Cost normalised to one month.
    pub fn monthly_equivalent(&self) -> Decimal {
        match self.frequency {
            Frequency::Daily => self.amount.saturating_mul(dec!(365)) / dec!(12),
            Frequency::Weekly => self.amount.saturating_mul(dec!(52)) / dec!(12),
            Frequency::Monthly => self.amount,
            Frequency::Quarterly => self.amount / dec!(3),
            Frequency::Yearly => self.amount / dec!(12),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpcomingPayment {
    pub name: String,
    pub amount: Decimal,
    pub due: NaiveDate,
    pub status: BillStatus,
}

/// Every unpaid occurrence due within `horizon_days` of `now`, earliest first.
///
/// Occurrences before `now` are reported as overdue.
pub fn upcoming(
    items: &[RecurringTransaction],
    now: NaiveDate,
    horizon_days: u32,
    due_soon_days: u32,
) -> Vec<UpcomingPayment> {
    let horizon_end = now + Duration::days(horizon_days as i64);
    let mut payments: Vec<UpcomingPayment> = items
        .iter()
        .flat_map(|item| {
            item.occurrences_until(horizon_end)
                .into_iter()
                .map(move |due| UpcomingPayment {
                    name: item.name.clone(),
                    amount: item.amount,
                    due,
                    status: BillStatus::classify(due, now, false, due_soon_days),
                })
        })
        .collect();
    payments.sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.name.cmp(&b.name)));
    payments
}
