use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::FinanceError;

/// Cadence of a recurring obligation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }

    /// Returns `anchor` moved forward by `periods` whole periods.
    ///
    /// Calendar-month steps are taken from the anchor in one move, so a series
    /// anchored on the 31st clamps to shorter months without drifting.
    pub fn step(&self, anchor: NaiveDate, periods: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => anchor.checked_add_days(Days::new(periods as u64)),
            Frequency::Weekly => anchor.checked_add_days(Days::new(periods as u64 * 7)),
            Frequency::Monthly => anchor.checked_add_months(Months::new(periods)),
            Frequency::Quarterly => {
                anchor.checked_add_months(Months::new(periods.checked_mul(3)?))
            }
            Frequency::Yearly => anchor.checked_add_months(Months::new(periods.checked_mul(12)?)),
        }
    }

    /// Lower bound on the number of whole periods between two dates.
    ///
    /// Never overshoots: stepping `anchor` by one period fewer than the
    /// returned count lands strictly before `reference`.
    pub(crate) fn periods_between(&self, anchor: NaiveDate, reference: NaiveDate) -> u32 {
        if reference <= anchor {
            return 0;
        }
        let days = (reference - anchor).num_days();
        let months = (reference.year() - anchor.year()) * 12 + reference.month() as i32
            - anchor.month() as i32;
        let periods = match self {
            Frequency::Daily => days,
            Frequency::Weekly => days / 7,
            Frequency::Monthly => months as i64,
            Frequency::Quarterly => (months / 3) as i64,
            Frequency::Yearly => (months / 12) as i64,
        };
        u32::try_from(periods.max(0)).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|freq| freq.label() == needle)
            .ok_or_else(|| {
                FinanceError::invalid(format!(
                    "unknown frequency `{}` (expected daily, weekly, monthly, quarterly or yearly)",
                    s.trim()
                ))
            })
    }
}
