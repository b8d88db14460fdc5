//! Decimal money helpers: rates, rounding, parsing and locale-aware display.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::FinanceError;

/// Number of fractional digits kept on reported money values.
pub const MINOR_UNITS: u32 = 2;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateFormatStyle {
    #[default]
    Short,
    Medium,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::Short,
        }
    }
}

impl LocaleConfig {
    /// Derives separators from a BCP 47 tag; unknown languages fall back to `en-US`.
    pub fn for_tag(tag: &str, date_format: DateFormatStyle) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator) = match language.as_str() {
            "de" | "es" | "it" | "pt" | "nl" | "id" => (',', '.'),
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            date_format,
        }
    }
}

/// Converts an annual percentage rate into the per-month fraction.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / dec!(100) / dec!(12)
}

pub fn round_minor(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNITS, RoundingStrategy::MidpointNearestEven)
}

/// Rounds away from zero so a rounded installment never under-pays.
pub fn round_up_minor(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNITS, RoundingStrategy::AwayFromZero)
}

/// Parses a user-typed amount, tolerating a leading currency symbol and `_`/`,` grouping.
pub fn parse_amount(input: &str) -> Result<Decimal, FinanceError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches(['$', '€', '£', '¥'])
        .chars()
        .filter(|ch| *ch != ',' && *ch != '_')
        .collect();
    if cleaned.is_empty() {
        return Err(FinanceError::invalid("amount is empty"));
    }
    Decimal::from_str(&cleaned)
        .map_err(|_| FinanceError::invalid(format!("invalid amount `{}`", input.trim())))
}

pub fn format_amount(amount: Decimal, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let symbol = symbol_for(code.as_str());
    if symbol == code.as_str() {
        format!("{sign}{} {}", code.as_str(), body)
    } else {
        format!("{sign}{symbol}{body}")
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::Short => date.format("%Y-%m-%d").to_string(),
        DateFormatStyle::Medium => format!(
            "{:02} {} {}",
            date.day(),
            month_label(date.month()),
            date.year()
        ),
    }
}

pub fn symbol_for(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "AUD" => "A$",
        _ => code,
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => MINOR_UNITS,
    }
}

pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointNearestEven);
    let raw = format!("{:.*}", precision as usize, rounded);
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (raw.as_str(), None),
    };
    let grouped = group_digits(int_part, locale.grouping_separator);
    match frac_part {
        Some(frac) => format!("{grouped}{}{frac}", locale.decimal_separator),
        None => grouped,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_rate_divides_annual_percent() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn rounding_strategies_differ_on_fractions() {
        assert_eq!(round_minor(dec!(106.6185)), dec!(106.62));
        assert_eq!(round_minor(dec!(0.125)), dec!(0.12));
        assert_eq!(round_up_minor(dec!(0.121)), dec!(0.13));
    }

    #[test]
    fn parse_amount_accepts_symbols_and_grouping() {
        assert_eq!(parse_amount("$1,200.50").unwrap(), dec!(1200.50));
        assert_eq!(parse_amount(" 10_000 ").unwrap(), dec!(10000));
        assert!(matches!(
            parse_amount("twelve"),
            Err(FinanceError::InvalidArgument(_))
        ));
        assert!(parse_amount("  ").is_err());
    }

    #[test]
    fn formats_amounts_per_locale() {
        let us = LocaleConfig::default();
        let usd = CurrencyCode::default();
        assert_eq!(format_amount(dec!(1234567.891), &usd, &us), "$1,234,567.89");
        assert_eq!(format_amount(dec!(-5), &usd, &us), "-$5.00");

        let de = LocaleConfig::for_tag("de-DE", DateFormatStyle::Short);
        let eur = CurrencyCode::new("eur");
        assert_eq!(format_amount(dec!(1234.5), &eur, &de), "€1.234,50");

        let chf = CurrencyCode::new("CHF");
        assert_eq!(format_amount(dec!(12), &chf, &us), "CHF 12.00");
    }

    #[test]
    fn formats_dates_in_both_styles() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let short = LocaleConfig::default();
        assert_eq!(format_date(&short, date), "2025-03-07");
        let medium = LocaleConfig::for_tag("en-GB", DateFormatStyle::Medium);
        assert_eq!(format_date(&medium, date), "07 Mar 2025");
    }
}
