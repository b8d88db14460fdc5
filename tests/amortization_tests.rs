mod common;

use common::date;
use fintrack_core::{
    errors::FinanceError,
    planning::{
        amortization_schedule, amortize, installment_payment, summarize_debts, AmortizationResult,
        Debt, MAX_PAYOFF_MONTHS,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn twelve_month_card_pays_off_on_time() {
    let result = amortize(dec!(1200), dec!(12), dec!(106.62)).unwrap();
    match result {
        AmortizationResult::PaidOff {
            months,
            total_interest,
        } => {
            assert_eq!(months, 12);
            assert!((total_interest - dec!(79.42)).abs() <= dec!(0.01));
        }
        AmortizationResult::Never => panic!("expected payoff"),
    }
}

#[test]
fn larger_payment_never_takes_longer() {
    let balance = dec!(8000);
    let rate = dec!(18.9);
    let mut previous: Option<(u32, Decimal)> = None;
    for payment in [dec!(150), dec!(200), dec!(300), dec!(500), dec!(1000), dec!(9000)] {
        let result = amortize(balance, rate, payment).unwrap();
        let months = result.months().unwrap();
        let interest = result.total_interest().unwrap();
        if let Some((prev_months, prev_interest)) = previous {
            assert!(months <= prev_months, "{payment}: {months} > {prev_months}");
            assert!(interest <= prev_interest, "{payment}: {interest} > {prev_interest}");
        }
        previous = Some((months, interest));
    }
    assert_eq!(previous.map(|(months, _)| months), Some(1));
}

#[test]
fn payment_at_or_below_interest_never_clears() {
    // 2000 at 18 % accrues 30 in the first month.
    for payment in [dec!(0), dec!(15), dec!(30)] {
        assert_eq!(
            amortize(dec!(2000), dec!(18), payment).unwrap(),
            AmortizationResult::Never
        );
    }
    assert!(amortize(dec!(2000), dec!(18), dec!(30.01))
        .unwrap()
        .is_paid_off());
}

#[test]
fn settled_debt_needs_no_months() {
    let result = amortize(Decimal::ZERO, dec!(29.99), dec!(50)).unwrap();
    assert_eq!(result.months(), Some(0));
    assert_eq!(result.total_interest(), Some(Decimal::ZERO));
}

#[test]
fn result_never_exceeds_horizon() {
    let result = amortize(dec!(100000), dec!(6), dec!(501)).unwrap();
    match result.months() {
        Some(months) => assert!(months <= MAX_PAYOFF_MONTHS),
        None => assert_eq!(result, AmortizationResult::Never),
    }
}

#[test]
fn schedule_interest_sums_to_total() {
    let schedule = amortization_schedule(dec!(5000), dec!(9.5), dec!(250)).unwrap();
    let total = schedule.result.total_interest().unwrap();
    let summed: Decimal = schedule.rows.iter().map(|row| row.interest).sum();
    assert!((summed - total).abs() <= dec!(0.01) * Decimal::from(schedule.rows.len()));
    assert_eq!(schedule.rows.len() as u32, schedule.result.months().unwrap());
    let balances: Vec<Decimal> = schedule.rows.iter().map(|row| row.remaining_balance).collect();
    assert!(balances.windows(2).all(|pair| pair[1] < pair[0]));
}

#[test]
fn installment_round_trips_through_amortize() {
    let payment = installment_payment(dec!(18000), dec!(8.25), 48).unwrap();
    assert_eq!(amortize(dec!(18000), dec!(8.25), payment).unwrap().months(), Some(48));
    assert!(matches!(
        installment_payment(dec!(18000), dec!(8.25), MAX_PAYOFF_MONTHS + 1),
        Err(FinanceError::InvalidArgument(_))
    ));
}

#[test]
fn debt_payoff_date_and_portfolio_summary() {
    let card = Debt::new("Card", dec!(1200), dec!(12), dec!(106.62));
    assert_eq!(
        card.payoff_date(date(2025, 3, 15)).unwrap(),
        Some(date(2026, 3, 15))
    );

    let summary = summarize_debts(&[
        card,
        Debt::new("Overdraft", dec!(800), dec!(36), dec!(20)),
    ])
    .unwrap();
    assert_eq!(summary.total_balance, dec!(2000));
    assert_eq!(summary.unpayable, vec!["Overdraft".to_string()]);
}

#[test]
fn negative_payment_is_rejected() {
    let err = amortize(dec!(100), dec!(5), dec!(-5)).unwrap_err();
    assert!(err.to_string().contains("monthly payment"));
}
