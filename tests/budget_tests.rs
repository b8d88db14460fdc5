mod common;

use common::date;
use fintrack_core::planning::{
    dashboard_stats, summarize_budgets, BudgetStatus, CategoryBudget, DateWindow, Transaction,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn income_does_not_count_against_budgets() {
    let window = DateWindow::new(date(2025, 5, 1), date(2025, 6, 1)).unwrap();
    let transactions = vec![
        Transaction::income("Refund", "Dining", dec!(40), date(2025, 5, 3)),
        Transaction::expense("Dinner", "Dining", dec!(60), date(2025, 5, 4)),
        Transaction::expense("Lunch", "DINING", dec!(20), date(2025, 5, 31)),
        Transaction::expense("Brunch", "Dining", dec!(75), date(2025, 4, 30)),
    ];
    let usage = summarize_budgets(
        &[CategoryBudget::new("Dining", dec!(200))],
        &transactions,
        window,
        dec!(80),
    );
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].spent, dec!(80));
    assert_eq!(usage[0].remaining, dec!(120));
    assert_eq!(usage[0].percent_used, dec!(40));
    assert_eq!(usage[0].status, BudgetStatus::UnderBudget);
}

#[test]
fn warning_threshold_is_inclusive() {
    let window = DateWindow::new(date(2025, 5, 1), date(2025, 6, 1)).unwrap();
    let transactions = vec![Transaction::expense("Fuel", "Car", dec!(80), date(2025, 5, 10))];
    let budgets = [CategoryBudget::new("Car", dec!(100))];
    let near = summarize_budgets(&budgets, &transactions, window, dec!(80));
    assert_eq!(near[0].status, BudgetStatus::NearLimit);
    let relaxed = summarize_budgets(&budgets, &transactions, window, dec!(90));
    assert_eq!(relaxed[0].status, BudgetStatus::UnderBudget);
}

#[test]
fn dashboard_ignores_transactions_outside_window() {
    let window = DateWindow::new(date(2025, 5, 1), date(2025, 6, 1)).unwrap();
    let transactions = vec![
        Transaction::income("Salary", "Salary", dec!(3000), date(2025, 5, 1)),
        Transaction::expense("Rent", "Housing", dec!(1200), date(2025, 5, 2)),
        Transaction::income("Bonus", "Salary", dec!(999), date(2025, 6, 1)),
    ];
    let stats = dashboard_stats(&transactions, window);
    assert_eq!(stats.income, dec!(3000));
    assert_eq!(stats.net, dec!(1800));
    assert_eq!(stats.savings_rate_percent, dec!(60));

    let empty = dashboard_stats(&[], window);
    assert_eq!(empty.savings_rate_percent, Decimal::ZERO);
}
