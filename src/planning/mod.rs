//! Debt, goal, budget and recurring-obligation calculations.

pub mod amortization;
pub mod budget;
pub mod frequency;
pub mod goal;
pub mod recurring;

pub use amortization::{
    amortization_schedule, amortize, installment_payment, summarize_debts, AmortizationResult,
    AmortizationRow, AmortizationSchedule, Debt, DebtSummary, MAX_PAYOFF_MONTHS, PAYOFF_EPSILON,
};
pub use budget::{
    dashboard_stats, summarize_budgets, BudgetStatus, BudgetUsage, CategoryBudget,
    DashboardStats, DateWindow, Transaction, TransactionKind,
};
pub use frequency::Frequency;
pub use goal::{project_goal, CompletionDate, Goal, GoalProjection, RequiredContribution};
pub use recurring::{
    advance, upcoming, BillStatus, RecurringTransaction, UpcomingPayment, DEFAULT_DUE_SOON_DAYS,
};
