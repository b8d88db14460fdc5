//! Command handlers for the calculation shell.

use crate::{
    config::Config,
    currency::monthly_rate,
    planning::{
        advance, amortize, installment_payment, project_goal, upcoming, AmortizationResult,
        BillStatus, CompletionDate, Debt, Goal, RecurringTransaction, RequiredContribution,
        MAX_PAYOFF_MONTHS,
    },
    utils::build_info,
};

use super::{
    context::{
        parse_date, parse_frequency, parse_money, parse_optional_date, today, CommandError,
        CommandResult, ShellContext,
    },
    output,
    registry::{Arg, Command, CommandTable},
};

const DEFAULT_SCHEDULE_ROWS: usize = 12;
const PAID: &[&str] = &["paid"];

pub(crate) static COMMANDS: CommandTable = CommandTable::new(&[
    Command {
        name: "amortize",
        aliases: &[],
        summary: "Months and interest needed to pay off a debt",
        usage: "amortize <balance> <annual-rate%> <monthly-payment>",
        args: &[Arg::Value, Arg::Value, Arg::Value],
        handler: cmd_amortize,
    },
    Command {
        name: "schedule",
        aliases: &[],
        summary: "Month-by-month amortization table",
        usage: "schedule <balance> <annual-rate%> <monthly-payment> [rows]",
        args: &[Arg::Value, Arg::Value, Arg::Value, Arg::Value],
        handler: cmd_schedule,
    },
    Command {
        name: "emi",
        aliases: &["installment"],
        summary: "Fixed monthly installment for a loan term",
        usage: "emi <principal> <annual-rate%> <months>",
        args: &[Arg::Value, Arg::Value, Arg::Value],
        handler: cmd_emi,
    },
    Command {
        name: "goal",
        aliases: &[],
        summary: "Progress and required saving for a goal",
        usage: "goal <target> <current> <monthly-contribution> <deadline> [as-of]",
        args: &[Arg::Value, Arg::Value, Arg::Value, Arg::Value, Arg::Value],
        handler: cmd_goal,
    },
    Command {
        name: "advance",
        aliases: &["next"],
        summary: "Next due date of a recurring payment",
        usage: "advance <last-due> <daily|weekly|monthly|quarterly|yearly> [now]",
        args: &[Arg::Value, Arg::Frequency, Arg::Value],
        handler: cmd_advance,
    },
    Command {
        name: "forecast",
        aliases: &[],
        summary: "Upcoming occurrences of a recurring payment",
        usage: "forecast <amount> <frequency> <next-due> [now]",
        args: &[Arg::Value, Arg::Frequency, Arg::Value, Arg::Value],
        handler: cmd_forecast,
    },
    Command {
        name: "status",
        aliases: &[],
        summary: "Billing status of a due date",
        usage: "status <due-date> [now] [paid]",
        args: &[Arg::Value, Arg::OneOf(PAID), Arg::OneOf(PAID)],
        handler: cmd_status,
    },
    Command {
        name: "config",
        aliases: &[],
        summary: "Show or change preferences",
        usage: "config [show | get <key> | set <key> <value>]",
        args: &[Arg::OneOf(&["show", "get", "set"]), Arg::Setting, Arg::Value],
        handler: cmd_config,
    },
    Command {
        name: "version",
        aliases: &[],
        summary: "Show build information",
        usage: "version",
        args: &[],
        handler: cmd_version,
    },
    Command {
        name: "help",
        aliases: &["?"],
        summary: "List commands or describe one",
        usage: "help [command]",
        args: &[Arg::Command],
        handler: cmd_help,
    },
    Command {
        name: "exit",
        aliases: &["quit", "q"],
        summary: "Leave the shell",
        usage: "exit",
        args: &[],
        handler: cmd_exit,
    },
]);

fn cmd_amortize(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [balance, rate, payment] = args else {
        return Err(CommandError::Usage);
    };
    let debt = parse_debt(balance, rate, payment)?;
    let result = debt.amortize()?;

    output::section("Debt payoff");
    match result {
        AmortizationResult::PaidOff {
            months,
            total_interest,
        } => {
            let mut rows = vec![
                ("Months to payoff", months.to_string()),
                ("Total interest", context.money(total_interest)),
                (
                    "Total paid",
                    context.money(debt.balance.saturating_add(total_interest)),
                ),
            ];
            if let Some(date) = debt.payoff_date(today())? {
                rows.push(("Debt-free by", context.date(date)));
            }
            output::key_values(&rows);
        }
        AmortizationResult::Never => {
            output::warning("This debt will never be paid off at the current payment.");
            let interest = debt
                .balance
                .saturating_mul(monthly_rate(debt.annual_rate_percent));
            output::hint(format!(
                "The first month accrues {} of interest; payoff must also finish within {} months.",
                context.money(interest),
                MAX_PAYOFF_MONTHS
            ));
        }
    }
    Ok(())
}

fn cmd_schedule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (debt, limit) = match args {
        [balance, rate, payment] => (parse_debt(balance, rate, payment)?, DEFAULT_SCHEDULE_ROWS),
        [balance, rate, payment, rows] => (
            parse_debt(balance, rate, payment)?,
            rows.parse::<usize>().map_err(|_| {
                CommandError::InvalidArguments(format!("rows must be a whole number, got `{rows}`"))
            })?,
        ),
        _ => return Err(CommandError::Usage),
    };

    let schedule = debt.schedule()?;
    if schedule.result == AmortizationResult::Never {
        output::warning("This debt will never be paid off at the current payment.");
        return Ok(());
    }

    output::section("Amortization schedule");
    let rows: Vec<Vec<String>> = schedule
        .rows
        .iter()
        .take(limit)
        .map(|row| {
            vec![
                row.month.to_string(),
                context.money(row.payment),
                context.money(row.interest),
                context.money(row.principal),
                context.money(row.remaining_balance),
            ]
        })
        .collect();
    output::table(&["Month", "Payment", "Interest", "Principal", "Balance"], &rows);
    if schedule.rows.len() > limit {
        output::info(format!("  ... {} more months", schedule.rows.len() - limit));
    }
    Ok(())
}

fn cmd_emi(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [principal, rate, months] = args else {
        return Err(CommandError::Usage);
    };
    let principal = parse_money("principal", principal)?;
    let rate = parse_money("rate", rate)?;
    let months = months.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("months must be a whole number, got `{months}`"))
    })?;

    let payment = installment_payment(principal, rate, months)?;
    output::section("Installment");
    let mut rows = vec![("Monthly payment", context.money(payment))];
    if let Some(total_interest) = amortize(principal, rate, payment)?.total_interest() {
        rows.push(("Total interest", context.money(total_interest)));
        rows.push((
            "Total paid",
            context.money(principal.saturating_add(total_interest)),
        ));
    }
    output::key_values(&rows);
    Ok(())
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (target, current, monthly, deadline, as_of) = match args {
        [target, current, monthly, deadline] => (target, current, monthly, deadline, None),
        [target, current, monthly, deadline, as_of] => {
            (target, current, monthly, deadline, Some(*as_of))
        }
        _ => return Err(CommandError::Usage),
    };
    let goal = Goal::new(
        "goal",
        parse_money("target", target)?,
        parse_money("current amount", current)?,
        parse_date(deadline)?,
        parse_money("contribution", monthly)?,
    );
    let projection = project_goal(&goal, parse_optional_date(as_of)?)?;

    output::section("Goal projection");
    let required = match projection.required_monthly_contribution {
        RequiredContribution::Amount(amount) => context.money(amount.round_dp(2)),
        RequiredContribution::Unbounded => "deadline passed".to_string(),
    };
    let completion = match projection.projected_completion {
        CompletionDate::On(date) => context.date(date),
        CompletionDate::Unreachable => "unreachable".to_string(),
    };
    output::key_values(&[
        ("Progress", format!("{}%", projection.progress_percent)),
        ("Months remaining", projection.months_remaining.to_string()),
        ("Required monthly", required),
        ("Projected completion", completion),
    ]);
    if projection.projected_completion == CompletionDate::Unreachable {
        output::warning("Goal unreachable without increasing contributions.");
    } else if projection.on_track {
        output::success("On track.");
    } else {
        output::warning("Behind schedule.");
    }
    Ok(())
}

fn cmd_advance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (last_due, frequency, now) = match args {
        [last_due, frequency] => (last_due, frequency, None),
        [last_due, frequency, now] => (last_due, frequency, Some(*now)),
        _ => return Err(CommandError::Usage),
    };
    let last_due = parse_date(last_due)?;
    let frequency = parse_frequency(frequency)?;
    let next = advance(last_due, frequency, parse_optional_date(now)?)?;
    output::info(format!("Next due: {}", context.date(next)));
    Ok(())
}

fn cmd_forecast(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (amount, frequency, next_due, now) = match args {
        [amount, frequency, next_due] => (amount, frequency, next_due, None),
        [amount, frequency, next_due, now] => (amount, frequency, next_due, Some(*now)),
        _ => return Err(CommandError::Usage),
    };
    let item = RecurringTransaction::new(
        "payment",
        parse_money("amount", amount)?,
        parse_frequency(frequency)?,
        parse_date(next_due)?,
    );
    let now = parse_optional_date(now)?;
    let config = context.config();
    let horizon = config.upcoming_horizon_days;
    let payments = upcoming(
        std::slice::from_ref(&item),
        now,
        horizon,
        config.due_soon_days,
    );

    output::section(format!("Next {horizon} days"));
    if payments.is_empty() {
        output::info("No payments fall due in this window.");
    } else {
        let rows: Vec<Vec<String>> = payments
            .iter()
            .map(|payment| {
                vec![
                    context.date(payment.due),
                    context.money(payment.amount),
                    payment.status.to_string(),
                ]
            })
            .collect();
        output::table(&["Due", "Amount", "Status"], &rows);
    }
    output::key_values(&[(
        "Monthly equivalent",
        context.money(item.monthly_equivalent().round_dp(2)),
    )]);
    Ok(())
}

fn cmd_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (due, rest) = match args {
        [due, rest @ ..] if rest.len() <= 2 => (parse_date(due)?, rest),
        _ => return Err(CommandError::Usage),
    };
    let paid = rest.iter().any(|arg| arg.eq_ignore_ascii_case("paid"));
    let now = match rest.iter().find(|arg| !arg.eq_ignore_ascii_case("paid")) {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    let status = BillStatus::classify(due, now, paid, context.config().due_soon_days);
    let message = format!("{} is {}", context.date(due), status);
    match status {
        BillStatus::Overdue => output::warning(message),
        BillStatus::Paid => output::success(message),
        BillStatus::DueSoon | BillStatus::Scheduled => output::info(message),
    }
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output::section("Configuration");
            let config = context.config();
            let rows: Vec<(&str, String)> = Config::KEYS
                .iter()
                .map(|key| (*key, config.get(key).unwrap_or_default()))
                .collect();
            output::key_values(&rows);
            output::hint(format!("Stored at {}", context.config_path()));
            Ok(())
        }
        ["get", key] => {
            let value = context.config().get(key)?;
            output::info(format!("{key} = {value}"));
            Ok(())
        }
        ["set", key, value] => {
            context.update_config(key, value)?;
            output::success(format!("{key} updated."));
            Ok(())
        }
        _ => Err(CommandError::Usage),
    }
}

fn cmd_version(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(CommandError::Usage);
    }
    let info = build_info::current();
    output::info(info.summary());
    output::info(format!("rustc: {}", info.rustc));
    Ok(())
}

fn cmd_help(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Available commands");
            let width = COMMANDS.iter().map(|cmd| cmd.name.len()).max().unwrap_or(0);
            for command in COMMANDS.iter() {
                output::info(format!(
                    "  {:<width$}  {}",
                    command.name,
                    command.summary,
                    width = width
                ));
            }
            Ok(())
        }
        [name] => {
            let command = COMMANDS.find(name).ok_or_else(|| {
                CommandError::InvalidArguments(format!("no help available for `{name}`"))
            })?;
            output::info(format!("{} - {}", command.name, command.summary));
            output::info(format!("usage: {}", command.usage));
            if !command.aliases.is_empty() {
                output::info(format!("aliases: {}", command.aliases.join(", ")));
            }
            Ok(())
        }
        _ => Err(CommandError::Usage),
    }
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn parse_debt(balance: &str, rate: &str, payment: &str) -> Result<Debt, CommandError> {
    Ok(Debt::new(
        "debt",
        parse_money("balance", balance)?,
        parse_money("rate", rate)?,
        parse_money("payment", payment)?,
    ))
}
