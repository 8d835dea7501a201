use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::parse::{parse_amount, parse_position};
use crate::cli::registry::{ArgCompletion, CommandEntry};

use super::joined;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "spend",
            "Record an expense in the open box or the given one",
            "spend <amount> [box]",
            cmd_spend,
        )
        .completes(ArgCompletion::BoxName),
        CommandEntry::new(
            "expense-edit",
            "Change the amount of an expense in the open box",
            "expense-edit <n> <amount>",
            cmd_expense_edit,
        ),
        CommandEntry::new(
            "expense-delete",
            "Remove an expense from the open box",
            "expense-delete <n>",
            cmd_expense_delete,
        ),
    ]
}

fn amount_arg(raw: &str) -> Result<f64, CommandError> {
    parse_amount(raw).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn expense_index(raw: &str) -> Result<usize, CommandError> {
    parse_position(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "`{}` is not an expense number; numbers start at 1",
            raw
        ))
    })
}

fn cmd_spend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (amount, target) = args.split_first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: spend <amount> [box]".into())
    })?;
    let amount = amount_arg(amount)?;
    let box_id = match joined(target) {
        Some(reference) => context.resolve_box(&reference)?,
        None => context.active_box_id()?,
    };

    let detail = context.manager.add_expense(&box_id, amount)?;
    let fmt = &context.formatters;
    output::success(format!(
        "Spent {} from `{}`. Balance: {}",
        fmt.format_amount(amount),
        detail.name,
        output::balance(detail.balance, fmt.format_amount(detail.balance))
    ));
    Ok(())
}

fn cmd_expense_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [number, amount] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: expense-edit <n> <amount>".into(),
        ));
    };
    let index = expense_index(number)?;
    let amount = amount_arg(amount)?;
    let box_id = context.active_box_id()?;

    let detail = context.manager.edit_expense(&box_id, index, amount)?;
    let fmt = &context.formatters;
    output::success(format!(
        "Expense #{} is now {}. Balance: {}",
        index + 1,
        fmt.format_amount(amount),
        output::balance(detail.balance, fmt.format_amount(detail.balance))
    ));
    Ok(())
}

fn cmd_expense_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [number] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: expense-delete <n>".into(),
        ));
    };
    let index = expense_index(number)?;
    let box_id = context.active_box_id()?;

    let detail = context.manager.delete_expense(&box_id, index)?;
    let fmt = &context.formatters;
    output::success(format!(
        "Expense #{} removed. Balance: {}",
        index + 1,
        output::balance(detail.balance, fmt.format_amount(detail.balance))
    ));
    Ok(())
}
