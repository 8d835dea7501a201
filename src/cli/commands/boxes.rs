use budgetbox_core::{BoxDetail, BoxDraft, BoxPatch, SaveOutcome};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io::Confirmation;
use crate::cli::output::{self, section as output_section};
use crate::cli::parse::{parse_amount, parse_period};
use crate::cli::registry::{ArgCompletion, CommandEntry};

use super::joined;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "boxes",
            "List every box with its balance and the total",
            "boxes",
            cmd_boxes,
        ),
        CommandEntry::new(
            "new",
            "Create a box that refills every period",
            "new <name> <amount> <daily|weekly|monthly>",
            cmd_new,
        )
        .completes(ArgCompletion::Period),
        CommandEntry::new("open", "Select the box to work with", "open <box>", cmd_open)
            .completes(ArgCompletion::BoxName),
        CommandEntry::new("show", "Show the open box in detail", "show", cmd_show),
        CommandEntry::new(
            "edit",
            "Rename a box or change its allowance or period",
            "edit <box> [--name <name>] [--amount <amount>] [--period <period>]",
            cmd_edit,
        )
        .completes(ArgCompletion::BoxName),
        CommandEntry::new(
            "delete",
            "Delete a box and its expenses",
            "delete <box>",
            cmd_delete,
        )
        .completes(ArgCompletion::BoxName),
        CommandEntry::new(
            "reset",
            "Erase all boxes and expenses",
            "reset [--yes]",
            cmd_reset,
        ),
    ]
}

fn cmd_boxes(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dashboard = context.manager.dashboard();
    output_section("Boxes");
    if dashboard.boxes.is_empty() {
        output::info("No boxes yet. Create one with `new <name> <amount> <period>`.");
        return Ok(());
    }

    for (idx, row) in dashboard.boxes.iter().enumerate() {
        let marker = if row.is_active { '*' } else { ' ' };
        let amount = context.formatters.format_amount(row.balance);
        output::info(format!(
            "{marker} {:>2}. {} {:<20} {:<12} {}",
            idx + 1,
            output::color_dot(row.color.as_deref()),
            row.name,
            context.formatters.period_label(row.period),
            output::balance(row.balance, amount)
        ));
    }
    let total = context.formatters.format_amount(dashboard.total);
    output::info(format!("  Total: {}", output::balance(dashboard.total, total)));
    Ok(())
}

fn cmd_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, amount, period] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: new <name> <amount> <daily|weekly|monthly>".into(),
        ));
    };
    let amount =
        parse_amount(amount).map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let period = parse_period(period).map_err(CommandError::InvalidArguments)?;

    let detail = context
        .manager
        .create_box(BoxDraft::new(*name, period, amount))?;
    output::success(format!(
        "Box `{}` created with {} per {} period.",
        detail.name,
        context.formatters.format_amount(detail.amount_per_period),
        detail.period
    ));
    Ok(())
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference =
        joined(args).ok_or_else(|| CommandError::InvalidArguments("usage: open <box>".into()))?;
    let id = context.resolve_box(&reference)?;
    let detail = context.manager.open_box(&id)?;
    output::success(format!("Opened `{}`.", detail.name));
    render_detail(context, &detail);
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let detail = context
        .manager
        .active_box()
        .ok_or(CommandError::NoActiveBox)?;
    render_detail(context, &detail);
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage =
        || CommandError::InvalidArguments("usage: edit <box> [--name N] [--amount A] [--period P]".into());
    let (reference, flags) = args.split_first().ok_or_else(usage)?;
    let patch = parse_patch(flags)?;
    if patch.is_empty() {
        output::warning("Nothing to change.");
        return Ok(());
    }

    let id = context.resolve_box(reference)?;
    if let Some(period) = patch.period {
        let state = context.manager.snapshot();
        let changing = state.find_box(&id).filter(|current| current.period != period);
        if let Some(current) = changing {
            let question = Confirmation::PeriodChange {
                name: &current.name,
                expenses: current.expenses.len(),
            };
            if !context.confirm(&question)? {
                output::info("Edit cancelled.");
                return Ok(());
            }
        }
    }

    let detail = context.manager.edit_box(&id, patch)?;
    output::success(format!("Box `{}` updated.", detail.name));
    render_detail(context, &detail);
    Ok(())
}

fn parse_patch(flags: &[&str]) -> Result<BoxPatch, CommandError> {
    let mut patch = BoxPatch::default();
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        let value = iter.next().ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{}` needs a value", flag))
        })?;
        match flag.to_ascii_lowercase().as_str() {
            "--name" => patch.name = Some(value.to_string()),
            "--amount" => {
                patch.amount_per_period = Some(
                    parse_amount(value)
                        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?,
                )
            }
            "--period" => {
                patch.period = Some(parse_period(value).map_err(CommandError::InvalidArguments)?)
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`",
                    other
                )))
            }
        }
    }
    Ok(patch)
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference =
        joined(args).ok_or_else(|| CommandError::InvalidArguments("usage: delete <box>".into()))?;
    let id = context.resolve_box(&reference)?;
    let state = context.manager.snapshot();
    let question = match state.find_box(&id) {
        Some(found) => Confirmation::DeleteBox {
            name: &found.name,
            expenses: found.expenses.len(),
        },
        None => Confirmation::DeleteBox {
            name: &id,
            expenses: 0,
        },
    };
    if !context.confirm(&question)? {
        output::info("Nothing deleted.");
        return Ok(());
    }

    let removed = context.manager.delete_box(&id)?;
    output::success(format!("Deleted box `{}`.", removed.name));
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let forced = args.iter().any(|arg| matches!(*arg, "--yes" | "-y"));
    if !forced {
        if !context.is_interactive() {
            return Err(CommandError::InvalidArguments(
                "`reset` needs --yes in script mode".into(),
            ));
        }
        let boxes = context.manager.snapshot().boxes.len();
        if !context.confirm(&Confirmation::Reset { boxes })? {
            output::info("Nothing erased.");
            return Ok(());
        }
    }

    match context.manager.reset() {
        SaveOutcome::Persisted => output::success("All boxes and expenses erased."),
        SaveOutcome::Failed => {
            output::warning("Could not erase the data file; see the log for details.")
        }
    }
    Ok(())
}

pub(crate) fn render_detail(context: &ShellContext, detail: &BoxDetail) {
    let fmt = &context.formatters;
    output_section(&detail.name);
    output::info(format!(
        "  Period      : {} ({})",
        fmt.period_label(detail.period),
        detail.current_period
    ));
    output::info(format!(
        "  Allowance   : {}",
        fmt.format_amount(detail.amount_per_period)
    ));
    output::info(format!(
        "  Carried over: {}",
        fmt.format_amount(detail.last_balance)
    ));
    output::info(format!("  Spent       : {}", fmt.format_amount(detail.spent)));
    output::info(format!(
        "  Balance     : {}",
        output::balance(detail.balance, fmt.format_amount(detail.balance))
    ));

    if detail.expenses.is_empty() {
        output::info("  No expenses this period.");
        return;
    }
    output::info("  Expenses:");
    for (idx, expense) in detail.expenses.iter().enumerate() {
        output::info(format!("    {:>2}. {}", idx + 1, fmt.format_amount(expense.amount)));
    }
}
