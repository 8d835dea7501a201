use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::{ArgCompletion, CommandEntry};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            "Show build metadata and where boxes are stored",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        )
        .completes(ArgCompletion::Command),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("budgetbox {}", meta.version));
    let storage = if context.manager.has_unsaved_changes() {
        "writes rejected, changes kept for this session"
    } else {
        "in sync"
    };
    let rows = [
        ("Build", format!("{} ({})", meta.git_hash, meta.git_status)),
        ("Built at", meta.timestamp.to_string()),
        ("Target", format!("{} / {}", meta.target, meta.profile)),
        ("Rustc", meta.rustc.to_string()),
        ("Data file", context.data_file.display().to_string()),
        ("Storage", storage.to_string()),
        ("Boxes", context.manager.snapshot().boxes.len().to_string()),
    ];
    for (label, value) in rows {
        output::info(format!("  {:<10}: {}", label, value));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        help::print_overview(&context.registry);
        return Ok(());
    };
    match context.command(&name.to_lowercase()) {
        Some(entry) => help::print_command(entry),
        None => context.suggest_command(name),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
