use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, section as output_section};
use crate::cli::registry::{ArgCompletion, CommandEntry};
use crate::config::ConfigKey;

use super::joined;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config [show | set <key> <value>]",
        cmd_config,
    )
    .completes(ArgCompletion::ConfigKey)]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_ascii_lowercase()) {
        None => show_config(context),
        Some(action) if action == "show" => show_config(context),
        Some(action) if action == "set" => set_config(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`; use `show` or `set`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for key in ConfigKey::ALL {
        output::info(format!("  {:<20} {}", key, context.config.get(key)));
    }
    output::info(format!(
        "  {:<20} {}",
        "config file",
        context.config_manager.config_path().display()
    ));
    output::info(format!("  {:<20} {}", "data file", context.data_file.display()));
    Ok(())
}

fn set_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = || CommandError::InvalidArguments("usage: config set <key> <value>".into());
    let (key, value) = args.split_first().ok_or_else(usage)?;
    let value = joined(value).ok_or_else(usage)?;
    let key: ConfigKey = key.parse()?;

    let mut updated = context.config.clone();
    updated.set(key, &value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;
    context.refresh_formatters();

    output::success(format!("`{}` set to {}.", key, context.config.get(key)));
    if matches!(key, ConfigKey::DataFile | ConfigKey::StorageQuotaBytes) {
        output::warning("Storage settings take effect the next time the shell starts.");
    }
    Ok(())
}
