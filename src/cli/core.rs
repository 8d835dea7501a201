//! Command dispatch, error reporting and shell context construction.

use std::{env, path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use strsim::levenshtein;
use thiserror::Error;
use tracing::{info, warn};

use budgetbox_core::{
    BoxManager, Clock, CoreError, FixedClock, IdGenerator, StateStore, SystemClock, UuidGenerator,
};
use budgetbox_storage_json::JsonFileStore;

use crate::config::{Config, ConfigError, ConfigManager};
pub use crate::core::errors::CliError;
use crate::core::{errors::BudgetError, paths};

use super::commands;
use super::formatters::CliFormatters;
use super::io::{self as prompts, Confirmation};
use super::output::{self, OutputPreferences};
use super::parse::parse_position;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

/// Pins the shell clock to an RFC 3339 instant.
pub const NOW_ENV: &str = "BUDGETBOX_NOW";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No box is open. Use `open <box>` first.")]
    NoActiveBox,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Core(BudgetError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Core(BudgetError::from(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// System clock unless `BUDGETBOX_NOW` pins a fixed instant.
pub fn clock_from_env() -> Result<Arc<dyn Clock>, CliError> {
    match env::var(NOW_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let instant = DateTime::parse_from_rfc3339(raw.trim())
                .map_err(|err| CliError::Input(format!("{NOW_ENV}=`{raw}`: {err}")))?;
            Ok(Arc::new(FixedClock::new(instant.with_timezone(&Utc))))
        }
        _ => Ok(Arc::new(SystemClock)),
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, paths::resolve_home(), clock_from_env()?)
    }

    /// Builds a shell whose config and data live under `home`.
    pub fn with_home(
        mode: CliMode,
        home: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "unreadable configuration, using defaults");
                Config::default()
            }
        };

        let data_file = config.resolve_data_file(&home);
        let medium = match config.storage_quota_bytes {
            Some(bytes) => JsonFileStore::with_quota(&data_file, bytes),
            None => JsonFileStore::new(&data_file),
        };
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);
        let store = StateStore::new(Arc::new(medium), ids.clone());
        let manager = BoxManager::new(store, clock, ids);

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            manager,
            theme: dialoguer::theme::ColorfulTheme::default(),
            formatters: CliFormatters::new(&config),
            config_manager,
            config,
            home,
            data_file,
            last_command: None,
            running: true,
            unsaved_reported: false,
        };
        context.apply_output_preferences();
        info!(
            home = %context.home.display(),
            data_file = %context.data_file.display(),
            "shell ready"
        );
        Ok(context)
    }

    /// Colours only make sense on a terminal, so script mode always prints plain text.
    pub(crate) fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            screen_reader_mode: self.config.screen_reader_mode,
            color_enabled: self.config.colors_active() && self.is_interactive(),
        });
    }

    pub(crate) fn refresh_formatters(&mut self) {
        self.formatters = CliFormatters::new(&self.config);
        self.apply_output_preferences();
    }

    /// Names of the current boxes, for completion.
    pub fn box_names(&self) -> Vec<String> {
        self.manager
            .snapshot()
            .boxes
            .into_iter()
            .map(|budget| budget.name)
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        match self.manager.snapshot().active_box() {
            Some(active) => format!("budgetbox [{}]> ", active.name),
            None => "budgetbox> ".to_string(),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            let outcome = handler(self, args);
            self.report_unsaved_changes();
            match outcome {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Warns once each time the medium starts rejecting writes.
    fn report_unsaved_changes(&mut self) {
        let unsaved = self.manager.has_unsaved_changes();
        if unsaved && !self.unsaved_reported {
            self.print_warning("Could not save to storage; changes are kept for this session only.");
        }
        self.unsaved_reported = unsaved;
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        Ok(self.confirm(&Confirmation::Exit)?)
    }

    /// Destructive actions ask first in interactive mode; scripts proceed.
    pub(crate) fn confirm(&self, confirmation: &Confirmation<'_>) -> Result<bool, CommandError> {
        if !self.is_interactive() {
            return Ok(true);
        }
        prompts::ask(&self.theme, confirmation)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NoActiveBox => {
                self.print_error(&CommandError::NoActiveBox.to_string());
                self.print_hint("Run `boxes` to list your boxes.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        output::info(message);
    }

    /// Resolves a 1-based list position, an id or a case-insensitive name.
    pub(crate) fn resolve_box(&self, reference: &str) -> Result<String, CommandError> {
        let reference = reference.trim();
        let state = self.manager.snapshot();
        if let Some(found) = parse_position(reference).and_then(|idx| state.boxes.get(idx)) {
            return Ok(found.id.clone());
        }
        if let Some(found) = state.find_box(reference) {
            return Ok(found.id.clone());
        }
        let needle = reference.to_lowercase();
        state
            .boxes
            .iter()
            .find(|candidate| candidate.name.to_lowercase() == needle)
            .map(|found| found.id.clone())
            .ok_or_else(|| CommandError::InvalidArguments(format!("No box matches `{}`.", reference)))
    }

    pub(crate) fn active_box_id(&self) -> Result<String, CommandError> {
        self.manager
            .snapshot()
            .active_box_id
            .ok_or(CommandError::NoActiveBox)
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    home: &std::path::Path,
    now: DateTime<Utc>,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_home(
        CliMode::Script,
        home.to_path_buf(),
        Arc::new(FixedClock::new(now)),
    )?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetbox_domain::Period;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn friday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 15, 0, 0).unwrap()
    }

    #[test]
    fn parse_line_handles_quotes() {
        let tokens = super::super::shell::parse_command_line("new \"Eating out\" 50 weekly").unwrap();
        assert_eq!(tokens, vec!["new", "Eating out", "50", "weekly"]);
    }

    #[test]
    fn script_runner_creates_and_spends() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            friday(),
            &["new Food 100 daily", "open food", "spend 30", "exit"],
        )
        .unwrap();

        let detail = context.manager.active_box().expect("active box");
        assert_eq!(detail.name, "Food");
        assert_eq!(detail.period, Period::Daily);
        assert_eq!(detail.balance, 70.0);
        assert!(!context.running);
    }

    #[test]
    fn boxes_resolve_by_position_id_and_name() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            friday(),
            &["new Food 100 daily", "new \"Eating out\" 50 weekly"],
        )
        .unwrap();

        let second = context.resolve_box("2").unwrap();
        assert_eq!(context.resolve_box("EATING OUT").unwrap(), second);
        assert_eq!(context.resolve_box(&second).unwrap(), second);
        assert!(matches!(
            context.resolve_box("rent"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn spend_without_open_box_is_rejected() {
        let dir = tempdir().unwrap();
        let mut context =
            process_script(dir.path(), friday(), &["new Food 100 daily"]).unwrap();
        assert!(matches!(
            context.process_line("spend 10"),
            Err(CommandError::NoActiveBox)
        ));
        assert_eq!(context.manager.dashboard().boxes[0].balance, 100.0);
    }

    #[test]
    fn edit_and_delete_flow_through_the_manager() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            friday(),
            &[
                "new Food 100 daily",
                "new Fun 40 daily",
                "open 1",
                "spend 12,5",
                "expense-edit 1 20",
                "edit Food --amount 150 --period monthly",
                "delete Fun",
            ],
        )
        .unwrap();

        let dashboard = context.manager.dashboard();
        assert_eq!(dashboard.boxes.len(), 1);
        let detail = context.manager.active_box().expect("food stays active");
        assert_eq!(detail.period, Period::Monthly);
        assert_eq!(detail.current_period, "2024-03");
        assert!(detail.expenses.is_empty());
        assert_eq!(detail.balance, 150.0);
    }

    #[test]
    fn config_set_persists_preferences() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            friday(),
            &["config set currency_symbol US$", "config set locale en-US"],
        )
        .unwrap();
        assert_eq!(context.config.currency_symbol, "US$");
        assert_eq!(context.formatters.format_amount(1.5), "US$ 1.50");

        let reloaded = ConfigManager::with_base_dir(dir.path().to_path_buf())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(reloaded.locale, "en-US");
    }

    #[test]
    fn unknown_commands_do_not_stop_the_script() {
        let dir = tempdir().unwrap();
        let context =
            process_script(dir.path(), friday(), &["boxs", "new Food 10 d"]).unwrap();
        assert_eq!(context.manager.dashboard().boxes.len(), 1);
        assert_eq!(context.last_command.as_deref(), Some("new Food 10 d"));
    }
}
