//! Shared runtime state for CLI interactions and command execution.

use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;

use crate::config::{Config, ConfigManager};
use budgetbox_core::BoxManager;

use super::{formatters::CliFormatters, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: BoxManager,
    pub theme: ColorfulTheme,
    pub formatters: CliFormatters,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub home: PathBuf,
    pub data_file: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
    pub unsaved_reported: bool,
}

impl ShellContext {
    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }
}
