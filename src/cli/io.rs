//! Yes/no prompts guarding destructive box operations.

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::CommandError;

/// A question the shell asks before it loses data or leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation<'a> {
    DeleteBox { name: &'a str, expenses: usize },
    PeriodChange { name: &'a str, expenses: usize },
    Reset { boxes: usize },
    Exit,
}

impl Confirmation<'_> {
    pub fn prompt(&self) -> String {
        match self {
            Confirmation::DeleteBox { name, expenses: 0 } => format!("Delete box `{name}`?"),
            Confirmation::DeleteBox { name, expenses } => {
                format!("Delete box `{name}` and its {}?", plural(*expenses, "expense"))
            }
            Confirmation::PeriodChange { name, expenses } => format!(
                "Changing the period of `{name}` clears {} logged this period. Continue?",
                plural(*expenses, "expense")
            ),
            Confirmation::Reset { boxes } => {
                format!("Erase {} and every expense?", plural(*boxes, "box"))
            }
            Confirmation::Exit => "Exit shell?".to_string(),
        }
    }

    /// Only leaving the shell defaults to yes.
    pub fn default_answer(&self) -> bool {
        matches!(self, Confirmation::Exit)
    }

    /// Nothing would be lost, so there is no need to ask.
    pub fn is_trivial(&self) -> bool {
        matches!(
            self,
            Confirmation::PeriodChange { expenses: 0, .. } | Confirmation::Reset { boxes: 0 }
        )
    }
}

pub fn ask(theme: &ColorfulTheme, confirmation: &Confirmation<'_>) -> Result<bool, CommandError> {
    if confirmation.is_trivial() {
        return Ok(true);
    }
    Confirm::with_theme(theme)
        .with_prompt(confirmation.prompt())
        .default(confirmation.default_answer())
        .interact()
        .map_err(CommandError::from)
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun) {
        (1, _) => format!("1 {noun}"),
        (_, "box") => format!("{count} boxes"),
        _ => format!("{count} {noun}s"),
    }
}
