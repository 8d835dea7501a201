use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use budgetbox_domain::Period;
use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use thiserror::Error;

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::{ArgCompletion, CommandRegistry};
use crate::config::ConfigKey;

/// Switches the shell to reading commands from stdin without prompts.
pub const SCRIPT_ENV: &str = "BUDGETBOX_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output_info("Welcome to budgetbox. Type `help` to get started.");

    loop {
        if !context.running {
            break;
        }
        if let Some(helper) = editor.helper_mut() {
            helper.boxes = context.box_names();
        }
        let prompt = context.prompt();
        let line = editor.readline(&prompt);

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match context.process_line(trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match context.process_line(trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Completes command names, then box names, periods or config keys depending on the command.
struct CommandHelper {
    commands: Vec<CompletableCommand>,
    boxes: Vec<String>,
}

struct CompletableCommand {
    name: &'static str,
    args_usage: &'static str,
    completion: ArgCompletion,
}

impl CommandHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let commands = registry
            .list()
            .iter()
            .map(|entry| CompletableCommand {
                name: entry.name,
                args_usage: entry
                    .usage
                    .strip_prefix(entry.name)
                    .map(str::trim_start)
                    .unwrap_or_default(),
                completion: entry.completion,
            })
            .collect();
        Self {
            commands,
            boxes: Vec::new(),
        }
    }

    fn find(&self, name: &str) -> Option<&CompletableCommand> {
        let name = name.to_ascii_lowercase();
        self.commands.iter().find(|command| command.name == name)
    }

    /// Candidates for the word being typed, given the complete words before it.
    fn candidates(&self, before: &[&str], needle: &str) -> Vec<String> {
        let Some((command, args)) = before.split_first() else {
            return matching(self.commands.iter().map(|command| command.name), needle);
        };
        if args.last().is_some_and(|flag| flag.eq_ignore_ascii_case("--period")) {
            return matching(Period::ALL.iter().map(|period| period.as_str()), needle);
        }
        let Some(command) = self.find(command) else {
            return Vec::new();
        };
        match command.completion {
            ArgCompletion::Nothing => Vec::new(),
            ArgCompletion::Command => {
                matching(self.commands.iter().map(|command| command.name), needle)
            }
            ArgCompletion::Period => {
                matching(Period::ALL.iter().map(|period| period.as_str()), needle)
            }
            ArgCompletion::BoxName => matching(self.boxes.iter().map(String::as_str), needle)
                .into_iter()
                .map(|name| quote_if_spaced(&name))
                .collect(),
            ArgCompletion::ConfigKey => match args {
                [] => matching(["show", "set"], needle),
                [action] if action.eq_ignore_ascii_case("set") => {
                    matching(ConfigKey::ALL.iter().map(|key| key.as_str()), needle)
                }
                _ => Vec::new(),
            },
        }
    }
}

fn matching<'a>(options: impl IntoIterator<Item = &'a str>, needle: &str) -> Vec<String> {
    let needle = needle.to_lowercase();
    let mut found: Vec<String> = options
        .into_iter()
        .filter(|option| option.to_lowercase().starts_with(&needle))
        .map(str::to_string)
        .collect();
    found.sort();
    found.dedup();
    found
}

fn quote_if_spaced(name: &str) -> String {
    if name.contains(char::is_whitespace) {
        format!("\"{}\"", name)
    } else {
        name.to_string()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let before: Vec<&str> = prefix[..start].split_whitespace().collect();
        let candidates = self
            .candidates(&before, &prefix[start..])
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, candidates))
    }
}

/// After `<command> ` the remaining usage is shown as a hint.
impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos != line.len() {
            return None;
        }
        let name = line.strip_suffix(' ')?;
        let command = self.find(name.trim_start())?;
        (!command.args_usage.is_empty()).then(|| command.args_usage.to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    Ok(split(input)?)
}

#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct ParseError(#[from] shell_words::ParseError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line("new \"Food 10 daily").is_err());
    }

    fn helper() -> CommandHelper {
        let mut registry = CommandRegistry::new();
        crate::cli::commands::register_all(&mut registry);
        let mut helper = CommandHelper::new(&registry);
        helper.boxes = vec!["Food".into(), "Eating out".into(), "Rent".into()];
        helper
    }

    #[test]
    fn first_word_completes_commands() {
        assert_eq!(
            helper().candidates(&[], "ex"),
            vec!["exit", "expense-delete", "expense-edit"]
        );
    }

    #[test]
    fn box_arguments_complete_box_names() {
        let helper = helper();
        assert_eq!(helper.candidates(&["open"], "f"), vec!["Food"]);
        assert_eq!(helper.candidates(&["delete"], "e"), vec!["\"Eating out\""]);
        assert!(helper.candidates(&["show"], "").is_empty());
    }

    #[test]
    fn periods_complete_for_new_and_period_flag() {
        let helper = helper();
        assert_eq!(helper.candidates(&["new", "Food", "10"], "w"), vec!["weekly"]);
        assert_eq!(helper.candidates(&["edit", "Rent", "--period"], "m"), vec!["monthly"]);
    }

    #[test]
    fn config_completes_actions_then_keys() {
        let helper = helper();
        assert_eq!(helper.candidates(&["config"], "s"), vec!["set", "show"]);
        assert_eq!(
            helper.candidates(&["config", "set"], "lo"),
            vec!["locale"]
        );
    }

    #[test]
    fn usage_hint_follows_command_name() {
        let helper = helper();
        let spend = helper.find("spend").unwrap();
        assert_eq!(spend.args_usage, "<amount> [box]");
        assert_eq!(helper.find("show").unwrap().args_usage, "");
    }
}
