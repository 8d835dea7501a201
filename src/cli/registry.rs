use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// What the arguments of a command complete to in the interactive shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgCompletion {
    #[default]
    Nothing,
    BoxName,
    Period,
    ConfigKey,
    Command,
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    pub completion: ArgCompletion,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            completion: ArgCompletion::Nothing,
        }
    }

    pub const fn completes(mut self, completion: ArgCompletion) -> Self {
        self.completion = completion;
        self
    }
}

/// Commands in registration order. A later entry with the same name replaces the earlier one.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("open", "first", "open", noop));
        registry.register(CommandEntry::new("spend", "spend", "spend", noop));
        registry.register(
            CommandEntry::new("open", "second", "open <box>", noop).completes(ArgCompletion::BoxName),
        );

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["open", "spend"]);
        let open = registry.get("open").unwrap();
        assert_eq!(open.description, "second");
        assert_eq!(open.completion, ArgCompletion::BoxName);
        assert!(registry.handler("missing").is_none());
    }
}
