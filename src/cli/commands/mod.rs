pub mod boxes;
pub mod config;
pub mod expenses;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in boxes::definitions()
        .into_iter()
        .chain(expenses::definitions())
        .chain(config::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

/// Joins trailing words so unquoted multi-word names still work.
pub(crate) fn joined(args: &[&str]) -> Option<String> {
    let joined = args.join(" ");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
