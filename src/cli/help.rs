use crate::cli::output::{self, section as output_section};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for entry in registry.list() {
        output::info(format!("  {:<16} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details.");
    output::info("Boxes can be referenced by list position, id or name.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    output::info(format!("  Description: {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
}
