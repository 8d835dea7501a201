use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

#[derive(Clone, Copy, Debug)]
pub struct OutputPreferences {
    pub screen_reader_mode: bool,
    pub color_enabled: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            screen_reader_mode: false,
            color_enabled: true,
        }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
    colored::control::set_override(prefs.color_enabled && !prefs.screen_reader_mode);
}

pub fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn build_label(kind: MessageKind, prefs: &OutputPreferences) -> &'static str {
    match (kind, prefs.screen_reader_mode) {
        (MessageKind::Success, false) => "[ok] ",
        (MessageKind::Warning, false) => "[!] ",
        (MessageKind::Error, false) => "[x] ",
        (MessageKind::Success, true) => "Done: ",
        (MessageKind::Warning, true) => "Warning: ",
        (MessageKind::Error, true) => "Error: ",
        (MessageKind::Info, _) | (MessageKind::Section, _) => "",
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section if prefs.screen_reader_mode => text.trim().to_string(),
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{}{}", build_label(kind, prefs), text),
    };

    if prefs.screen_reader_mode || !prefs.color_enabled {
        return formatted;
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = preferences();
    let formatted = apply_style(kind, message, &prefs);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Green when the box still has money, red once it is overdrawn.
pub fn balance(amount: f64, text: impl fmt::Display) -> String {
    let prefs = preferences();
    let text = text.to_string();
    if prefs.screen_reader_mode || !prefs.color_enabled {
        return text;
    }
    if amount < 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

/// Colour tag of a box as a dot; a blank keeps columns aligned when colours are off.
pub fn color_dot(tag: Option<&str>) -> String {
    dot_for(tag, &preferences())
}

fn dot_for(tag: Option<&str>, prefs: &OutputPreferences) -> String {
    if prefs.screen_reader_mode || !prefs.color_enabled {
        return " ".to_string();
    }
    match tag.and_then(parse_hex) {
        Some((r, g, b)) => "●".truecolor(r, g, b).to_string(),
        None => " ".to_string(),
    }
}

fn parse_hex(tag: &str) -> Option<(u8, u8, u8)> {
    let hex = tag.strip_prefix('#').filter(|hex| hex.len() == 6)?;
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_tags_parse_as_rgb() {
        assert_eq!(parse_hex("#2980b9"), Some((0x29, 0x80, 0xb9)));
        assert_eq!(parse_hex("2980b9"), None);
        assert_eq!(parse_hex("#zz80b9"), None);
        let plain = OutputPreferences {
            screen_reader_mode: false,
            color_enabled: false,
        };
        assert_eq!(dot_for(Some("#2980b9"), &plain), " ");
    }

    #[test]
    fn screen_reader_mode_spells_out_labels() {
        let prefs = OutputPreferences {
            screen_reader_mode: true,
            color_enabled: true,
        };
        assert_eq!(
            apply_style(MessageKind::Warning, "careful", &prefs),
            "Warning: careful"
        );
        assert_eq!(apply_style(MessageKind::Section, " Boxes ", &prefs), "Boxes");
    }

    #[test]
    fn plain_output_keeps_icons() {
        let prefs = OutputPreferences {
            screen_reader_mode: false,
            color_enabled: false,
        };
        assert_eq!(apply_style(MessageKind::Error, "boom", &prefs), "[x] boom");
        assert_eq!(apply_style(MessageKind::Section, "Boxes", &prefs), "=== Boxes ===");
    }
}
