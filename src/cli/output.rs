//! Terminal rendering for `nfl-edge`: dashboard tables by default, the
//! raw report or rows as JSON with `--json`. Status lines reuse the
//! signal severity palette.

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::strategy::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// Rows as a table, or as a JSON array
pub fn print_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table => {
            if items.is_empty() {
                println!("(nothing to show)");
            } else {
                let table = Table::new(items).to_string();
                println!("{table}");
            }
        }
        OutputMode::Json => {
            let json = serde_json::to_string_pretty(items)?;
            println!("{json}");
        }
    }
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(item: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

pub fn print_kv(key: &str, value: &str) {
    println!("{key}: {value}");
}

/// Wrap `msg` in a 24-bit ANSI color taken from a "#rrggbb" palette entry.
/// Unparseable colors leave the text plain.
pub fn paint(hex: &str, msg: &str) -> String {
    let rgb = hex
        .strip_prefix('#')
        .filter(|h| h.len() == 6)
        .and_then(|h| {
            let channel = |i: usize| u8::from_str_radix(h.get(i..i + 2)?, 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        });
    match rgb {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{msg}\x1b[0m"),
        None => msg.to_string(),
    }
}

pub fn print_success(msg: &str) {
    println!("{}", paint(Severity::Low.color(), msg));
}

pub fn print_warn(msg: &str) {
    println!("{}", paint(Severity::High.color(), msg));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", paint(Severity::Critical.color(), msg));
}

/// Short "A 21 - 17 B" score line
pub fn score_line(away_code: &str, away: u32, home: u32, home_code: &str) -> String {
    format!("{away_code} {away} - {home} {home_code}")
}
