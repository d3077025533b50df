pub mod table;
pub mod tracker;

use console::{Style, style};
use once_cell::sync::Lazy;

pub static HEADING: Lazy<Style> = Lazy::new(|| Style::new().cyan().bold());
pub static DIM: Lazy<Style> = Lazy::new(|| Style::new().dim());

pub fn separator() -> String {
    DIM.apply_to("━".repeat(50)).to_string()
}

pub fn ok(msg: impl std::fmt::Display) -> String {
    format!("{} {msg}", style("✓").green().bold())
}

pub fn fail(msg: impl std::fmt::Display) -> String {
    format!("{} {msg}", style("✗").red().bold())
}
