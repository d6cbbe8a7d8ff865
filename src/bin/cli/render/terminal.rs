use chrono::{DateTime, Utc};

use ddx_lib::flashcards::algorithm::format_interval;
use ddx_lib::flashcards::{Card, CardStatus};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap text in a color code when color output is enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn status_name(status: CardStatus) -> &'static str {
    match status {
        CardStatus::New => "new",
        CardStatus::Learning => "learning",
        CardStatus::Review => "review",
    }
}

pub fn status_label(status: CardStatus, use_color: bool) -> String {
    let color = match status {
        CardStatus::New => Color::BLUE,
        CardStatus::Learning => Color::RED,
        CardStatus::Review => Color::GREEN,
    };
    paint(status_name(status), color, use_color)
}

/// Relative description of a due date, e.g. "due", "in 3d"
pub fn due_label(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if due <= now {
        "due".to_string()
    } else {
        format!("in {}", format_interval(due - now))
    }
}

/// Front of a card
pub fn render_front(card: &Card, use_color: bool) -> String {
    paint(&card.front, Color::BOLD, use_color)
}

/// Back of a card as a bulleted list
pub fn render_back(card: &Card, use_color: bool) -> String {
    card.back
        .iter()
        .map(|term| format!("  {} {}", paint("\u{2022}", Color::CYAN, use_color), term))
        .collect::<Vec<_>>()
        .join("\n")
}
