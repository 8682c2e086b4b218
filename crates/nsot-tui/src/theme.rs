//! Fixed palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(97, 175, 239); // #61afef
pub const ACCENT_ALT: Color = Color::Rgb(198, 120, 221); // #c678dd
pub const TEXT: Color = Color::Rgb(200, 204, 212); // #c8ccd4
pub const MUTED: Color = Color::Rgb(92, 99, 112); // #5c6370
pub const OK: Color = Color::Rgb(152, 195, 121); // #98c379
pub const WARN: Color = Color::Rgb(229, 192, 123); // #e5c07b
pub const ERROR: Color = Color::Rgb(224, 108, 117); // #e06c75
pub const BG_PANEL: Color = Color::Rgb(33, 37, 43); // #21252b
pub const BG_SELECTED: Color = Color::Rgb(44, 49, 58); // #2c313a

// ── Semantic styles ──────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border() -> Style {
    Style::default().fg(MUTED)
}

pub fn border_active() -> Style {
    Style::default().fg(ACCENT_ALT)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn selected() -> Style {
    Style::default()
        .fg(ACCENT_ALT)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

/// Field labels in detail panels and forms.
pub fn label() -> Style {
    Style::default().fg(MUTED)
}

pub fn value() -> Style {
    Style::default().fg(ACCENT)
}

pub fn error() -> Style {
    Style::default().fg(ERROR)
}

pub fn diff_old() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::CROSSED_OUT)
}

pub fn diff_new() -> Style {
    Style::default().fg(OK)
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}
