//! Palette and semantic styles for the back-office TUI.

use bodega_core::SaleStatus;
use bodega_core::ui::StockLevel;
use ratatui::style::{Color, Modifier, Style};

use crate::action::NotificationLevel;

// ── Palette ───────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(255, 145, 77); // #ff914d
pub const TEAL: Color = Color::Rgb(94, 234, 212); // #5eead4
pub const AMBER: Color = Color::Rgb(252, 211, 77); // #fcd34d
pub const GREEN: Color = Color::Rgb(74, 222, 128); // #4ade80
pub const RED: Color = Color::Rgb(248, 113, 113); // #f87171
pub const SKY: Color = Color::Rgb(125, 211, 252); // #7dd3fc

pub const TEXT: Color = Color::Rgb(214, 211, 209); // #d6d3d1
pub const MUTED: Color = Color::Rgb(120, 113, 108); // #78716c
pub const BG_SELECTED: Color = Color::Rgb(41, 37, 36); // #292524
pub const BG_OVERLAY: Color = Color::Rgb(28, 25, 23); // #1c1917

// ── Panels ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn overlay() -> Style {
    Style::default().bg(BG_OVERLAY)
}

/// Section heading inside a detail panel.
pub fn section() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn label() -> Style {
    Style::default().fg(MUTED)
}

pub fn value() -> Style {
    Style::default().fg(TEXT)
}

// ── Tables ────────────────────────────────────────────────────────────

pub fn table_header() -> Style {
    Style::default()
        .fg(TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

pub fn placeholder() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
}

// ── Tabs and status bar ───────────────────────────────────────────────

pub fn tab_active() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT)
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

// ── Domain colors ─────────────────────────────────────────────────────

pub fn active(on: bool) -> Style {
    Style::default().fg(if on { GREEN } else { MUTED })
}

pub fn stock(level: StockLevel) -> Style {
    let color = match level {
        StockLevel::Out => RED,
        StockLevel::Low => AMBER,
        StockLevel::Ok => GREEN,
    };
    Style::default().fg(color)
}

pub fn sale_status(status: SaleStatus) -> Style {
    let color = match status {
        SaleStatus::Completed => GREEN,
        SaleStatus::Pending => AMBER,
        SaleStatus::Cancelled => RED,
        SaleStatus::Other => MUTED,
    };
    Style::default().fg(color)
}

/// Border color and icon of a toast.
pub fn notification(level: NotificationLevel) -> (Color, &'static str) {
    match level {
        NotificationLevel::Success => (GREEN, "✓"),
        NotificationLevel::Error => (RED, "✗"),
        NotificationLevel::Warning => (AMBER, "!"),
        NotificationLevel::Info => (SKY, "·"),
    }
}
