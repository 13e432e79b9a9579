//! Shared building blocks for screens: panels, overlays, table cursors,
//! text fields, and the search box.

pub mod field;
pub mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;

/// Rounded panel with the focus-dependent border.
pub fn panel(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

/// Clear `area` and frame it as a floating dialog. Returns the inner area.
pub fn overlay(frame: &mut Frame, area: Rect, title: &str, accent: Style) -> Rect {
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(theme::overlay()), area);
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(accent);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

pub fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2 + 1);
    spans.push(Span::raw(" "));
    for (key, what) in hints {
        spans.push(Span::styled(format!("{key} "), theme::key_hint_key()));
        spans.push(Span::styled(format!("{what}  "), theme::key_hint()));
    }
    Line::from(spans)
}

/// `label  value` row for detail panels.
pub fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<18}"), theme::label()),
        Span::styled(value.into(), theme::value()),
    ])
}

pub fn render_placeholder(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!("  {text}"), theme::placeholder()))),
        area,
    );
}

pub fn render_loading(frame: &mut Frame, area: Rect, state: &ThrobberState) {
    let throbber = Throbber::default()
        .label(" Cargando…")
        .style(Style::default().fg(theme::TEXT))
        .throbber_style(Style::default().fg(theme::ACCENT));
    frame.render_stateful_widget(throbber, area, &mut state.clone());
}

/// "Página 2 de 5 · 47 registros"
pub fn page_label(page: u32, total_pages: u32, total: u64) -> String {
    format!("Página {page} de {total_pages} · {total} registros")
}

// ── Table cursor ─────────────────────────────────────────────────────

/// Row selection over a table whose rows live elsewhere.
#[derive(Debug, Default, Clone)]
pub struct TableCursor {
    state: TableState,
}

impl TableCursor {
    pub fn selected(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    /// Keep the selection inside `len` rows after a reload.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
        } else {
            self.state.select(Some(self.selected().min(len - 1)));
        }
    }

    pub fn down(&mut self, n: usize, len: usize) {
        if len > 0 {
            self.state.select(Some((self.selected() + n).min(len - 1)));
        }
    }

    pub fn up(&mut self, n: usize, len: usize) {
        if len > 0 {
            self.state.select(Some(self.selected().saturating_sub(n)));
        }
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    /// j/k, arrows, g/G, Ctrl+d/u. Returns whether the key moved the cursor.
    pub fn handle_key(&mut self, key: KeyEvent, len: usize) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.down(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.up(1, len),
            KeyCode::Char('d') if ctrl => self.down(10, len),
            KeyCode::Char('u') if ctrl => self.up(10, len),
            KeyCode::Char('g') | KeyCode::Home => self.up(len, len),
            KeyCode::Char('G') | KeyCode::End => self.down(len, len),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cursor_stays_inside_rows() {
        let mut cursor = TableCursor::default();
        cursor.down(1, 3);
        assert!(cursor.handle_key(key(KeyCode::Char('G')), 3));
        assert_eq!(cursor.selected(), 2);
        cursor.down(5, 3);
        assert_eq!(cursor.selected(), 2);
        cursor.clamp(1);
        assert_eq!(cursor.selected(), 0);
        assert!(!cursor.handle_key(key(KeyCode::Char('x')), 1));
    }

    #[test]
    fn empty_table_has_no_selection() {
        let mut cursor = TableCursor::default();
        cursor.clamp(0);
        assert_eq!(cursor.state().selected(), None);
    }

    #[test]
    fn centered_fits_small_areas() {
        let area = Rect::new(0, 0, 20, 10);
        let inner = centered(area, 60, 30);
        assert_eq!((inner.width, inner.height), (18, 8));
        assert_eq!((inner.x, inner.y), (1, 1));
    }
}
