//! One-line search box opened with `/`.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_input::Input;

use crate::theme;
use crate::widgets::field::input_request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEvent {
    /// Text changed; the caller decides when it counts.
    Changed,
    /// Box closed, text kept.
    Closed,
    /// Box closed and emptied.
    Cleared,
    Ignored,
}

#[derive(Debug, Default)]
pub struct SearchBox {
    input: Input,
    active: bool,
}

impl SearchBox {
    pub fn open(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchEvent {
        match key.code {
            KeyCode::Enter => {
                self.active = false;
                SearchEvent::Closed
            }
            KeyCode::Esc => {
                self.active = false;
                self.input.reset();
                SearchEvent::Cleared
            }
            _ => {
                let Some(request) = input_request(key) else {
                    return SearchEvent::Ignored;
                };
                let before = self.input.value().to_owned();
                let _ = self.input.handle(request);
                if self.input.value() == before {
                    SearchEvent::Ignored
                } else {
                    SearchEvent::Changed
                }
            }
        }
    }

    /// `🔍 text` line, with the terminal cursor while typing.
    pub fn render(&self, frame: &mut Frame, area: Rect, placeholder: &str) {
        let text = if self.input.value().is_empty() && !self.active {
            Span::styled(placeholder.to_owned(), theme::placeholder())
        } else {
            Span::styled(self.input.value().to_owned(), theme::value())
        };
        let prompt_style = if self.active {
            Style::default().fg(theme::AMBER)
        } else {
            theme::label()
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![Span::styled(" / ", prompt_style), text])),
            area,
        );
        if self.active {
            let column = u16::try_from(3 + self.input.visual_cursor()).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(column);
            if x < area.right() {
                frame.set_cursor_position(Position::new(x, area.y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(search: &mut SearchBox, code: KeyCode) -> SearchEvent {
        search.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typing_reports_changes_only() {
        let mut search = SearchBox::default();
        search.open();
        assert_eq!(press(&mut search, KeyCode::Char('a')), SearchEvent::Changed);
        assert_eq!(press(&mut search, KeyCode::Left), SearchEvent::Ignored);
        assert_eq!(search.value(), "a");
    }

    #[test]
    fn esc_clears_and_enter_keeps() {
        let mut search = SearchBox::default();
        search.open();
        press(&mut search, KeyCode::Char('x'));
        assert_eq!(press(&mut search, KeyCode::Enter), SearchEvent::Closed);
        assert_eq!(search.value(), "x");
        assert!(!search.is_active());

        search.open();
        assert_eq!(press(&mut search, KeyCode::Esc), SearchEvent::Cleared);
        assert_eq!(search.value(), "");
    }
}
