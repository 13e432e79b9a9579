//! Field-by-field editing of form drafts.
//!
//! A draft describes its fields through [`DraftFields`]; [`FieldEditor`]
//! owns focus and the text cursor, writes every keystroke straight back
//! into the draft, and renders the whole form as a floating dialog.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use strum::IntoEnumIterator;
use tui_input::{Input, InputRequest};

use crate::theme;
use crate::widgets::{centered, hint_line, overlay};

const LABEL_WIDTH: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rendered as bullets.
    Secret,
    /// Yes/no, flipped with Space.
    Flag,
    /// One of a fixed or injected list, cycled with ←/→.
    Choice,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
        }
    }

    pub const fn secret(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Secret,
        }
    }

    pub const fn flag(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Flag,
        }
    }

    pub const fn choice(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Choice,
        }
    }

    fn is_typed(self) -> bool {
        matches!(self.kind, FieldKind::Text | FieldKind::Secret)
    }
}

/// How a form's fields read from and write to its draft.
pub trait DraftFields {
    const FIELDS: &'static [FieldSpec];

    /// Current value of field `idx` as shown (choices show their label).
    fn text(&self, idx: usize) -> String;

    /// Store typed text, or the id picked from injected choices.
    fn set_text(&mut self, _idx: usize, _value: String) {}

    /// Flip a flag or step a fixed choice.
    fn cycle(&mut self, _idx: usize, _forward: bool) {}
}

/// One entry of a choice list injected at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Submit,
    Cancel,
    Edited,
    Ignored,
}

#[derive(Debug, Default)]
pub struct FieldEditor {
    focus: usize,
    input: Input,
    choices: HashMap<usize, Vec<Choice>>,
}

impl FieldEditor {
    /// Focus the first field and load its text from `draft`.
    pub fn reset<D: DraftFields>(&mut self, draft: &D) {
        self.focus = 0;
        self.load_input(draft);
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Options for a choice field whose values come from the API.
    pub fn set_choices(&mut self, idx: usize, choices: Vec<Choice>) {
        self.choices.insert(idx, choices);
    }

    fn load_input<D: DraftFields>(&mut self, draft: &D) {
        self.input = if D::FIELDS.get(self.focus).is_some_and(|f| f.is_typed()) {
            Input::new(draft.text(self.focus))
        } else {
            Input::default()
        };
    }

    fn move_focus<D: DraftFields>(&mut self, draft: &D, forward: bool) {
        let n = D::FIELDS.len();
        if n == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % n
        } else {
            (self.focus + n - 1) % n
        };
        self.load_input(draft);
    }

    fn cycle<D: DraftFields>(&self, draft: &mut D, forward: bool) {
        let idx = self.focus;
        match self.choices.get(&idx).filter(|c| !c.is_empty()) {
            Some(choices) => {
                let current = draft.text(idx);
                let pos = choices.iter().position(|c| c.id == current);
                let next = match (pos, forward) {
                    (None, _) => 0,
                    (Some(p), true) => (p + 1) % choices.len(),
                    (Some(p), false) => (p + choices.len() - 1) % choices.len(),
                };
                draft.set_text(idx, choices[next].id.clone());
            }
            None => draft.cycle(idx, forward),
        }
    }

    pub fn handle_key<D: DraftFields>(&mut self, key: KeyEvent, draft: &mut D) -> FieldOutcome {
        let Some(spec) = D::FIELDS.get(self.focus).copied() else {
            return FieldOutcome::Ignored;
        };

        match key.code {
            KeyCode::Esc => return FieldOutcome::Cancel,
            KeyCode::Enter => return FieldOutcome::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(draft, true);
                return FieldOutcome::Edited;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(draft, false);
                return FieldOutcome::Edited;
            }
            _ => {}
        }

        if spec.is_typed() {
            let Some(request) = input_request(key) else {
                return FieldOutcome::Ignored;
            };
            let before = self.input.value().to_owned();
            let _ = self.input.handle(request);
            if self.input.value() != before {
                draft.set_text(self.focus, self.input.value().to_owned());
            }
            return FieldOutcome::Edited;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('l') => {
                self.cycle(draft, true);
                FieldOutcome::Edited
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cycle(draft, false);
                FieldOutcome::Edited
            }
            _ => FieldOutcome::Ignored,
        }
    }

    fn display<D: DraftFields>(&self, draft: &D, idx: usize, spec: FieldSpec) -> String {
        let raw = draft.text(idx);
        match spec.kind {
            FieldKind::Secret => "•".repeat(raw.chars().count()),
            FieldKind::Choice => self
                .choices
                .get(&idx)
                .and_then(|list| list.iter().find(|c| c.id == raw))
                .map_or(raw, |c| c.label.clone()),
            FieldKind::Text | FieldKind::Flag => raw,
        }
    }

    /// Draw `draft` as a centered dialog over `area`.
    pub fn render<D: DraftFields>(
        &self,
        frame: &mut Frame,
        area: Rect,
        draft: &D,
        title: &str,
        error: Option<&str>,
        busy: bool,
    ) {
        let rows = u16::try_from(D::FIELDS.len()).unwrap_or(u16::MAX);
        let dialog = centered(area, 68, rows.saturating_add(7));
        let title = if busy {
            format!("{title} · Guardando…")
        } else {
            title.to_owned()
        };
        let inner = overlay(frame, dialog, &title, theme::border_focused());

        let focused_label = Style::default()
            .fg(theme::AMBER)
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::from("")];
        for (idx, spec) in D::FIELDS.iter().enumerate() {
            let focused = idx == self.focus;
            let label_style = if focused { focused_label } else { theme::label() };
            let value = self.display(draft, idx, *spec);
            let value_style = match spec.kind {
                FieldKind::Flag => theme::active(value == "Sí"),
                FieldKind::Choice => Style::default().fg(theme::SKY),
                FieldKind::Text | FieldKind::Secret => theme::value(),
            };
            let marker = if focused { " ▸ " } else { "   " };
            let value = if focused && matches!(spec.kind, FieldKind::Choice) {
                format!("◂ {value} ▸")
            } else {
                value
            };
            lines.push(Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{:<LABEL_WIDTH$}", spec.label), label_style),
                Span::styled(value, value_style),
            ]));
        }

        lines.push(Line::from(""));
        if let Some(error) = error {
            lines.push(Line::from(Span::styled(
                format!("   {error}"),
                Style::default().fg(theme::RED),
            )));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(hint_line(&[
            ("Tab", "siguiente"),
            ("Espacio", "cambiar"),
            ("Enter", "guardar"),
            ("Esc", "cancelar"),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);

        if D::FIELDS.get(self.focus).is_some_and(|f| f.is_typed()) {
            // marker (3) + label column
            let prefix = 3 + LABEL_WIDTH;
            let column = u16::try_from(prefix + self.input.visual_cursor()).unwrap_or(u16::MAX);
            let row = u16::try_from(self.focus + 1).unwrap_or(u16::MAX);
            let (x, y) = (inner.x.saturating_add(column), inner.y.saturating_add(row));
            if x < inner.right() && y < inner.bottom() {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }
}

/// Map an editing key onto a `tui-input` request.
pub fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let request = match key.code {
        KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
        KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
        KeyCode::Char(c) if !ctrl => InputRequest::InsertChar(c),
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return None,
    };
    Some(request)
}

pub fn yes_no(value: bool) -> String {
    if value { "Sí" } else { "No" }.to_owned()
}

/// Next or previous variant of a field-less enum, wrapping.
pub fn step<T: IntoEnumIterator + PartialEq + Copy>(current: T, forward: bool) -> T {
    let all: Vec<T> = T::iter().collect();
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % all.len()
    } else {
        (pos + all.len() - 1) % all.len()
    };
    all[next]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bodega_core::Role;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Default)]
    struct Pair {
        name: String,
        pin: String,
        enabled: bool,
        owner: String,
    }

    impl DraftFields for Pair {
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::text("Nombre"),
            FieldSpec::secret("PIN"),
            FieldSpec::flag("Activo"),
            FieldSpec::choice("Dueño"),
        ];

        fn text(&self, idx: usize) -> String {
            match idx {
                0 => self.name.clone(),
                1 => self.pin.clone(),
                2 => yes_no(self.enabled),
                _ => self.owner.clone(),
            }
        }

        fn set_text(&mut self, idx: usize, value: String) {
            match idx {
                0 => self.name = value,
                1 => self.pin = value,
                3 => self.owner = value,
                _ => {}
            }
        }

        fn cycle(&mut self, idx: usize, _forward: bool) {
            if idx == 2 {
                self.enabled = !self.enabled;
            }
        }
    }

    fn press(editor: &mut FieldEditor, draft: &mut Pair, code: KeyCode) -> FieldOutcome {
        editor.handle_key(KeyEvent::new(code, KeyModifiers::NONE), draft)
    }

    #[test]
    fn typing_writes_through_to_the_draft() {
        let mut draft = Pair {
            name: "An".into(),
            ..Pair::default()
        };
        let mut editor = FieldEditor::default();
        editor.reset(&draft);

        press(&mut editor, &mut draft, KeyCode::Char('a'));
        assert_eq!(draft.name, "Ana");
        press(&mut editor, &mut draft, KeyCode::Backspace);
        assert_eq!(draft.name, "An");
    }

    #[test]
    fn tab_moves_focus_and_space_flips_flags() {
        let mut draft = Pair::default();
        let mut editor = FieldEditor::default();
        editor.reset(&draft);

        press(&mut editor, &mut draft, KeyCode::Tab);
        press(&mut editor, &mut draft, KeyCode::Char('7'));
        assert_eq!(draft.pin, "7");
        assert_eq!(editor.display(&draft, 1, Pair::FIELDS[1]), "•");

        press(&mut editor, &mut draft, KeyCode::Tab);
        press(&mut editor, &mut draft, KeyCode::Char(' '));
        assert!(draft.enabled);

        press(&mut editor, &mut draft, KeyCode::BackTab);
        assert_eq!(editor.focus(), 1);
    }

    #[test]
    fn injected_choices_cycle_by_id() {
        let mut draft = Pair::default();
        let mut editor = FieldEditor::default();
        editor.set_choices(
            3,
            vec![
                Choice { id: "u1".into(), label: "Ana".into() },
                Choice { id: "u2".into(), label: "Luis".into() },
            ],
        );
        editor.reset(&draft);
        for _ in 0..3 {
            press(&mut editor, &mut draft, KeyCode::Tab);
        }

        press(&mut editor, &mut draft, KeyCode::Right);
        assert_eq!(draft.owner, "u1");
        press(&mut editor, &mut draft, KeyCode::Left);
        assert_eq!(draft.owner, "u2");
        assert_eq!(editor.display(&draft, 3, Pair::FIELDS[3]), "Luis");
    }

    #[test]
    fn enter_and_esc_end_the_form() {
        let mut draft = Pair::default();
        let mut editor = FieldEditor::default();
        assert_eq!(press(&mut editor, &mut draft, KeyCode::Enter), FieldOutcome::Submit);
        assert_eq!(press(&mut editor, &mut draft, KeyCode::Esc), FieldOutcome::Cancel);
    }

    #[test]
    fn enum_steps_wrap() {
        assert_eq!(step(Role::Admin, false), Role::Customer);
        assert_eq!(step(Role::Customer, true), Role::Admin);
    }
}
