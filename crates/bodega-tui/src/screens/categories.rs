//! Categories: the full list on one page, search as you type, create,
//! edit, and delete with confirmation.

use bodega_core::ui::{CategoryDraft, FormDialog, ListPage, Submission, normalize_search};
use bodega_core::{Actions, CATEGORY_PAGE_LIMIT, Category, CategoryFilters, View, format_date};
use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::{send, spawn_send};
use crate::theme;
use crate::widgets::field::{FieldEditor, FieldOutcome};
use crate::widgets::search::{SearchBox, SearchEvent};
use crate::widgets::{
    TableCursor, centered, field_line, hint_line, overlay, page_label, panel, render_loading,
    render_placeholder,
};

pub struct CategoriesScreen {
    actions: Actions,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    list: ListPage<Category, CategoryFilters>,
    cursor: TableCursor,
    search: SearchBox,
    form: FormDialog<CategoryDraft>,
    editor: FieldEditor,
    detail: bool,
    throbber: ThrobberState,
}

impl CategoriesScreen {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            action_tx: None,
            focused: false,
            list: ListPage::new(CATEGORY_PAGE_LIMIT, "No hay categorías registradas"),
            cursor: TableCursor::default(),
            search: SearchBox::default(),
            form: FormDialog::new(),
            editor: FieldEditor::default(),
            detail: false,
            throbber: ThrobberState::default(),
        }
    }

    fn load(&mut self) {
        if !self.focused || !self.list.needs_load() || self.action_tx.is_none() {
            return;
        }
        let ticket = self.list.begin();
        let actions = self.actions.clone();
        let (page, limit) = (self.list.page(), self.list.limit());
        let filters = self.list.filters().clone();
        spawn_send(self.action_tx.as_ref(), async move {
            Action::CategoriesLoaded(ticket, actions.list_categories(page, limit, &filters).await)
        });
    }

    fn selected(&self) -> Option<&Category> {
        self.list.rows().get(self.cursor.selected())
    }

    fn submit(&mut self) {
        let Some(submission) = self.form.begin_submit() else {
            return;
        };
        let actions = self.actions.clone();
        spawn_send(self.action_tx.as_ref(), async move {
            let result = match submission {
                Submission::Create(data) => actions
                    .create_category(&data)
                    .await
                    .map(|_| "¡Categoría creada exitosamente!".to_owned()),
                Submission::Update { id, data } => actions
                    .update_category(&id, &data)
                    .await
                    .map(|_| "¡Categoría actualizada exitosamente!".to_owned()),
            };
            Action::FormSaved(ScreenId::Categories, result)
        });
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if self.form.is_submitting() {
            return;
        }
        match self.editor.handle_key(key, self.form.draft_mut()) {
            FieldOutcome::Submit => self.submit(),
            FieldOutcome::Cancel => self.form.close(),
            FieldOutcome::Edited | FieldOutcome::Ignored => {}
        }
    }

    fn render_detail(frame: &mut Frame, area: Rect, category: &Category) {
        let dialog = centered(area, 64, 9);
        let inner = overlay(frame, dialog, "Detalle de categoría", theme::border_focused());
        let created = category
            .created_at
            .as_ref()
            .map_or_else(|| "-".to_owned(), |at| format_date(at, &Local));
        frame.render_widget(
            Paragraph::new(vec![
                field_line("ID", category.id.clone()),
                field_line("Nombre", category.name.clone()),
                field_line("Descripción", category.description.clone()),
                field_line("Creada", created),
                Line::from(""),
                hint_line(&[("Esc", "cerrar"), ("e", "editar")]),
            ]),
            inner,
        );
    }
}

impl Component for CategoriesScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_open() {
            self.handle_form_key(key);
            return Ok(None);
        }
        if self.search.is_active() {
            if matches!(
                self.search.handle_key(key),
                SearchEvent::Changed | SearchEvent::Cleared
            ) {
                let search = normalize_search(self.search.value());
                self.list.update_filters(|f| f.search = search);
                self.load();
            }
            return Ok(None);
        }

        let len = self.list.rows().len();
        if self.cursor.handle_key(key, len) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc if self.detail => self.detail = false,
            KeyCode::Enter if self.selected().is_some() => self.detail = !self.detail,
            KeyCode::Char('/') => self.search.open(),
            KeyCode::Char('n') => {
                self.detail = false;
                self.form.open_create();
                self.editor.reset(self.form.draft());
            }
            KeyCode::Char('e') => {
                if let Some(category) = self.selected().cloned() {
                    self.detail = false;
                    self.form.open_edit(category.id.clone(), &category);
                    self.editor.reset(self.form.draft());
                }
            }
            KeyCode::Char('d') => {
                if let Some(category) = self.selected() {
                    return Ok(Some(Action::ShowConfirm(ConfirmAction::DeleteCategory {
                        id: category.id.clone(),
                        name: category.name.clone(),
                    })));
                }
            }
            KeyCode::Char(']') => {
                if self.list.next_page() {
                    self.load();
                }
            }
            KeyCode::Char('[') => {
                if self.list.prev_page() {
                    self.load();
                }
            }
            KeyCode::Char('r') => {
                self.list.refresh();
                self.load();
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if self.list.is_loading() => self.throbber.calc_next(),
            Action::CategoriesLoaded(ticket, result) => {
                if let Some(error) = self.list.finish(*ticket, result.clone()) {
                    send(self.action_tx.as_ref(), Action::Notify(Notification::error(error)));
                }
                self.cursor.clamp(self.list.rows().len());
            }
            Action::FormSaved(ScreenId::Categories, result) => {
                if self.form.submit_result(result) {
                    return Ok(Some(Action::Notify(Notification::from_result(result))));
                }
            }
            Action::Invalidated(view) if View::Categories.is_affected_by(view) => {
                self.list.refresh();
                self.load();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Categorías ({}) ", self.list.total());
        let block = panel(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [search, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);
        self.search.render(frame, search, "Buscar categorías…");

        if self.list.is_loading() && self.list.rows().is_empty() {
            render_loading(frame, body, &self.throbber);
        } else if self.list.is_empty() {
            render_placeholder(frame, body, self.list.placeholder());
        } else {
            let header = Row::new(["Nombre", "Descripción", "Creada"]).style(theme::table_header());
            let rows = self.list.rows().iter().map(|c| {
                Row::new([
                    Cell::from(c.name.clone()),
                    Cell::from(c.description.clone()),
                    Cell::from(
                        c.created_at
                            .as_ref()
                            .map_or_else(String::new, |at| format_date(at, &Local)),
                    ),
                ])
                .style(theme::table_row())
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(30),
                    Constraint::Percentage(55),
                    Constraint::Percentage(15),
                ],
            )
            .header(header)
            .row_highlight_style(theme::table_selected());
            let mut state = self.cursor.state();
            frame.render_stateful_widget(table, body, &mut state);
        }

        if self.list.show_pagination() {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    format!(
                        "  {}",
                        page_label(self.list.page(), self.list.total_pages(), self.list.total())
                    ),
                    theme::label(),
                )),
                footer,
            );
        }

        if self.form.is_open() {
            let title = if self.form.is_edit() {
                "Editar categoría"
            } else {
                "Nueva categoría"
            };
            self.editor.render(
                frame,
                area,
                self.form.draft(),
                title,
                self.form.error(),
                self.form.is_submitting(),
            );
        } else if self.detail {
            if let Some(category) = self.selected() {
                Self::render_detail(frame, area, category);
            }
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.load();
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_open() || self.search.is_active()
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("/", "buscar"),
            ("n", "nueva"),
            ("e", "editar"),
            ("d", "eliminar"),
            ("Enter", "detalle"),
        ]
    }
}
