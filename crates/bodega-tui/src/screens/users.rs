//! Users (admin only): paginated directory with debounced search, role
//! and status filters, the user form, and soft or permanent deletion.

use bodega_core::ui::{
    Debouncer, FormDialog, ListPage, SEARCH_DEBOUNCE, Submission, UserDraft, normalize_search,
};
use bodega_core::{
    Actions, ActionResult, Role, USER_PAGE_LIMIT, User, UserFilters, UserStats, View, format_date,
};
use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::{next_in, send, spawn_send};
use crate::theme;
use crate::widgets::field::{FieldEditor, FieldOutcome};
use crate::widgets::search::{SearchBox, SearchEvent};
use crate::widgets::{
    TableCursor, centered, field_line, hint_line, overlay, page_label, panel, render_loading,
    render_placeholder,
};

const ROLES: [Role; 3] = [Role::Admin, Role::Seller, Role::Customer];

/// "12 usuarios · 10 activos · 2 inactivos · Administrador 2 · …"
fn stats_line(stats: &UserStats) -> String {
    let mut parts = vec![
        format!("{} usuarios", stats.total),
        format!("{} activos", stats.active),
        format!("{} inactivos", stats.inactive),
    ];
    parts.extend(
        ROLES
            .iter()
            .map(|r| format!("{} {}", r.label(), stats.count_for(*r))),
    );
    parts.join(" · ")
}

pub struct UsersScreen {
    actions: Actions,
    action_tx: Option<UnboundedSender<Action>>,
    debouncer: Option<Debouncer<Action>>,
    focused: bool,
    list: ListPage<User, UserFilters>,
    stats: Option<UserStats>,
    stats_stale: bool,
    cursor: TableCursor,
    search: SearchBox,
    form: FormDialog<UserDraft>,
    editor: FieldEditor,
    detail: bool,
    throbber: ThrobberState,
}

impl UsersScreen {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            action_tx: None,
            debouncer: None,
            focused: false,
            list: ListPage::new(USER_PAGE_LIMIT, "No hay usuarios registrados"),
            stats: None,
            stats_stale: true,
            cursor: TableCursor::default(),
            search: SearchBox::default(),
            form: FormDialog::new(),
            editor: FieldEditor::default(),
            detail: false,
            throbber: ThrobberState::default(),
        }
    }

    fn load(&mut self) {
        if !self.focused || self.action_tx.is_none() {
            return;
        }
        if self.stats_stale {
            self.stats_stale = false;
            let actions = self.actions.clone();
            spawn_send(self.action_tx.as_ref(), async move {
                Action::UserStatsLoaded(actions.user_stats().await)
            });
        }
        if !self.list.needs_load() {
            return;
        }
        let ticket = self.list.begin();
        let actions = self.actions.clone();
        let (page, limit) = (self.list.page(), self.list.limit());
        let filters = self.list.filters().clone();
        spawn_send(self.action_tx.as_ref(), async move {
            Action::UsersLoaded(ticket, actions.list_users(page, limit, &filters).await)
        });
    }

    fn selected(&self) -> Option<&User> {
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
                    .create_user(&data)
                    .await
                    .map(|_| "¡Usuario creado exitosamente!".to_owned()),
                Submission::Update { id, data } => actions
                    .update_user(&id, &data)
                    .await
                    .map(|_| "¡Usuario actualizado exitosamente!".to_owned()),
            };
            Action::FormSaved(ScreenId::Users, result)
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

    fn handle_search_key(&mut self, key: KeyEvent) {
        match self.search.handle_key(key) {
            SearchEvent::Changed => {
                let text = self.search.value().to_owned();
                if let Some(debouncer) = self.debouncer.as_mut() {
                    debouncer.push(Action::SearchCommitted(ScreenId::Users, text));
                }
            }
            SearchEvent::Cleared => {
                if let Some(debouncer) = self.debouncer.as_mut() {
                    debouncer.cancel();
                }
                self.apply_search("");
            }
            SearchEvent::Closed | SearchEvent::Ignored => {}
        }
    }

    fn apply_search(&mut self, text: &str) {
        let search = normalize_search(text);
        if self.list.update_filters(|f| f.search = search) {
            self.load();
        }
    }

    fn confirm_for(&self, permanent: bool) -> Option<Action> {
        let user = self.selected()?;
        let (id, name) = (user.id.clone(), user.full_name());
        Some(Action::ShowConfirm(if permanent {
            ConfirmAction::DeleteUser { id, name }
        } else {
            ConfirmAction::DeactivateUser { id, name }
        }))
    }

    fn render_detail(frame: &mut Frame, area: Rect, user: &User) {
        let dialog = centered(area, 66, 14);
        let inner = overlay(frame, dialog, &user.full_name(), theme::border_focused());
        let created = user
            .created_at
            .as_ref()
            .map_or_else(|| "-".to_owned(), |at| format_date(at, &Local));
        frame.render_widget(
            Paragraph::new(vec![
                field_line("Email", user.email.clone()),
                field_line("Rol", user.role.label()),
                field_line("Documento", user.type_document.label()),
                field_line("Número", user.id_number.clone()),
                field_line("Teléfono", user.phone.clone()),
                Line::from(vec![
                    Span::styled(format!("  {:<18}", "Estado"), theme::label()),
                    Span::styled(
                        if user.status { "Activo" } else { "Inactivo" },
                        theme::active(user.status),
                    ),
                ]),
                field_line("Registrado", created),
                Line::from(""),
                hint_line(&[("Esc", "cerrar"), ("e", "editar"), ("d", "desactivar")]),
            ]),
            inner,
        );
    }
}

impl Component for UsersScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.debouncer = Some(Debouncer::with_sender(SEARCH_DEBOUNCE, action_tx.clone()));
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_open() {
            self.handle_form_key(key);
            return Ok(None);
        }
        if self.search.is_active() {
            self.handle_search_key(key);
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
            KeyCode::Char('f') => {
                let role = next_in(self.list.filters().role, &ROLES);
                self.list.update_filters(|f| f.role = role);
            }
            KeyCode::Char('s') => {
                let status = next_in(self.list.filters().status, &[true, false]);
                self.list.update_filters(|f| f.status = status);
            }
            KeyCode::Char('n') => {
                self.detail = false;
                self.form.open_create();
                self.editor.reset(self.form.draft());
            }
            KeyCode::Char('e') => {
                if let Some(user) = self.selected().cloned() {
                    self.detail = false;
                    self.form.open_edit(user.id.clone(), &user);
                    self.editor.reset(self.form.draft());
                }
            }
            KeyCode::Char('d') => return Ok(self.confirm_for(false)),
            KeyCode::Char('D') => return Ok(self.confirm_for(true)),
            KeyCode::Char(']') => {
                self.list.next_page();
            }
            KeyCode::Char('[') => {
                self.list.prev_page();
            }
            KeyCode::Char('r') => {
                self.list.refresh();
                self.stats_stale = true;
            }
            _ => {}
        }
        self.load();
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if self.list.is_loading() => self.throbber.calc_next(),
            Action::UsersLoaded(ticket, result) => {
                if let Some(error) = self.list.finish(*ticket, result.clone()) {
                    send(self.action_tx.as_ref(), Action::Notify(Notification::error(error)));
                }
                self.cursor.clamp(self.list.rows().len());
            }
            Action::UserStatsLoaded(result) => {
                if let ActionResult::Success { data } = result {
                    self.stats = Some(data.clone());
                }
            }
            Action::SearchCommitted(ScreenId::Users, text) => self.apply_search(text),
            Action::FormSaved(ScreenId::Users, result) => {
                if self.form.submit_result(result) {
                    return Ok(Some(Action::Notify(Notification::from_result(result))));
                }
            }
            Action::Invalidated(view) if View::Users.is_affected_by(view) => {
                self.list.refresh();
                self.stats_stale = true;
                self.load();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let role = self.list.filters().role.map_or("Todos", Role::label);
        let status = match self.list.filters().status {
            None => "Todos",
            Some(true) => "Activos",
            Some(false) => "Inactivos",
        };
        let title = format!(" Usuarios · Rol: {role} · Estado: {status} ");
        let block = panel(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [summary, search, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);
        if let Some(stats) = &self.stats {
            frame.render_widget(
                Paragraph::new(Line::styled(format!("  {}", stats_line(stats)), theme::section())),
                summary,
            );
        }
        self.search.render(frame, search, "Buscar por nombre, email o documento…");

        if self.list.is_loading() && self.list.rows().is_empty() {
            render_loading(frame, body, &self.throbber);
        } else if self.list.is_empty() {
            render_placeholder(frame, body, self.list.placeholder());
        } else {
            let header = Row::new(["Nombre", "Email", "Rol", "Teléfono", "Estado"])
                .style(theme::table_header());
            let rows = self.list.rows().iter().map(|u| {
                Row::new([
                    Cell::from(u.full_name()),
                    Cell::from(u.email.clone()),
                    Cell::from(u.role.label()),
                    Cell::from(u.phone.clone()),
                    Cell::from(Span::styled(
                        if u.status { "Activo" } else { "Inactivo" },
                        theme::active(u.status),
                    )),
                ])
                .style(theme::table_row())
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(26),
                    Constraint::Percentage(30),
                    Constraint::Percentage(16),
                    Constraint::Percentage(16),
                    Constraint::Length(9),
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
                "Editar usuario · contraseña en blanco la conserva"
            } else {
                "Nuevo usuario"
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
            if let Some(user) = self.selected() {
                Self::render_detail(frame, area, user);
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
            ("f", "rol"),
            ("s", "estado"),
            ("n", "nuevo"),
            ("e", "editar"),
            ("d", "desactivar"),
            ("D", "eliminar"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use bodega_core::model::RoleCount;

    use super::*;

    #[test]
    fn stats_line_lists_every_role() {
        let stats = UserStats {
            total: 5,
            active: 4,
            inactive: 1,
            by_role: vec![
                RoleCount {
                    role: Role::Seller,
                    count: 3,
                },
                RoleCount {
                    role: Role::Admin,
                    count: 2,
                },
            ],
        };
        assert_eq!(
            stats_line(&stats),
            "5 usuarios · 4 activos · 1 inactivos · Administrador 2 · Vendedor 3 · Cliente 0"
        );
    }
}
