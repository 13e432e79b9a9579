//! My profile: the signed-in user's data, editing it, and changing the
//! password.

use bodega_core::ui::PasswordDraft;
use bodega_core::{Actions, ActionResult, CoreError, UpdateUser, User, View, format_date};
use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::spawn_send;
use crate::theme;
use crate::widgets::field::{DraftFields, FieldEditor, FieldOutcome, FieldSpec};
use crate::widgets::{field_line, hint_line, panel, render_loading, render_placeholder};

/// The fields a user may change about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ProfileDraft {
    name: String,
    last_name: String,
    phone: String,
    email: String,
}

impl DraftFields for ProfileDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("Nombre"),
        FieldSpec::text("Apellido"),
        FieldSpec::text("Teléfono"),
        FieldSpec::text("Email"),
    ];

    fn text(&self, idx: usize) -> String {
        match idx {
            0 => self.name.clone(),
            1 => self.last_name.clone(),
            2 => self.phone.clone(),
            _ => self.email.clone(),
        }
    }

    fn set_text(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.name = value,
            1 => self.last_name = value,
            2 => self.phone = value,
            _ => self.email = value,
        }
    }
}

impl ProfileDraft {
    fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            email: user.email.clone(),
        }
    }

    fn to_update(&self) -> Result<UpdateUser, CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("El nombre es requerido"));
        }
        let email = self.email.trim();
        if !email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
        {
            return Err(CoreError::validation("El email no es válido"));
        }
        Ok(UpdateUser {
            name: Some(name.to_owned()),
            last_name: Some(self.last_name.trim().to_owned()),
            phone: Some(self.phone.trim().to_owned()),
            email: Some(email.to_owned()),
            ..UpdateUser::default()
        })
    }
}

enum Dialog {
    Edit(ProfileDraft),
    Password(PasswordDraft),
}

pub struct ProfileScreen {
    actions: Actions,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    stale: bool,
    loading: bool,
    user: Option<User>,
    error: Option<String>,
    dialog: Option<Dialog>,
    dialog_error: Option<String>,
    busy: bool,
    editor: FieldEditor,
    throbber: ThrobberState,
}

impl ProfileScreen {
    pub fn new(actions: Actions) -> Self {
        // The cached copy shows instantly; the fetch replaces it.
        let user = actions.user_data().into_result().ok();
        Self {
            actions,
            action_tx: None,
            focused: false,
            stale: true,
            loading: false,
            user,
            error: None,
            dialog: None,
            dialog_error: None,
            busy: false,
            editor: FieldEditor::default(),
            throbber: ThrobberState::default(),
        }
    }

    fn load(&mut self) {
        if !self.focused || !self.stale || self.loading || self.action_tx.is_none() {
            return;
        }
        self.stale = false;
        self.loading = true;
        let actions = self.actions.clone();
        spawn_send(self.action_tx.as_ref(), async move {
            Action::ProfileLoaded(actions.profile().await)
        });
    }

    fn open(&mut self, dialog: Dialog) {
        match &dialog {
            Dialog::Edit(d) => self.editor.reset(d),
            Dialog::Password(d) => self.editor.reset(d),
        }
        self.dialog_error = None;
        self.busy = false;
        self.dialog = Some(dialog);
    }

    fn submit(&mut self) {
        let (Some(dialog), Some(user)) = (&self.dialog, &self.user) else {
            return;
        };
        let user_id = user.id.clone();
        let actions = self.actions.clone();
        match dialog {
            Dialog::Edit(draft) => {
                let data = match draft.to_update() {
                    Ok(data) => data,
                    Err(e) => {
                        self.dialog_error = Some(e.to_string());
                        return;
                    }
                };
                self.busy = true;
                spawn_send(self.action_tx.as_ref(), async move {
                    let result = actions
                        .update_profile(&user_id, &data)
                        .await
                        .map(|_| "¡Perfil actualizado exitosamente!".to_owned());
                    Action::FormSaved(ScreenId::Profile, result)
                });
            }
            Dialog::Password(draft) => {
                if let Err(e) = draft.validate() {
                    self.dialog_error = Some(e.to_string());
                    return;
                }
                let (current, new) = (draft.current.clone(), draft.new.clone());
                self.busy = true;
                spawn_send(self.action_tx.as_ref(), async move {
                    let result = actions
                        .change_password(&user_id, &current, &new)
                        .await
                        .map(|()| "¡Contraseña actualizada exitosamente!".to_owned());
                    Action::FormSaved(ScreenId::Profile, result)
                });
            }
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        if self.busy {
            return;
        }
        let outcome = match self.dialog.as_mut() {
            Some(Dialog::Edit(d)) => self.editor.handle_key(key, d),
            Some(Dialog::Password(d)) => self.editor.handle_key(key, d),
            None => return,
        };
        match outcome {
            FieldOutcome::Submit => self.submit(),
            FieldOutcome::Cancel => self.dialog = None,
            FieldOutcome::Edited | FieldOutcome::Ignored => {}
        }
    }

    fn render_user(frame: &mut Frame, area: Rect, user: &User) {
        let since = user
            .created_at
            .as_ref()
            .map_or_else(|| "-".to_owned(), |at| format_date(at, &Local));
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", user.full_name()), theme::title_style())),
            Line::from(Span::styled(format!("  {}", user.role.label()), theme::section())),
            Line::from(""),
            field_line("Email", user.email.clone()),
            field_line("Teléfono", user.phone.clone()),
            field_line("Documento", user.type_document.label()),
            field_line("Número", user.id_number.clone()),
            Line::from(vec![
                Span::styled(format!("  {:<18}", "Estado"), theme::label()),
                Span::styled(
                    if user.status { "Activo" } else { "Inactivo" },
                    theme::active(user.status),
                ),
            ]),
            field_line("Miembro desde", since),
            Line::from(""),
            hint_line(&[("e", "editar perfil"), ("p", "cambiar contraseña")]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Component for ProfileScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.dialog.is_some() {
            self.handle_dialog_key(key);
            return Ok(None);
        }
        match key.code {
            KeyCode::Char('e') => {
                if let Some(user) = &self.user {
                    let draft = ProfileDraft::from_user(user);
                    self.open(Dialog::Edit(draft));
                }
            }
            KeyCode::Char('p') if self.user.is_some() => {
                self.open(Dialog::Password(PasswordDraft::default()));
            }
            KeyCode::Char('r') => {
                self.stale = true;
                self.load();
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if self.loading => self.throbber.calc_next(),
            Action::ProfileLoaded(result) => {
                self.loading = false;
                match result {
                    ActionResult::Success { data } => {
                        self.user = Some(data.clone());
                        self.error = None;
                    }
                    ActionResult::Failure { error, .. } => self.error = Some(error.clone()),
                }
            }
            Action::FormSaved(ScreenId::Profile, result) => {
                self.busy = false;
                match result.error() {
                    None => {
                        self.dialog = None;
                        return Ok(Some(Action::Notify(Notification::from_result(result))));
                    }
                    Some(error) => self.dialog_error = Some(error.to_owned()),
                }
            }
            Action::Invalidated(View::Profile) => {
                self.stale = true;
                self.load();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" Mi Perfil ".into(), self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &self.user {
            Some(user) => Self::render_user(frame, inner, user),
            None if self.loading => render_loading(frame, inner, &self.throbber),
            None => render_placeholder(
                frame,
                inner,
                self.error.as_deref().unwrap_or("No se pudo cargar el perfil"),
            ),
        }

        let error = self.dialog_error.as_deref();
        match &self.dialog {
            Some(Dialog::Edit(d)) => {
                self.editor.render(frame, area, d, "Editar perfil", error, self.busy);
            }
            Some(Dialog::Password(d)) => {
                self.editor.render(frame, area, d, "Cambiar contraseña", error, self.busy);
            }
            None => {}
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.load();
        }
    }

    fn captures_input(&self) -> bool {
        self.dialog.is_some()
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("e", "editar"), ("p", "contraseña")]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn profile_update_trims_and_leaves_role_alone() {
        let draft = ProfileDraft {
            name: " Ana ".into(),
            last_name: "Ruiz".into(),
            phone: "300".into(),
            email: "ana@bodega.co".into(),
        };
        let update = draft.to_update().unwrap();
        assert_eq!(update.name.as_deref(), Some("Ana"));
        assert_eq!(update.role, None);
        assert_eq!(update.password, None);
    }

    #[test]
    fn profile_update_needs_a_valid_email() {
        let draft = ProfileDraft {
            name: "Ana".into(),
            email: "ana-at-bodega".into(),
            ..ProfileDraft::default()
        };
        assert!(draft.to_update().is_err());
    }
}
