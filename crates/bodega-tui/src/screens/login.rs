//! Email and password form. The only screen without a session.

use bodega_core::{Actions, ActionResult, LoginCredentials};
use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{send, spawn_send};
use crate::theme;
use crate::widgets::field::{DraftFields, FieldEditor, FieldOutcome, FieldSpec};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LoginDraft {
    email: String,
    password: String,
}

impl DraftFields for LoginDraft {
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::text("Email"), FieldSpec::secret("Contraseña")];

    fn text(&self, idx: usize) -> String {
        match idx {
            0 => self.email.clone(),
            _ => self.password.clone(),
        }
    }

    fn set_text(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.email = value,
            _ => self.password = value,
        }
    }
}

impl LoginDraft {
    fn credentials(&self) -> Result<LoginCredentials, &'static str> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err("Email y contraseña son requeridos");
        }
        Ok(LoginCredentials::new(email, &self.password))
    }
}

pub struct LoginScreen {
    actions: Actions,
    action_tx: Option<UnboundedSender<Action>>,
    draft: LoginDraft,
    editor: FieldEditor,
    error: Option<String>,
    busy: bool,
}

impl LoginScreen {
    pub fn new(actions: Actions, email: Option<String>) -> Self {
        let draft = LoginDraft {
            email: email.unwrap_or_default(),
            password: String::new(),
        };
        let mut editor = FieldEditor::default();
        editor.reset(&draft);
        Self {
            actions,
            action_tx: None,
            draft,
            editor,
            error: None,
            busy: false,
        }
    }

    fn submit(&mut self) {
        if self.busy {
            return;
        }
        let credentials = match self.draft.credentials() {
            Ok(c) => c,
            Err(msg) => {
                self.error = Some(msg.to_owned());
                return;
            }
        };
        self.busy = true;
        self.error = None;
        let actions = self.actions.clone();
        spawn_send(self.action_tx.as_ref(), async move {
            Action::LoginFinished(actions.login(&credentials).await)
        });
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.editor.handle_key(key, &mut self.draft) {
            FieldOutcome::Submit => self.submit(),
            FieldOutcome::Cancel => return Ok(Some(Action::Quit)),
            FieldOutcome::Edited | FieldOutcome::Ignored => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::LoginFinished(result) = action {
            self.busy = false;
            match result {
                ActionResult::Success { data } => {
                    self.draft.password.clear();
                    send(
                        self.action_tx.as_ref(),
                        Action::Notify(Notification::success(
                            "¡Bienvenido al panel de administración!",
                        )),
                    );
                    return Ok(Some(Action::LoggedIn(data.clone())));
                }
                ActionResult::Failure { error, .. } => {
                    self.draft.password.clear();
                    self.editor.reset(&self.draft);
                    self.error = Some(error.clone());
                }
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [banner, form] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("  Bodega · Panel de administración", theme::title_style())),
                Line::from(Span::styled(
                    "  Inicia sesión con tu cuenta de administrador o vendedor",
                    theme::label(),
                )),
            ]),
            banner,
        );
        self.editor.render(
            frame,
            form,
            &self.draft,
            "Iniciar sesión",
            self.error.as_deref(),
            self.busy,
        );
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("Tab", "campo"), ("Enter", "entrar"), ("Esc", "salir")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credentials_are_rejected_locally() {
        let draft = LoginDraft {
            email: "  ".into(),
            password: "secret".into(),
        };
        assert!(draft.credentials().is_err());

        let draft = LoginDraft {
            email: " admin@bodega.co ".into(),
            password: "secret".into(),
        };
        assert!(draft.credentials().is_ok());
    }
}
