//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use bodega_core::{Actions, ActionResult, RouteDecision, SaleStatus, User, route_decision};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::event::{Cadence, Event, EventReader};
use crate::screen::{ScreenId, cycle, tab_by_number, tabs_for};
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::centered;

const TOAST_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    actions: Actions,
    /// Config profile, shown in the status bar.
    profile_name: String,
    /// Prefills the login form.
    email: Option<String>,
    /// Who is signed in; drives the tab bar and the route guard.
    user: Option<User>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    active_screen: ScreenId,
    running: bool,
    help_visible: bool,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Stops the invalidation bridge.
    bridge_cancel: CancellationToken,
}

impl App {
    /// A stored session resumes on the dashboard; otherwise the login form.
    pub fn new(actions: Actions, profile_name: String, email: Option<String>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let user = actions.session().user();
        let active_screen = if user.is_some() {
            ScreenId::Dashboard
        } else {
            ScreenId::Login
        };
        let screens = create_screens(&actions, email.clone()).into_iter().collect();

        Self {
            actions,
            profile_name,
            email,
            user,
            screens,
            active_screen,
            running: true,
            help_visible: false,
            pending_confirm: None,
            notification: None,
            action_tx,
            action_rx,
            bridge_cancel: CancellationToken::new(),
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Fresh screens for a new user, so nothing of the last one survives.
    fn reset_screens(&mut self, landing: ScreenId) -> Result<()> {
        self.screens = create_screens(&self.actions, self.email.clone())
            .into_iter()
            .collect();
        self.active_screen = landing;
        self.help_visible = false;
        self.init_screens()
    }

    /// Forward cache invalidations from the action layer into the loop.
    fn spawn_invalidation_bridge(&self) {
        let mut rx = self.actions.invalidator().subscribe();
        let tx = self.action_tx.clone();
        let cancel = self.bridge_cancel.clone();
        tokio::spawn(async move {
            loop {
                let view = tokio::select! {
                    () = cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(view) => view,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "invalidation bridge lagged");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                };
                if tx.send(Action::Invalidated(view)).is_err() {
                    break;
                }
            }
        });
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;
        self.spawn_invalidation_bridge();

        let mut events = EventReader::spawn(Cadence::default());

        info!(
            profile = %self.profile_name,
            screen = %self.active_screen,
            "TUI event loop started"
        );

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.bridge_cancel.cancel();
        drop(events);
        info!("TUI event loop ended");
        Ok(())
    }

    fn tabs(&self) -> Vec<ScreenId> {
        tabs_for(self.user.as_ref().map(|u| u.role))
    }

    fn captures_input(&self) -> bool {
        self.screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input())
    }

    /// Overlays first, then global keys, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }
        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }
        if self.captures_input() {
            return self.delegate_key(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::SHIFT | KeyModifiers::NONE, KeyCode::Char('L'))
                if self.user.is_some() =>
            {
                return Ok(Some(Action::ShowConfirm(ConfirmAction::Logout)));
            }
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) if self.user.is_some() => {
                let n = c as u8 - b'0';
                if let Some(screen) = tab_by_number(&self.tabs(), n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) if self.user.is_some() => {
                let next = cycle(&self.tabs(), self.active_screen, true);
                return Ok(Some(Action::SwitchScreen(next)));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) if self.user.is_some() => {
                let prev = cycle(&self.tabs(), self.active_screen, false);
                return Ok(Some(Action::SwitchScreen(prev)));
            }
            _ => {}
        }
        self.delegate_key(key)
    }

    fn delegate_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn focus(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Hand `action` to one screen and queue whatever it answers with.
    fn dispatch_to(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render | Action::Resize(..) => {}
            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > TOAST_TTL)
                {
                    self.notification = None;
                }
                self.dispatch_to(self.active_screen, action)?;
            }
            Action::SwitchScreen(target) => {
                match route_decision(target.route(), self.user.as_ref()) {
                    RouteDecision::Allow => self.focus(*target),
                    RouteDecision::RedirectToLogin => self.focus(ScreenId::Login),
                    RouteDecision::RedirectToHome => {
                        self.focus(ScreenId::Dashboard);
                        let denied = format!("Sin acceso a {}", target.label());
                        self.action_tx.send(Action::Notify(Notification::warning(denied)))?;
                    }
                }
            }
            Action::LoggedIn(user) => {
                info!(user = %user.email, role = ?user.role, "signed in");
                self.user = Some(user.clone());
                self.reset_screens(ScreenId::Dashboard)?;
            }
            Action::Invalidated(_) => self.broadcast(action)?,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm)?;
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,
            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),
            other => match other.target() {
                Some(id) => self.dispatch_to(id, other)?,
                None => self.dispatch_to(self.active_screen, other)?,
            },
        }
        Ok(())
    }

    /// Spawn `work` and toast its outcome.
    fn run_confirmed<F>(&self, work: F, success: &'static str)
    where
        F: Future<Output = ActionResult<()>> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let notification = match work.await {
                ActionResult::Success { .. } => Notification::success(success),
                ActionResult::Failure { error, .. } => {
                    warn!(%error, "confirmed action failed");
                    Notification::error(error)
                }
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }

    fn execute_confirm(&mut self, confirm: ConfirmAction) -> Result<()> {
        let actions = self.actions.clone();
        match confirm {
            ConfirmAction::DeleteCategory { id, .. } => self.run_confirmed(
                async move { actions.delete_category(&id).await },
                "Categoría eliminada exitosamente",
            ),
            ConfirmAction::DeactivateUser { id, .. } => self.run_confirmed(
                async move { actions.deactivate_user(&id).await },
                "Usuario desactivado exitosamente",
            ),
            ConfirmAction::DeleteUser { id, .. } => self.run_confirmed(
                async move { actions.delete_user(&id).await },
                "Usuario eliminado exitosamente",
            ),
            ConfirmAction::CompleteSale { id } => self.run_confirmed(
                async move {
                    actions
                        .update_sale_status(&id, SaleStatus::Completed)
                        .await
                        .map(|_| ())
                },
                "¡Venta marcada como completada exitosamente!",
            ),
            ConfirmAction::CancelSale { id } => self.run_confirmed(
                async move {
                    actions
                        .update_sale_status(&id, SaleStatus::Cancelled)
                        .await
                        .map(|_| ())
                },
                "Venta cancelada exitosamente",
            ),
            ConfirmAction::Logout => {
                let notification = match actions.logout() {
                    ActionResult::Success { .. } => Notification::info("Sesión cerrada"),
                    ActionResult::Failure { error, .. } => Notification::error(error),
                };
                info!("signed out");
                self.user = None;
                self.reset_screens(ScreenId::Login)?;
                self.action_tx.send(Action::Notify(notification))?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Last drawn is topmost.
        if let Some((notification, _)) = &self.notification {
            Self::render_notification(frame, area, notification);
        }
        if let Some(confirm) = &self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let tabs = self.tabs();
        let narrow = area.width < 100;
        let titles: Vec<Line> = tabs
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                let label = if narrow { id.label_short() } else { id.label() };
                Line::from(Span::styled(format!(" {} {label} ", i + 1), style))
            })
            .collect();

        let selected = tabs.iter().position(|&s| s == self.active_screen).unwrap_or(0);
        let widget = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);
        frame.render_widget(widget, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        match &self.user {
            Some(user) => {
                spans.push(Span::styled(user.full_name(), Style::default().fg(theme::ACCENT)));
                spans.push(Span::styled(
                    format!(" ({})", user.role.label()),
                    Style::default().fg(theme::TEAL),
                ));
            }
            None => spans.push(Span::styled("sin sesión", theme::placeholder())),
        }
        spans.push(Span::styled(format!(" @ {}", self.profile_name), theme::key_hint()));
        spans.push(Span::styled(" │ ", theme::key_hint()));

        if let Some(screen) = self.screens.get(&self.active_screen) {
            for (key, what) in screen.hints() {
                spans.push(Span::styled(format!("{key} "), theme::key_hint_key()));
                spans.push(Span::styled(format!("{what}  "), theme::key_hint()));
            }
        }
        let globals = if self.user.is_some() {
            "? ayuda  L salir  q quit"
        } else {
            "? ayuda  q quit"
        };
        spans.push(Span::styled(globals, theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = centered(area, 60, 20);
        frame.render_widget(Clear, help_area);
        frame.render_widget(Block::default().style(theme::overlay()), help_area);

        let block = Block::default()
            .title(" Atajos de teclado ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let row = |key: &str, what: &str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(what.to_owned(), theme::key_hint()),
            ])
        };
        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled("  Navegación", theme::section())),
            row("1-8", "Ir a la pestaña"),
            row("Tab", "Pestaña siguiente"),
            row("j/k ↑/↓", "Mover selección"),
            row("g/G", "Inicio / final"),
            row("Enter", "Ver detalle"),
            row("[ ]", "Página anterior / siguiente"),
            Line::from(""),
            Line::from(Span::styled("  Listas", theme::section())),
            row("/", "Buscar"),
            row("n e", "Crear / editar"),
            row("r", "Recargar"),
            row("x", "Exportar a archivo"),
            Line::from(""),
            Line::from(Span::styled("  Global", theme::section())),
            row("L", "Cerrar sesión"),
            row("q Ctrl+c", "Salir"),
            Line::from(""),
            Line::from(Span::styled("                     Esc o ? para cerrar", theme::key_hint())),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let dialog_area = centered(area, 56, 5);
        frame.render_widget(Clear, dialog_area);
        frame.render_widget(Block::default().style(theme::overlay()), dialog_area);

        let block = Block::default()
            .title(" Confirmar ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::AMBER));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(format!("  {confirm}"), Style::default().fg(theme::TEXT))),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirmar    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancelar", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
        let msg_len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

        let (border_color, icon) = theme::notification(notification.level);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(Block::default().style(theme::overlay()), toast_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notification.message.clone(), Style::default().fg(theme::TEXT)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
