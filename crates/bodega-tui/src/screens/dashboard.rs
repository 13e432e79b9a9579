//! Home: sales cards, completion gauge, and stock health for roles that
//! manage inventory.

use bodega_core::ui::DashboardMetrics;
use bodega_core::{
    Actions, ActionResult, InventoryStats, Route, View, format_percent, format_price,
};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::component::Component;
use crate::screens::spawn_send;
use crate::theme;
use crate::widgets::{field_line, panel, render_loading, render_placeholder};

pub struct DashboardScreen {
    actions: Actions,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    stale: bool,
    loading: bool,
    metrics: Option<DashboardMetrics>,
    inventory: Option<InventoryStats>,
    error: Option<String>,
    throbber: ThrobberState,
}

impl DashboardScreen {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            action_tx: None,
            focused: false,
            stale: true,
            loading: false,
            metrics: None,
            inventory: None,
            error: None,
            throbber: ThrobberState::default(),
        }
    }

    fn load(&mut self) {
        if !self.stale || self.loading || self.action_tx.is_none() {
            return;
        }
        self.stale = false;
        self.loading = true;
        let actions = self.actions.clone();
        let with_inventory = actions
            .session()
            .user()
            .is_some_and(|u| Route::Inventory.allows(u.role));
        spawn_send(self.action_tx.as_ref(), async move {
            if with_inventory {
                let (sales, inventory) =
                    tokio::join!(actions.sales_stats(), actions.inventory_stats());
                Action::DashboardLoaded {
                    sales,
                    inventory: Some(inventory),
                }
            } else {
                Action::DashboardLoaded {
                    sales: actions.sales_stats().await,
                    inventory: None,
                }
            }
        });
    }

    fn render_cards(frame: &mut Frame, area: Rect, m: &DashboardMetrics) {
        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        let entries = [
            ("Ventas totales", m.total_sales.to_string(), theme::ACCENT),
            ("Completadas", m.completed.to_string(), theme::GREEN),
            ("Pendientes", m.pending.to_string(), theme::AMBER),
            ("Ingresos", format_price(m.revenue), theme::TEAL),
        ];
        for ((title, value, color), card) in entries.into_iter().zip(cards.iter()) {
            let block = panel(format!(" {title} "), false);
            let inner = block.inner(*card);
            frame.render_widget(block, *card);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" {value}"),
                    Style::default().fg(color),
                ))),
                inner,
            );
        }
    }

    fn render_rates(&self, frame: &mut Frame, area: Rect, m: &DashboardMetrics) {
        let block = panel(" Rendimiento ".into(), self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [gauge, lines] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

        let ratio = (m.completion_rate / 100.0).clamp(0.0, 1.0);
        frame.render_widget(
            Gauge::default()
                .ratio(ratio)
                .label(format!("Tasa de completado {}", format_percent(m.completion_rate)))
                .gauge_style(Style::default().fg(theme::GREEN).bg(theme::BG_SELECTED)),
            gauge,
        );
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                field_line("Pendientes", format_percent(m.pending_share)),
                field_line("Venta promedio", format_price(m.average_sale)),
            ]),
            lines,
        );
    }

    fn render_inventory(frame: &mut Frame, area: Rect, stats: &InventoryStats) {
        let block = panel(" Inventario ".into(), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(vec![
                field_line("Productos", stats.total_products.to_string()),
                field_line("Unidades", stats.total_stock.to_string()),
                Line::from(vec![
                    Span::styled(format!("  {:<18}", "Stock bajo"), theme::label()),
                    Span::styled(stats.low_stock.to_string(), Style::default().fg(theme::AMBER)),
                ]),
                Line::from(vec![
                    Span::styled(format!("  {:<18}", "Sin stock"), theme::label()),
                    Span::styled(stats.out_of_stock.to_string(), Style::default().fg(theme::RED)),
                ]),
            ]),
            inner,
        );
    }
}

impl Component for DashboardScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('r') {
            self.stale = true;
            self.load();
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if self.loading => self.throbber.calc_next(),
            Action::DashboardLoaded { sales, inventory } => {
                self.loading = false;
                match sales {
                    ActionResult::Success { data } => {
                        self.metrics = Some(DashboardMetrics::from_stats(data));
                        self.error = None;
                    }
                    ActionResult::Failure { error, .. } => self.error = Some(error.clone()),
                }
                self.inventory = inventory.as_ref().and_then(|r| r.data().cloned());
            }
            Action::Invalidated(view)
                if matches!(view, View::Home | View::Sales | View::Inventory) =>
            {
                self.stale = true;
                if self.focused {
                    self.load();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" Home ".into(), self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(metrics) = self.metrics else {
            if self.loading {
                render_loading(frame, inner, &self.throbber);
            } else {
                render_placeholder(
                    frame,
                    inner,
                    self.error.as_deref().unwrap_or("No hay estadísticas disponibles"),
                );
            }
            return;
        };

        let [cards, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);
        Self::render_cards(frame, cards, &metrics);

        match &self.inventory {
            Some(stats) => {
                let [rates, stock] =
                    Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .areas(body);
                self.render_rates(frame, rates, &metrics);
                Self::render_inventory(frame, stock, stats);
            }
            None => self.render_rates(frame, body, &metrics),
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.load();
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("r", "actualizar")]
    }
}
