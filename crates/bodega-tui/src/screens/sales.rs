//! Sales: paginated orders with status and date filters, completion and
//! cancellation, the per-page summary, and the CSV report.

use bodega_core::export::{CsvWorkbookWriter, SpreadsheetWriter, sales_file_stem, sales_workbook};
use bodega_core::ui::{ListPage, PageSalesStats};
use bodega_core::{
    Actions, SALES_PAGE_LIMIT, Sale, SaleFilters, SaleStatus, View, format_date, format_price,
    format_time,
};
use chrono::{Local, NaiveDate};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::{next_in, send, spawn_send};
use crate::theme;
use crate::widgets::field::{DraftFields, FieldEditor, FieldOutcome, FieldSpec};
use crate::widgets::{
    TableCursor, centered, field_line, hint_line, overlay, page_label, panel, render_loading,
    render_placeholder,
};

const STATUSES: [SaleStatus; 3] = [SaleStatus::Pending, SaleStatus::Completed, SaleStatus::Cancelled];

/// Date range typed as `YYYY-MM-DD`; blank means open-ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PeriodDraft {
    start: String,
    end: String,
}

impl DraftFields for PeriodDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("Desde (AAAA-MM-DD)"),
        FieldSpec::text("Hasta (AAAA-MM-DD)"),
    ];

    fn text(&self, idx: usize) -> String {
        match idx {
            0 => self.start.clone(),
            _ => self.end.clone(),
        }
    }

    fn set_text(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.start = value,
            _ => self.end = value,
        }
    }
}

impl PeriodDraft {
    fn from_filters(filters: &SaleFilters) -> Self {
        let show = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        Self {
            start: show(filters.start_date),
            end: show(filters.end_date),
        }
    }

    fn parse(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
        let parse = |raw: &str, label: &str| {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| format!("Fecha {label} inválida: use AAAA-MM-DD"))
        };
        let start = parse(&self.start, "inicial")?;
        let end = parse(&self.end, "final")?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err("La fecha inicial no puede ser posterior a la final".into());
            }
        }
        Ok((start, end))
    }
}

fn write_report(sales: &[Sale], start: Option<NaiveDate>, end: Option<NaiveDate>) -> Notification {
    let Some(workbook) = sales_workbook(sales, &Local, sales_file_stem(start, end)) else {
        return Notification::warning("No hay ventas para exportar con los filtros seleccionados");
    };
    let rows = workbook.row_count();
    match CsvWorkbookWriter::new(".").write(&workbook) {
        Ok(_) => Notification::success(format!("Archivo descargado: {rows} filas exportadas")),
        Err(e) => {
            warn!(error = %e, "sales export failed");
            Notification::error(e.to_string())
        }
    }
}

fn period_label(filters: &SaleFilters) -> String {
    match (filters.start_date, filters.end_date) {
        (None, None) => "Todo el período".into(),
        (Some(s), None) => format!("Desde {s}"),
        (None, Some(e)) => format!("Hasta {e}"),
        (Some(s), Some(e)) => format!("{s} a {e}"),
    }
}

pub struct SalesScreen {
    actions: Actions,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    list: ListPage<Sale, SaleFilters>,
    cursor: TableCursor,
    detail: bool,
    period: Option<(PeriodDraft, Option<String>)>,
    editor: FieldEditor,
    exporting: bool,
    throbber: ThrobberState,
}

impl SalesScreen {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            action_tx: None,
            focused: false,
            list: ListPage::new(SALES_PAGE_LIMIT, "No hay ventas registradas"),
            cursor: TableCursor::default(),
            detail: false,
            period: None,
            editor: FieldEditor::default(),
            exporting: false,
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
            Action::SalesLoaded(ticket, actions.list_sales(page, limit, &filters).await)
        });
    }

    fn selected(&self) -> Option<&Sale> {
        self.list.rows().get(self.cursor.selected())
    }

    /// Confirm prompt for a pending sale, a warning for any other.
    fn status_change(&self, complete: bool) -> Option<Action> {
        let sale = self.selected()?;
        if sale.status != SaleStatus::Pending {
            return Some(Action::Notify(Notification::warning(
                "Solo las ventas pendientes pueden cambiar de estado",
            )));
        }
        let id = sale.id.clone();
        Some(Action::ShowConfirm(if complete {
            ConfirmAction::CompleteSale { id }
        } else {
            ConfirmAction::CancelSale { id }
        }))
    }

    fn export(&mut self) {
        if self.exporting {
            return;
        }
        self.exporting = true;
        let actions = self.actions.clone();
        let filters = self.list.filters().clone();
        spawn_send(self.action_tx.as_ref(), async move {
            let (start, end) = (filters.start_date, filters.end_date);
            let notification = match actions.sales_for_export(start, end).await.into_result() {
                Ok(sales) => write_report(&sales, start, end),
                Err((error, _)) => Notification::error(error),
            };
            Action::ExportFinished(ScreenId::Sales, notification)
        });
    }

    fn handle_period_key(&mut self, key: KeyEvent) {
        let Some((draft, error)) = self.period.as_mut() else {
            return;
        };
        match self.editor.handle_key(key, draft) {
            FieldOutcome::Cancel => self.period = None,
            FieldOutcome::Submit => match draft.parse() {
                Ok((start, end)) => {
                    self.period = None;
                    self.list.update_filters(|f| {
                        f.start_date = start;
                        f.end_date = end;
                    });
                }
                Err(msg) => *error = Some(msg),
            },
            FieldOutcome::Edited | FieldOutcome::Ignored => {}
        }
    }

    fn render_detail(frame: &mut Frame, area: Rect, sale: &Sale) {
        let height = u16::try_from(sale.products.len()).unwrap_or(20).min(20) + 10;
        let dialog = centered(area, 76, height);
        let title = format!("Venta {}", sale.order_label());
        let inner = overlay(frame, dialog, &title, theme::border_focused());

        let when = sale.created_at.as_ref().map_or_else(
            || "-".to_owned(),
            |at| format!("{} {}", format_date(at, &Local), format_time(at, &Local)),
        );
        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("  {:<18}", "Estado"), theme::label()),
                Span::styled(sale.status.label(), theme::sale_status(sale.status)),
            ]),
            field_line("Fecha", when),
            field_line("Pago", sale.payment_id.clone().unwrap_or_else(|| "-".into())),
            Line::from(""),
            Line::styled(
                format!("  {:<32}{:>6}{:>14}{:>14}", "Producto", "Cant.", "Precio", "Subtotal"),
                theme::table_header(),
            ),
        ];
        lines.extend(sale.products.iter().map(|item| {
            Line::styled(
                format!(
                    "  {:<32}{:>6}{:>14}{:>14}",
                    item.display_name(),
                    item.quantity,
                    format_price(item.price),
                    format_price(item.subtotal()),
                ),
                theme::value(),
            )
        }));
        lines.push(Line::from(""));
        lines.push(field_line("Total", format_price(sale.total)));
        lines.push(hint_line(&[("Esc", "cerrar"), ("c", "completar"), ("C", "cancelar")]));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for SalesScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.period.is_some() {
            self.handle_period_key(key);
            self.load();
            return Ok(None);
        }

        let len = self.list.rows().len();
        if self.cursor.handle_key(key, len) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc if self.detail => self.detail = false,
            KeyCode::Enter if self.selected().is_some() => self.detail = !self.detail,
            KeyCode::Char('s') => {
                let status = next_in(self.list.filters().status, &STATUSES);
                self.list.update_filters(|f| f.status = status);
            }
            KeyCode::Char('p') => {
                let draft = PeriodDraft::from_filters(self.list.filters());
                self.editor.reset(&draft);
                self.period = Some((draft, None));
            }
            KeyCode::Char('c') => return Ok(self.status_change(true)),
            KeyCode::Char('C') => return Ok(self.status_change(false)),
            KeyCode::Char('x') => self.export(),
            KeyCode::Char(']') => {
                self.list.next_page();
            }
            KeyCode::Char('[') => {
                self.list.prev_page();
            }
            KeyCode::Char('r') => self.list.refresh(),
            _ => {}
        }
        self.load();
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if self.list.is_loading() => self.throbber.calc_next(),
            Action::SalesLoaded(ticket, result) => {
                if let Some(error) = self.list.finish(*ticket, result.clone()) {
                    send(self.action_tx.as_ref(), Action::Notify(Notification::error(error)));
                }
                self.cursor.clamp(self.list.rows().len());
            }
            Action::ExportFinished(_, notification) => {
                self.exporting = false;
                return Ok(Some(Action::Notify(notification.clone())));
            }
            Action::Invalidated(View::Sales) => {
                self.list.refresh();
                self.load();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let filters = self.list.filters();
        let status = filters.status.map_or("Todas", SaleStatus::label);
        let title = format!(
            " Ventas ({}) · Estado: {status} · {} ",
            self.list.total(),
            period_label(filters)
        );
        let block = panel(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [summary, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let page = PageSalesStats::from_sales(self.list.rows());
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!(
                    "  En esta página: {} ventas · {} pendientes · {} completadas · {}",
                    page.total,
                    page.pending,
                    page.completed,
                    format_price(page.revenue)
                ),
                theme::section(),
            )),
            summary,
        );

        if self.list.is_loading() && self.list.rows().is_empty() {
            render_loading(frame, body, &self.throbber);
        } else if self.list.is_empty() {
            render_placeholder(frame, body, self.list.placeholder());
        } else {
            let header =
                Row::new(["Orden", "Fecha", "Artículos", "Total", "Estado"]).style(theme::table_header());
            let rows = self.list.rows().iter().map(|s| {
                Row::new([
                    Cell::from(s.order_label().to_owned()),
                    Cell::from(
                        s.created_at
                            .as_ref()
                            .map_or_else(String::new, |at| format_date(at, &Local)),
                    ),
                    Cell::from(s.item_count().to_string()),
                    Cell::from(format_price(s.total)),
                    Cell::from(Span::styled(s.status.label(), theme::sale_status(s.status))),
                ])
                .style(theme::table_row())
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(30),
                    Constraint::Percentage(18),
                    Constraint::Length(10),
                    Constraint::Percentage(20),
                    Constraint::Length(12),
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

        if let Some((draft, error)) = &self.period {
            self.editor
                .render(frame, area, draft, "Filtrar por fecha", error.as_deref(), false);
        } else if self.detail {
            if let Some(sale) = self.selected() {
                Self::render_detail(frame, area, sale);
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
        self.period.is_some()
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("s", "estado"),
            ("p", "período"),
            ("Enter", "detalle"),
            ("c", "completar"),
            ("C", "cancelar"),
            ("x", "exportar"),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn draft(start: &str, end: &str) -> PeriodDraft {
        PeriodDraft {
            start: start.into(),
            end: end.into(),
        }
    }

    #[test]
    fn blank_period_is_open_ended() {
        assert_eq!(draft("", " ").parse().unwrap(), (None, None));
    }

    #[test]
    fn period_parses_iso_dates() {
        let (start, end) = draft("2024-01-01", "2024-01-31").parse().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn period_rejects_bad_input() {
        assert!(draft("01/02/2024", "").parse().is_err());
        assert!(draft("2024-02-01", "2024-01-01").parse().is_err());
    }

    #[test]
    fn empty_report_warns_instead_of_writing() {
        let notice = write_report(&[], None, None);
        assert_eq!(notice.level, crate::action::NotificationLevel::Warning);
    }

    #[test]
    fn period_round_trips_through_filters() {
        let filters = SaleFilters {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..SaleFilters::default()
        };
        let d = PeriodDraft::from_filters(&filters);
        assert_eq!(d, draft("2024-03-01", ""));
        assert_eq!(period_label(&filters), "Desde 2024-03-01");
    }
}
