//! Inventory: stock per product with health coloring, the movement ledger
//! of one product, stock adjustments, and the two-sheet CSV report.

use bodega_core::export::{
    CsvWorkbookWriter, SpreadsheetWriter, inventory_file_stem, inventory_workbook,
};
use bodega_core::ui::{KardexDraft, ListPage, StockLevel};
use bodega_core::{
    Actions, ActionResult, InventoryItem, InventoryStats, KARDEX_PAGE_LIMIT, Kardex,
    KardexExportItem, KardexFilters, View, format_date, format_price, format_time,
};
use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::screens::{send, spawn_send};
use crate::theme;
use crate::widgets::field::{FieldEditor, FieldOutcome};
use crate::widgets::search::{SearchBox, SearchEvent};
use crate::widgets::{TableCursor, page_label, panel, render_loading, render_placeholder};

/// Items whose product name contains `query`, ignoring case.
fn matching<'a>(items: &'a [InventoryItem], query: &str) -> Vec<&'a InventoryItem> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|i| query.is_empty() || i.product.name.to_lowercase().contains(&query))
        .collect()
}

fn write_report(items: &[InventoryItem], movements: &[KardexExportItem]) -> Notification {
    let workbook = inventory_workbook(items, movements, &Local, inventory_file_stem(None, None));
    match CsvWorkbookWriter::new(".").write(&workbook) {
        Ok(_) => Notification::success(format!(
            "Archivo descargado exitosamente con {} hojas",
            workbook.sheets.len()
        )),
        Err(e) => {
            warn!(error = %e, "inventory export failed");
            Notification::error(e.to_string())
        }
    }
}

/// Movement ledger of the product picked with Enter.
struct Movements {
    product_id: String,
    product_name: String,
    list: ListPage<Kardex, KardexFilters>,
    cursor: TableCursor,
}

struct Adjustment {
    product_name: String,
    draft: KardexDraft,
    error: Option<String>,
    busy: bool,
}

pub struct InventoryScreen {
    actions: Actions,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    stale: bool,
    loading: bool,
    items: Vec<InventoryItem>,
    stats: Option<InventoryStats>,
    cursor: TableCursor,
    search: SearchBox,
    movements: Option<Movements>,
    adjust: Option<Adjustment>,
    editor: FieldEditor,
    exporting: bool,
    throbber: ThrobberState,
}

impl InventoryScreen {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            action_tx: None,
            focused: false,
            stale: true,
            loading: false,
            items: Vec::new(),
            stats: None,
            cursor: TableCursor::default(),
            search: SearchBox::default(),
            movements: None,
            adjust: None,
            editor: FieldEditor::default(),
            exporting: false,
            throbber: ThrobberState::default(),
        }
    }

    fn load(&mut self) {
        if !self.focused || self.action_tx.is_none() {
            return;
        }
        if self.stale && !self.loading {
            self.stale = false;
            self.loading = true;
            let actions = self.actions.clone();
            spawn_send(self.action_tx.as_ref(), async move {
                let (items, stats) = tokio::join!(actions.inventory(), actions.inventory_stats());
                Action::InventoryLoaded { items, stats }
            });
        }
        self.load_movements();
    }

    fn load_movements(&mut self) {
        let Some(m) = self.movements.as_mut() else {
            return;
        };
        if !m.list.needs_load() {
            return;
        }
        let ticket = m.list.begin();
        let actions = self.actions.clone();
        let product_id = m.product_id.clone();
        let (page, limit) = (m.list.page(), m.list.limit());
        let filters = m.list.filters().clone();
        spawn_send(self.action_tx.as_ref(), async move {
            Action::MovementsLoaded(
                ticket,
                actions
                    .kardex_by_product(&product_id, page, limit, &filters)
                    .await,
            )
        });
    }

    fn visible(&self) -> Vec<&InventoryItem> {
        matching(&self.items, self.search.value())
    }

    fn selected(&self) -> Option<&InventoryItem> {
        self.visible().get(self.cursor.selected()).copied()
    }

    fn open_movements(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        self.movements = Some(Movements {
            product_id: item.product.id.clone(),
            product_name: item.product.name.clone(),
            list: ListPage::new(KARDEX_PAGE_LIMIT, "No hay movimientos registrados"),
            cursor: TableCursor::default(),
        });
        self.load_movements();
    }

    fn open_adjust(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        let adjustment = Adjustment {
            product_name: item.product.name.clone(),
            draft: KardexDraft::for_item(item),
            error: None,
            busy: false,
        };
        self.editor.reset(&adjustment.draft);
        self.adjust = Some(adjustment);
    }

    fn submit_adjust(&mut self) {
        let Some(adj) = self.adjust.as_mut() else {
            return;
        };
        if adj.busy {
            return;
        }
        let data = match adj.draft.to_create() {
            Ok(data) => data,
            Err(e) => {
                adj.error = Some(e.to_string());
                return;
            }
        };
        adj.busy = true;
        adj.error = None;
        let name = adj.product_name.clone();
        let actions = self.actions.clone();
        spawn_send(self.action_tx.as_ref(), async move {
            let result = actions
                .create_kardex(&data)
                .await
                .map(|k| format!("Movimiento registrado: {name} → stock {}", k.stock));
            Action::FormSaved(ScreenId::Inventory, result)
        });
    }

    fn handle_adjust_key(&mut self, key: KeyEvent) {
        let Some(adj) = self.adjust.as_mut() else {
            return;
        };
        if adj.busy {
            return;
        }
        match self.editor.handle_key(key, &mut adj.draft) {
            FieldOutcome::Submit => self.submit_adjust(),
            FieldOutcome::Cancel => self.adjust = None,
            FieldOutcome::Edited | FieldOutcome::Ignored => {}
        }
    }

    fn export(&mut self) {
        if self.exporting {
            return;
        }
        self.exporting = true;
        let actions = self.actions.clone();
        spawn_send(self.action_tx.as_ref(), async move {
            let (items, movements) =
                tokio::join!(actions.inventory(), actions.kardex_for_export(None, None));
            let notification = match (items.into_result(), movements.into_result()) {
                (Ok(items), Ok(movements)) => write_report(&items, &movements),
                (Err((error, _)), _) | (_, Err((error, _))) => Notification::error(error),
            };
            Action::ExportFinished(ScreenId::Inventory, notification)
        });
    }

    fn handle_movements_key(&mut self, key: KeyEvent) -> bool {
        let Some(m) = self.movements.as_mut() else {
            return false;
        };
        let len = m.list.rows().len();
        if m.cursor.handle_key(key, len) {
            return true;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.movements = None,
            KeyCode::Char(']') => {
                m.list.next_page();
            }
            KeyCode::Char('[') => {
                m.list.prev_page();
            }
            _ => return false,
        }
        self.load_movements();
        true
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let Some(stats) = &self.stats else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(format!("  {} productos", stats.total_products), theme::section()),
            Span::styled(format!(" · {} unidades", stats.total_stock), theme::value()),
            Span::styled(
                format!(" · {} stock bajo", stats.low_stock),
                Style::default().fg(theme::AMBER),
            ),
            Span::styled(
                format!(" · {} sin stock", stats.out_of_stock),
                Style::default().fg(theme::RED),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_items(&self, frame: &mut Frame, area: Rect) {
        let visible = self.visible();
        if self.loading && self.items.is_empty() {
            render_loading(frame, area, &self.throbber);
            return;
        }
        if visible.is_empty() {
            render_placeholder(frame, area, "No hay productos en inventario");
            return;
        }
        let header = Row::new(["Producto", "Precio", "Stock", "Estado", "Último movimiento"])
            .style(theme::table_header());
        let rows = visible.iter().map(|item| {
            let level = StockLevel::for_stock(item.current_stock);
            let last = item
                .last_movement
                .as_ref()
                .and_then(|k| k.created_at.as_ref())
                .map_or_else(|| "Sin movimientos".to_owned(), |at| format_date(at, &Local));
            Row::new([
                Cell::from(item.product.name.clone()),
                Cell::from(format_price(item.product.price)),
                Cell::from(Span::styled(item.current_stock.to_string(), theme::stock(level))),
                Cell::from(Span::styled(level.label(), theme::stock(level))),
                Cell::from(last),
            ])
            .style(theme::table_row())
        });
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(34),
                Constraint::Percentage(16),
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Percentage(20),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());
        let mut state = self.cursor.state();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_movements(&self, frame: &mut Frame, area: Rect, m: &Movements) {
        let block = panel(format!(" Movimientos · {} ", m.product_name), true);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        if m.list.is_loading() && m.list.rows().is_empty() {
            render_loading(frame, body, &self.throbber);
        } else if m.list.is_empty() {
            render_placeholder(frame, body, m.list.placeholder());
        } else {
            let header = Row::new(["Fecha", "Hora", "Comentario", "Cantidad", "Stock"])
                .style(theme::table_header());
            let rows = m.list.rows().iter().map(|k| {
                let (date, time) = k.created_at.as_ref().map_or_else(
                    || (String::new(), String::new()),
                    |at| (format_date(at, &Local), format_time(at, &Local)),
                );
                let qty_style = Style::default().fg(if k.quantity < 0 {
                    theme::RED
                } else {
                    theme::GREEN
                });
                Row::new([
                    Cell::from(date),
                    Cell::from(time),
                    Cell::from(k.comment.clone()),
                    Cell::from(Span::styled(format!("{:+}", k.quantity), qty_style)),
                    Cell::from(k.stock.to_string()),
                ])
                .style(theme::table_row())
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Length(11),
                    Constraint::Length(9),
                    Constraint::Min(10),
                    Constraint::Length(9),
                    Constraint::Length(7),
                ],
            )
            .header(header)
            .row_highlight_style(theme::table_selected());
            let mut state = m.cursor.state();
            frame.render_stateful_widget(table, body, &mut state);
        }

        if m.list.show_pagination() {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    format!(
                        "  {}",
                        page_label(m.list.page(), m.list.total_pages(), m.list.total())
                    ),
                    theme::label(),
                )),
                footer,
            );
        }
    }
}

impl Component for InventoryScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.adjust.is_some() {
            self.handle_adjust_key(key);
            return Ok(None);
        }
        if self.search.is_active() {
            if self.search.handle_key(key) != SearchEvent::Ignored {
                self.cursor.clamp(self.visible().len());
            }
            return Ok(None);
        }
        if self.handle_movements_key(key) {
            return Ok(None);
        }

        let len = self.visible().len();
        if self.cursor.handle_key(key, len) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter => self.open_movements(),
            KeyCode::Char('/') => self.search.open(),
            KeyCode::Char('a') => self.open_adjust(),
            KeyCode::Char('x') => self.export(),
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
            Action::Tick => {
                let movements_loading = self.movements.as_ref().is_some_and(|m| m.list.is_loading());
                if self.loading || movements_loading {
                    self.throbber.calc_next();
                }
            }
            Action::InventoryLoaded { items, stats } => {
                self.loading = false;
                match items {
                    ActionResult::Success { data } => self.items.clone_from(data),
                    ActionResult::Failure { error, .. } => {
                        send(
                            self.action_tx.as_ref(),
                            Action::Notify(Notification::error(error.clone())),
                        );
                    }
                }
                if let ActionResult::Success { data } = stats {
                    self.stats = Some(*data);
                }
                self.cursor.clamp(self.visible().len());
            }
            Action::MovementsLoaded(ticket, result) => {
                if let Some(m) = self.movements.as_mut() {
                    if let Some(error) = m.list.finish(*ticket, result.clone()) {
                        send(self.action_tx.as_ref(), Action::Notify(Notification::error(error)));
                    }
                    m.cursor.clamp(m.list.rows().len());
                }
            }
            Action::FormSaved(ScreenId::Inventory, result) => match result {
                ActionResult::Success { .. } => {
                    self.adjust = None;
                    return Ok(Some(Action::Notify(Notification::from_result(result))));
                }
                ActionResult::Failure { error, .. } => {
                    if let Some(adj) = self.adjust.as_mut() {
                        adj.busy = false;
                        adj.error = Some(error.clone());
                    }
                }
            },
            Action::ExportFinished(ScreenId::Inventory, notification) => {
                self.exporting = false;
                return Ok(Some(Action::Notify(notification.clone())));
            }
            Action::Invalidated(View::Inventory | View::Products) => {
                self.stale = true;
                if let Some(m) = self.movements.as_mut() {
                    m.list.refresh();
                }
                self.load();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" Inventario ".into(), self.focused && self.movements.is_none());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [stats, search, body] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);
        self.render_stats(frame, stats);
        self.search.render(frame, search, "Filtrar por producto…");

        match &self.movements {
            Some(m) => {
                let [items, ledger] =
                    Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)])
                        .areas(body);
                self.render_items(frame, items);
                self.render_movements(frame, ledger, m);
            }
            None => self.render_items(frame, body),
        }

        if let Some(adj) = &self.adjust {
            let title = format!(
                "Ajustar stock · {} (actual {})",
                adj.product_name, adj.draft.current_stock
            );
            self.editor
                .render(frame, area, &adj.draft, &title, adj.error.as_deref(), adj.busy);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.load();
        }
    }

    fn captures_input(&self) -> bool {
        self.adjust.is_some() || self.search.is_active()
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("/", "filtrar"),
            ("Enter", "movimientos"),
            ("a", "ajustar"),
            ("x", "exportar"),
            ("r", "actualizar"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use bodega_core::{CategoryRef, Product};

    use super::*;

    fn item(name: &str, stock: i64) -> InventoryItem {
        InventoryItem {
            product: Product {
                id: name.to_lowercase(),
                name: name.into(),
                description: String::new(),
                image_url: String::new(),
                cost: 0.0,
                price: 1000.0,
                stock,
                discount: 0.0,
                status: true,
                category_id: CategoryRef::default(),
                created_at: None,
                updated_at: None,
            },
            current_stock: stock,
            last_movement: None,
        }
    }

    #[test]
    fn filter_ignores_case_and_blank_queries() {
        let items = [item("Arroz", 5), item("Aceite", 0), item("Sal", 30)];
        assert_eq!(matching(&items, "  ").len(), 3);
        let hits: Vec<_> = matching(&items, "A").iter().map(|i| i.product.name.as_str()).collect();
        assert_eq!(hits, ["Arroz", "Aceite", "Sal"]);
        let hits: Vec<_> = matching(&items, "ace").iter().map(|i| i.product.name.as_str()).collect();
        assert_eq!(hits, ["Aceite"]);
    }
}
