//! Products: paginated catalog with debounced search, status and category
//! filters, the seller's own listing, and the product form.

use bodega_core::ui::{
    Debouncer, FormDialog, ListPage, ProductDraft, SEARCH_DEBOUNCE, Submission, normalize_search,
};
use bodega_core::{
    Actions, ActionResult, Category, PRODUCT_PAGE_LIMIT, Product, ProductFilters, View,
    format_price,
};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::forms::PRODUCT_CATEGORY_FIELD;
use crate::screen::ScreenId;
use crate::screens::{next_in, send, spawn_send};
use crate::theme;
use crate::widgets::field::{Choice, FieldEditor, FieldOutcome, yes_no};
use crate::widgets::search::{SearchBox, SearchEvent};
use crate::widgets::{
    TableCursor, centered, field_line, hint_line, overlay, page_label, panel, render_loading,
    render_placeholder,
};

fn status_label(status: Option<bool>) -> &'static str {
    match status {
        None => "Todos",
        Some(true) => "Activos",
        Some(false) => "Inactivos",
    }
}

/// Steps through `None` and then each category id in order.
fn next_category(current: Option<&str>, categories: &[Category]) -> Option<String> {
    let next = match current {
        None => 0,
        Some(id) => categories.iter().position(|c| c.id == id).map_or(0, |i| i + 1),
    };
    categories.get(next).map(|c| c.id.clone())
}

pub struct ProductsScreen {
    actions: Actions,
    action_tx: Option<UnboundedSender<Action>>,
    debouncer: Option<Debouncer<Action>>,
    focused: bool,
    list: ListPage<Product, ProductFilters>,
    /// Only the signed-in seller's products.
    mine: bool,
    categories: Vec<Category>,
    categories_loaded: bool,
    cursor: TableCursor,
    search: SearchBox,
    form: FormDialog<ProductDraft>,
    editor: FieldEditor,
    detail: bool,
    throbber: ThrobberState,
}

impl ProductsScreen {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            action_tx: None,
            debouncer: None,
            focused: false,
            list: ListPage::new(PRODUCT_PAGE_LIMIT, "No hay productos registrados"),
            mine: false,
            categories: Vec::new(),
            categories_loaded: false,
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
        if !self.categories_loaded {
            self.categories_loaded = true;
            let actions = self.actions.clone();
            spawn_send(self.action_tx.as_ref(), async move {
                Action::CategoryOptions(actions.all_categories().await)
            });
        }
        if !self.list.needs_load() {
            return;
        }
        let ticket = self.list.begin();
        let actions = self.actions.clone();
        let (page, limit, mine) = (self.list.page(), self.list.limit(), self.mine);
        let filters = self.list.filters().clone();
        spawn_send(self.action_tx.as_ref(), async move {
            let result = if mine {
                actions.my_products(page, limit).await
            } else {
                actions.list_products(page, limit, &filters).await
            };
            Action::ProductsLoaded(ticket, result)
        });
    }

    fn selected(&self) -> Option<&Product> {
        self.list.rows().get(self.cursor.selected())
    }

    fn category_name(&self, product: &Product) -> String {
        let id = product.category_id.id();
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map_or_else(|| product.category_id.label().to_owned(), |c| c.name.clone())
    }

    fn submit(&mut self) {
        let Some(submission) = self.form.begin_submit() else {
            return;
        };
        let actions = self.actions.clone();
        spawn_send(self.action_tx.as_ref(), async move {
            let result = match submission {
                Submission::Create(data) => actions
                    .create_product(&data)
                    .await
                    .map(|_| "¡Producto creado exitosamente!".to_owned()),
                Submission::Update { id, data } => actions
                    .update_product(&id, &data)
                    .await
                    .map(|_| "¡Producto actualizado exitosamente!".to_owned()),
            };
            Action::FormSaved(ScreenId::Products, result)
        });
    }

    fn toggle_status(&self) {
        let Some(product) = self.selected() else {
            return;
        };
        let (id, status) = (product.id.clone(), !product.status);
        let actions = self.actions.clone();
        spawn_send(self.action_tx.as_ref(), async move {
            let message = if status {
                "Producto activado exitosamente"
            } else {
                "Producto desactivado exitosamente"
            };
            let result = actions
                .toggle_product_status(&id, status)
                .await
                .map(|_| message.to_owned());
            Action::Notify(Notification::from_result(&result))
        });
    }

    fn open_form(&mut self, product: Option<Product>) {
        self.detail = false;
        match product {
            Some(p) => self.form.open_edit(p.id.clone(), &p),
            None => self.form.open_create(),
        }
        self.editor.reset(self.form.draft());
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
                    debouncer.push(Action::SearchCommitted(ScreenId::Products, text));
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

    fn filter_summary(&self) -> String {
        if self.mine {
            return "Mis productos".into();
        }
        let filters = self.list.filters();
        let category = filters
            .category_id
            .as_deref()
            .and_then(|id| self.categories.iter().find(|c| c.id == id))
            .map_or("Todas", |c| c.name.as_str());
        format!(
            "Estado: {} · Categoría: {category}",
            status_label(filters.status)
        )
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, p: &Product) {
        let dialog = centered(area, 70, 15);
        let inner = overlay(frame, dialog, &p.name, theme::border_focused());
        let status = Span::styled(
            if p.status { "Activo" } else { "Inactivo" },
            theme::active(p.status),
        );
        frame.render_widget(
            Paragraph::new(vec![
                field_line("Descripción", p.description.clone()),
                field_line("Categoría", self.category_name(p)),
                field_line("Costo", format_price(p.cost)),
                field_line("Precio", format_price(p.price)),
                field_line("Descuento", format!("{}%", p.discount)),
                field_line("Precio final", format_price(p.final_price())),
                field_line("Stock", p.stock.to_string()),
                Line::from(vec![Span::styled(format!("  {:<18}", "Estado"), theme::label()), status]),
                field_line("Imagen", p.image_url.clone()),
                Line::from(""),
                hint_line(&[("Esc", "cerrar"), ("e", "editar"), ("t", "activar/desactivar")]),
            ]),
            inner,
        );
    }
}

impl Component for ProductsScreen {
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
            KeyCode::Char('/') if !self.mine => self.search.open(),
            KeyCode::Char('s') if !self.mine => {
                let status = next_in(self.list.filters().status, &[true, false]);
                self.list.update_filters(|f| f.status = status);
            }
            KeyCode::Char('c') if !self.mine => {
                let category =
                    next_category(self.list.filters().category_id.as_deref(), &self.categories);
                self.list.update_filters(|f| f.category_id = category);
            }
            KeyCode::Char('m') => {
                self.mine = !self.mine;
                self.list.set_page(1);
                self.list.refresh();
            }
            KeyCode::Char('n') => self.open_form(None),
            KeyCode::Char('e') => {
                let product = self.selected().cloned();
                if product.is_some() {
                    self.open_form(product);
                }
            }
            KeyCode::Char('t') => self.toggle_status(),
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
            Action::ProductsLoaded(ticket, result) => {
                if let Some(error) = self.list.finish(*ticket, result.clone()) {
                    send(self.action_tx.as_ref(), Action::Notify(Notification::error(error)));
                }
                self.cursor.clamp(self.list.rows().len());
            }
            Action::CategoryOptions(result) => match result {
                ActionResult::Success { data } => {
                    self.categories.clone_from(data);
                    let choices = data
                        .iter()
                        .map(|c| Choice {
                            id: c.id.clone(),
                            label: c.name.clone(),
                        })
                        .collect();
                    self.editor.set_choices(PRODUCT_CATEGORY_FIELD, choices);
                }
                ActionResult::Failure { error, .. } => {
                    self.categories_loaded = false;
                    return Ok(Some(Action::Notify(Notification::error(error.clone()))));
                }
            },
            Action::SearchCommitted(ScreenId::Products, text) => self.apply_search(text),
            Action::FormSaved(ScreenId::Products, result) => {
                if self.form.submit_result(result) {
                    return Ok(Some(Action::Notify(Notification::from_result(result))));
                }
            }
            Action::Invalidated(view) => {
                if View::Products.is_affected_by(view) {
                    self.list.refresh();
                    self.load();
                } else if *view == View::Categories {
                    self.categories_loaded = false;
                    self.load();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Productos ({}) · {} ", self.list.total(), self.filter_summary());
        let block = panel(title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [search, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);
        self.search.render(frame, search, "Buscar productos…");

        if self.list.is_loading() && self.list.rows().is_empty() {
            render_loading(frame, body, &self.throbber);
        } else if self.list.is_empty() {
            render_placeholder(frame, body, self.list.placeholder());
        } else {
            let header = Row::new(["Nombre", "Categoría", "Precio", "Desc.", "Final", "Stock", "Estado"])
                .style(theme::table_header());
            let rows = self.list.rows().iter().map(|p| {
                Row::new([
                    Cell::from(p.name.clone()),
                    Cell::from(self.category_name(p)),
                    Cell::from(format_price(p.price)),
                    Cell::from(format!("{}%", p.discount)),
                    Cell::from(format_price(p.final_price())),
                    Cell::from(p.stock.to_string()),
                    Cell::from(Span::styled(yes_no(p.status), theme::active(p.status))),
                ])
                .style(theme::table_row())
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(26),
                    Constraint::Percentage(18),
                    Constraint::Percentage(14),
                    Constraint::Length(7),
                    Constraint::Percentage(14),
                    Constraint::Length(7),
                    Constraint::Length(7),
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
                "Editar producto"
            } else {
                "Nuevo producto"
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
            if let Some(product) = self.selected() {
                self.render_detail(frame, area, product);
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
            ("s", "estado"),
            ("c", "categoría"),
            ("m", "mis productos"),
            ("n", "nuevo"),
            ("e", "editar"),
            ("t", "activar"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn category(id: &str) -> Category {
        Category {
            id: id.into(),
            name: id.to_uppercase(),
            description: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn status_filter_cycles_back_to_all() {
        let mut status = None;
        let mut seen = Vec::new();
        for _ in 0..3 {
            status = next_in(status, &[true, false]);
            seen.push(status_label(status));
        }
        assert_eq!(seen, ["Activos", "Inactivos", "Todos"]);
    }

    #[test]
    fn category_filter_walks_the_list_then_clears() {
        let cats = [category("a"), category("b")];
        assert_eq!(next_category(None, &cats).as_deref(), Some("a"));
        assert_eq!(next_category(Some("a"), &cats).as_deref(), Some("b"));
        assert_eq!(next_category(Some("b"), &cats), None);
        assert_eq!(next_category(Some("gone"), &cats).as_deref(), Some("a"));
        assert_eq!(next_category(None, &[]), None);
    }
}
