// ── List-page state machine ──
//
// idle → loading → (loaded | failed), re-entering loading whenever the
// page, the filters, or an explicit refresh changes. Responses carry the
// ticket of the load that requested them; anything older than the latest
// load is dropped.

use bodega_api::PageMeta;
use tracing::debug;

use crate::actions::Page;
use crate::result::ActionResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct ListPage<T, F> {
    page: u32,
    limit: u32,
    filters: F,
    rows: Vec<T>,
    meta: Option<PageMeta>,
    state: LoadState,
    generation: u64,
    dirty: bool,
    placeholder: &'static str,
}

impl<T, F: Default + PartialEq> ListPage<T, F> {
    /// A fresh page that needs its first load.
    pub fn new(limit: u32, placeholder: &'static str) -> Self {
        Self {
            page: 1,
            limit,
            filters: F::default(),
            rows: Vec::new(),
            meta: None,
            state: LoadState::Idle,
            generation: 0,
            dirty: true,
            placeholder,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Text shown instead of an empty table.
    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    /// No rows to show once loading settles.
    pub fn is_empty(&self) -> bool {
        !self.is_loading() && self.rows.is_empty()
    }

    pub fn total_pages(&self) -> u32 {
        self.meta.map_or(1, |m| m.total_pages.max(1))
    }

    pub fn total(&self) -> u64 {
        self.meta
            .map_or_else(|| u64::try_from(self.rows.len()).unwrap_or(u64::MAX), |m| m.total)
    }

    /// Pagination controls only make sense with more than one page.
    pub fn show_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        if page != self.page {
            self.page = page;
            self.dirty = true;
        }
    }

    pub fn next_page(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.set_page(self.page + 1);
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.set_page(self.page - 1);
            true
        } else {
            false
        }
    }

    /// Replace the filters. A real change goes back to page 1.
    pub fn set_filters(&mut self, filters: F) -> bool {
        if filters == self.filters {
            return false;
        }
        self.filters = filters;
        self.page = 1;
        self.dirty = true;
        true
    }

    /// Edit the filters in place; same semantics as [`Self::set_filters`].
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut F)) -> bool
    where
        F: Clone,
    {
        let mut next = self.filters.clone();
        edit(&mut next);
        self.set_filters(next)
    }

    pub fn refresh(&mut self) {
        self.dirty = true;
    }

    /// Page, filters, or refresh changed since the last `begin()`.
    pub fn needs_load(&self) -> bool {
        self.dirty
    }

    /// Enter `Loading` and hand out the ticket the response must present.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.dirty = false;
        self.state = LoadState::Loading;
        Ticket(self.generation)
    }

    /// Apply a response. Returns the error text once, for a notification.
    ///
    /// A stale ticket is ignored. A failure keeps the rows already shown.
    pub fn finish(&mut self, ticket: Ticket, result: ActionResult<Page<T>>) -> Option<String> {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "dropping stale page");
            return None;
        }
        match result {
            ActionResult::Success { data } => {
                self.meta = data.meta;
                self.rows = data.data.unwrap_or_default();
                self.state = LoadState::Loaded;
                None
            }
            ActionResult::Failure { error, .. } => {
                self.state = LoadState::Failed(error.clone());
                Some(error)
            }
        }
    }

    /// Mutable access to a loaded row, e.g. after a status toggle succeeded.
    pub fn row_mut(&mut self, pred: impl Fn(&T) -> bool) -> Option<&mut T> {
        self.rows.iter_mut().find(|r| pred(r))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bodega_api::ApiResponse;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::CoreError;
    use crate::model::{Category, CategoryFilters};

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn page_of(rows: Vec<Category>, total_pages: u32) -> ActionResult<Page<Category>> {
        let total = u64::try_from(rows.len()).unwrap();
        let mut resp = ApiResponse::ok(rows);
        resp.meta = Some(PageMeta {
            page: 1,
            limit: 100,
            total,
            total_pages,
        });
        ActionResult::success(resp)
    }

    #[test]
    fn starts_idle_and_dirty() {
        let list: ListPage<Category, CategoryFilters> = ListPage::new(100, "No hay categorías");
        assert_eq!(list.state(), &LoadState::Idle);
        assert!(list.needs_load());
    }

    #[test]
    fn loads_single_page_without_pagination() {
        let mut list: ListPage<Category, CategoryFilters> = ListPage::new(100, "No hay categorías");
        list.set_filters(CategoryFilters {
            search: Some("elec".into()),
        });
        let ticket = list.begin();
        assert!(list.is_loading());

        let err = list.finish(ticket, page_of(vec![category("1", "Electrónica")], 1));

        assert!(err.is_none());
        assert!(!list.is_loading());
        assert_eq!(list.rows(), &[category("1", "Electrónica")]);
        assert!(!list.show_pagination());
    }

    #[test]
    fn zero_rows_is_empty_not_loading() {
        let mut list: ListPage<Category, CategoryFilters> = ListPage::new(100, "No hay categorías");
        let ticket = list.begin();
        list.finish(ticket, page_of(vec![], 1));
        assert!(list.is_empty());
        assert_eq!(list.placeholder(), "No hay categorías");
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut list: ListPage<Category, CategoryFilters> = ListPage::new(100, "");
        let first = list.begin();
        list.set_filters(CategoryFilters {
            search: Some("b".into()),
        });
        let second = list.begin();

        list.finish(second, page_of(vec![category("2", "Bebidas")], 1));
        list.finish(first, page_of(vec![category("1", "Aseo")], 1));

        assert_eq!(list.rows(), &[category("2", "Bebidas")]);
    }

    #[test]
    fn failure_keeps_rows_and_reports_once() {
        let mut list: ListPage<Category, CategoryFilters> = ListPage::new(100, "");
        let ticket = list.begin();
        list.finish(ticket, page_of(vec![category("1", "Aseo")], 1));

        let ticket = list.begin();
        let err = list.finish(ticket, ActionResult::failure(&CoreError::NotAuthenticated));

        assert_eq!(err.as_deref(), Some("No autenticado"));
        assert_eq!(list.rows().len(), 1);
        assert_eq!(list.state(), &LoadState::Failed("No autenticado".into()));
    }

    #[test]
    fn filter_change_resets_page() {
        let mut list: ListPage<Category, CategoryFilters> = ListPage::new(10, "");
        let ticket = list.begin();
        list.finish(ticket, page_of(vec![category("1", "Aseo")], 3));

        assert!(list.show_pagination());
        assert!(list.next_page());
        assert_eq!(list.page(), 2);

        assert!(list.update_filters(|f| f.search = Some("x".into())));
        assert_eq!(list.page(), 1);
        assert!(list.needs_load());

        assert!(!list.update_filters(|f| f.search = Some("x".into())));
    }

    #[test]
    fn next_page_stops_at_last() {
        let mut list: ListPage<Category, CategoryFilters> = ListPage::new(10, "");
        let ticket = list.begin();
        list.finish(ticket, page_of(vec![], 1));
        assert!(!list.next_page());
        assert!(!list.prev_page());
    }
}
