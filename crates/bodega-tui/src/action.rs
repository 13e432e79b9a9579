//! Every state change in the TUI travels through the app loop as an Action.

use std::fmt;

use bodega_core::ui::Ticket;
use bodega_core::{
    ActionResult, Category, InventoryItem, InventoryStats, Kardex, Page, Product, Sale, SalesStats,
    User, UserStats, View,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast shown in the corner for a few seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    /// Success text on success, the action's error otherwise.
    pub fn from_result(result: &ActionResult<String>) -> Self {
        match result {
            ActionResult::Success { data } => Self::success(data.clone()),
            ActionResult::Failure { error, .. } => Self::error(error.clone()),
        }
    }
}

/// Destructive operations wait here for a yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteCategory { id: String, name: String },
    DeactivateUser { id: String, name: String },
    DeleteUser { id: String, name: String },
    CompleteSale { id: String },
    CancelSale { id: String },
    Logout,
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteCategory { name, .. } => {
                write!(f, "¿Estás seguro de eliminar la categoría \"{name}\"?")
            }
            Self::DeactivateUser { name, .. } => {
                write!(f, "¿Estás seguro de desactivar a {name}?")
            }
            Self::DeleteUser { name, .. } => {
                write!(f, "¿Eliminar permanentemente a {name}?")
            }
            Self::CompleteSale { .. } => f.write_str("¿Marcar esta venta como completada?"),
            Self::CancelSale { .. } => f.write_str("¿Cancelar esta venta?"),
            Self::Logout => f.write_str("¿Estás seguro de cerrar sesión?"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),

    // ── Session ───────────────────────────────────────────────────
    LoginFinished(ActionResult<User>),
    LoggedIn(User),
    /// A mutation made these views stale.
    Invalidated(View),

    // ── Loads (spawned tasks report back here) ────────────────────
    DashboardLoaded {
        sales: ActionResult<SalesStats>,
        inventory: Option<ActionResult<InventoryStats>>,
    },
    CategoriesLoaded(Ticket, ActionResult<Page<Category>>),
    CategoryOptions(ActionResult<Vec<Category>>),
    ProductsLoaded(Ticket, ActionResult<Page<Product>>),
    UsersLoaded(Ticket, ActionResult<Page<User>>),
    UserStatsLoaded(ActionResult<UserStats>),
    SalesLoaded(Ticket, ActionResult<Page<Sale>>),
    InventoryLoaded {
        items: ActionResult<Vec<InventoryItem>>,
        stats: ActionResult<InventoryStats>,
    },
    MovementsLoaded(Ticket, ActionResult<Page<Kardex>>),
    ProfileLoaded(ActionResult<User>),

    // ── Forms and search ──────────────────────────────────────────
    /// Search text that survived the debounce interval.
    SearchCommitted(ScreenId, String),
    /// A dialog's submit came back; success carries the toast text.
    FormSaved(ScreenId, ActionResult<String>),
    /// A spreadsheet export finished, one way or another.
    ExportFinished(ScreenId, Notification),

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Help and notifications ────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
}

impl Action {
    /// The screen a result belongs to, whichever screen is showing.
    pub fn target(&self) -> Option<ScreenId> {
        match self {
            Self::LoginFinished(_) => Some(ScreenId::Login),
            Self::DashboardLoaded { .. } => Some(ScreenId::Dashboard),
            Self::CategoriesLoaded(..) => Some(ScreenId::Categories),
            Self::ProductsLoaded(..) | Self::CategoryOptions(_) => Some(ScreenId::Products),
            Self::UsersLoaded(..) | Self::UserStatsLoaded(_) => Some(ScreenId::Users),
            Self::SalesLoaded(..) => Some(ScreenId::Sales),
            Self::InventoryLoaded { .. } | Self::MovementsLoaded(..) => Some(ScreenId::Inventory),
            Self::ProfileLoaded(_) => Some(ScreenId::Profile),
            Self::SearchCommitted(screen, _)
            | Self::FormSaved(screen, _)
            | Self::ExportFinished(screen, _) => Some(*screen),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use bodega_core::CoreError;

    use super::*;

    #[test]
    fn results_find_their_screen() {
        let done = Action::FormSaved(ScreenId::Users, ActionResult::success("ok".into()));
        assert_eq!(done.target(), Some(ScreenId::Users));
        assert_eq!(
            Action::CategoryOptions(ActionResult::success(vec![])).target(),
            Some(ScreenId::Products)
        );
        assert_eq!(Action::Tick.target(), None);
    }

    #[test]
    fn toast_follows_the_result() {
        let ok = Notification::from_result(&ActionResult::success("Listo".into()));
        assert_eq!(ok, Notification::success("Listo"));

        let err = Notification::from_result(&ActionResult::failure(&CoreError::NotAuthenticated));
        assert_eq!(err.level, NotificationLevel::Error);
        assert_eq!(err.message, "No autenticado");
    }

    #[test]
    fn confirm_prompts_name_the_target() {
        let prompt = ConfirmAction::DeleteCategory {
            id: "c1".into(),
            name: "Aseo".into(),
        }
        .to_string();
        assert_eq!(prompt, "¿Estás seguro de eliminar la categoría \"Aseo\"?");
    }
}
