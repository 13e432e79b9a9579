//! Screen identifiers and their place in the tab bar.

use std::fmt;

use bodega_core::{Role, Route, visible_routes};

/// One per route of the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Login,
    Dashboard,
    Profile,
    Users,
    Products,
    Categories,
    Sales,
    Inventory,
}

impl ScreenId {
    pub const ALL: [ScreenId; 8] = [
        Self::Login,
        Self::Dashboard,
        Self::Profile,
        Self::Users,
        Self::Products,
        Self::Categories,
        Self::Sales,
        Self::Inventory,
    ];

    pub fn route(self) -> Route {
        match self {
            Self::Login => Route::Login,
            Self::Dashboard => Route::Home,
            Self::Profile => Route::Profile,
            Self::Users => Route::Users,
            Self::Products => Route::Products,
            Self::Categories => Route::Categories,
            Self::Sales => Route::Sales,
            Self::Inventory => Route::Inventory,
        }
    }

    pub fn from_route(route: Route) -> Self {
        match route {
            Route::Login => Self::Login,
            Route::Home => Self::Dashboard,
            Route::Profile => Self::Profile,
            Route::Users => Self::Users,
            Route::Products => Self::Products,
            Route::Categories => Self::Categories,
            Route::Sales => Self::Sales,
            Route::Inventory => Self::Inventory,
        }
    }

    pub fn label(self) -> &'static str {
        self.route().title()
    }

    /// Compact label for narrow terminals (< 100 cols).
    pub fn label_short(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Home",
            Self::Profile => "Perfil",
            Self::Users => "Usr",
            Self::Products => "Prod",
            Self::Categories => "Cat",
            Self::Sales => "Vtas",
            Self::Inventory => "Inv",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tabs a role sees, in navigation order. Logged out, only the login form.
pub fn tabs_for(role: Option<Role>) -> Vec<ScreenId> {
    role.map_or_else(
        || vec![ScreenId::Login],
        |role| {
            visible_routes(role)
                .into_iter()
                .map(ScreenId::from_route)
                .collect()
        },
    )
}

/// Screen behind number key `n` (1-based).
pub fn tab_by_number(tabs: &[ScreenId], n: u8) -> Option<ScreenId> {
    usize::from(n).checked_sub(1).and_then(|i| tabs.get(i)).copied()
}

/// Neighbor of `current` in `tabs`, wrapping around.
pub fn cycle(tabs: &[ScreenId], current: ScreenId, forward: bool) -> ScreenId {
    if tabs.is_empty() {
        return current;
    }
    let idx = tabs.iter().position(|&s| s == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % tabs.len()
    } else {
        (idx + tabs.len() - 1) % tabs.len()
    };
    tabs[next]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_route_maps_back_to_its_screen() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_route(id.route()), id);
        }
    }

    #[test]
    fn customers_get_two_tabs() {
        let tabs = tabs_for(Some(Role::Customer));
        assert_eq!(tabs, vec![ScreenId::Dashboard, ScreenId::Profile]);
        assert_eq!(tab_by_number(&tabs, 2), Some(ScreenId::Profile));
        assert_eq!(tab_by_number(&tabs, 3), None);
        assert_eq!(tab_by_number(&tabs, 0), None);
    }

    #[test]
    fn logged_out_only_sees_login() {
        assert_eq!(tabs_for(None), vec![ScreenId::Login]);
    }

    #[test]
    fn cycling_wraps_both_ways() {
        let tabs = tabs_for(Some(Role::Seller));
        let last = *tabs.last().unwrap();
        assert_eq!(cycle(&tabs, last, true), tabs[0]);
        assert_eq!(cycle(&tabs, tabs[0], false), last);
        assert!(!tabs.contains(&ScreenId::Users));
    }
}
