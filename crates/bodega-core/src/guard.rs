// ── Route and role guard ──
//
// Which screens a role may open, and where a visitor lands instead.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::model::{Role, User};

/// A dashboard screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Route {
    Login,
    Home,
    Profile,
    Users,
    Products,
    Categories,
    Sales,
    Inventory,
}

/// Outcome of checking a route against the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

impl Route {
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Iniciar sesión",
            Self::Home => "Home",
            Self::Profile => "Mi Perfil",
            Self::Users => "Usuarios",
            Self::Products => "Productos",
            Self::Categories => "Categorías",
            Self::Sales => "Ventas",
            Self::Inventory => "Inventario",
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, Self::Login)
    }

    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::Login | Self::Home | Self::Profile => &[Role::Admin, Role::Seller, Role::Customer],
            Self::Users => &[Role::Admin],
            Self::Products | Self::Categories | Self::Sales | Self::Inventory => {
                &[Role::Admin, Role::Seller]
            }
        }
    }

    pub fn allows(self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

/// Decide whether `user` may open `route`.
///
/// The login screen bounces an existing session to Home. Every other route
/// needs a session, and a role the route allows.
pub fn route_decision(route: Route, user: Option<&User>) -> RouteDecision {
    match (route.is_public(), user) {
        (true, Some(_)) => RouteDecision::RedirectToHome,
        (true, None) => RouteDecision::Allow,
        (false, None) => RouteDecision::RedirectToLogin,
        (false, Some(u)) if route.allows(u.role) => RouteDecision::Allow,
        (false, Some(_)) => RouteDecision::RedirectToHome,
    }
}

/// Navigation entries visible to `role`, in menu order.
pub fn visible_routes(role: Role) -> Vec<Route> {
    Route::iter()
        .filter(|r| !r.is_public() && r.allows(role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::sample_user;

    #[test]
    fn login_redirects_when_already_signed_in() {
        let user = sample_user(Role::Customer);
        assert_eq!(route_decision(Route::Login, Some(&user)), RouteDecision::RedirectToHome);
        assert_eq!(route_decision(Route::Login, None), RouteDecision::Allow);
    }

    #[test]
    fn private_routes_need_a_session() {
        assert_eq!(route_decision(Route::Sales, None), RouteDecision::RedirectToLogin);
    }

    #[test]
    fn users_screen_is_admin_only() {
        let seller = sample_user(Role::Seller);
        let admin = sample_user(Role::Admin);
        assert_eq!(route_decision(Route::Users, Some(&seller)), RouteDecision::RedirectToHome);
        assert_eq!(route_decision(Route::Users, Some(&admin)), RouteDecision::Allow);
    }

    #[test]
    fn customers_only_see_home_and_profile() {
        assert_eq!(visible_routes(Role::Customer), vec![Route::Home, Route::Profile]);
        assert_eq!(visible_routes(Role::Seller).len(), 6);
        assert!(visible_routes(Role::Admin).contains(&Route::Users));
    }
}
