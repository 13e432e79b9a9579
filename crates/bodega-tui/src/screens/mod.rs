//! One component per back-office screen.

pub mod categories;
pub mod dashboard;
pub mod inventory;
pub mod login;
pub mod products;
pub mod profile;
pub mod sales;
pub mod users;

use std::future::Future;

use bodega_core::Actions;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;

/// Build every screen. Screens are rebuilt on login and logout so no state
/// survives a change of user.
pub fn create_screens(actions: &Actions, email: Option<String>) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Login, Box::new(login::LoginScreen::new(actions.clone(), email))),
        (ScreenId::Dashboard, Box::new(dashboard::DashboardScreen::new(actions.clone()))),
        (ScreenId::Profile, Box::new(profile::ProfileScreen::new(actions.clone()))),
        (ScreenId::Users, Box::new(users::UsersScreen::new(actions.clone()))),
        (ScreenId::Products, Box::new(products::ProductsScreen::new(actions.clone()))),
        (ScreenId::Categories, Box::new(categories::CategoriesScreen::new(actions.clone()))),
        (ScreenId::Sales, Box::new(sales::SalesScreen::new(actions.clone()))),
        (ScreenId::Inventory, Box::new(inventory::InventoryScreen::new(actions.clone()))),
    ]
}

/// Run `work` in the background and post the action it yields.
pub(crate) fn spawn_send<F>(tx: Option<&UnboundedSender<Action>>, work: F)
where
    F: Future<Output = Action> + Send + 'static,
{
    let Some(tx) = tx.cloned() else {
        return;
    };
    tokio::spawn(async move {
        let _ = tx.send(work.await);
    });
}

/// Filter stepping: no filter, then each option in order, then no filter.
pub(crate) fn next_in<T: PartialEq + Copy>(current: Option<T>, options: &[T]) -> Option<T> {
    let next = match current {
        None => 0,
        Some(value) => options.iter().position(|o| *o == value).map_or(0, |i| i + 1),
    };
    options.get(next).copied()
}

pub(crate) fn send(tx: Option<&UnboundedSender<Action>>, action: Action) {
    if let Some(tx) = tx {
        let _ = tx.send(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_step_through_options_then_clear() {
        let opts = [1, 2];
        assert_eq!(next_in(None, &opts), Some(1));
        assert_eq!(next_in(Some(1), &opts), Some(2));
        assert_eq!(next_in(Some(2), &opts), None);
        assert_eq!(next_in(Some(9), &opts), Some(1));
        assert_eq!(next_in::<u8>(None, &[]), None);
    }
}
