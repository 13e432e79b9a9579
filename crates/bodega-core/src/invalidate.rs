// ── Refetch-after-mutation signal ──
//
// Mutating actions publish the views whose data they changed. Screens
// subscribe and refetch; nothing is cached locally beyond that.

use std::fmt;

use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// A list or detail view whose data can go stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Categories,
    Category(String),
    Products,
    Product(String),
    Users,
    User(String),
    Sales,
    Inventory,
    Profile,
}

impl View {
    /// Whether a screen showing `self` must refetch when `changed` is published.
    pub fn is_affected_by(&self, changed: &View) -> bool {
        match (self, changed) {
            (a, b) if a == b => true,
            (Self::Categories, Self::Category(_))
            | (Self::Products, Self::Product(_))
            | (Self::Users, Self::User(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/home"),
            Self::Categories => f.write_str("/categories"),
            Self::Category(id) => write!(f, "/categories/{id}"),
            Self::Products => f.write_str("/products"),
            Self::Product(id) => write!(f, "/products/{id}"),
            Self::Users => f.write_str("/users"),
            Self::User(id) => write!(f, "/users/{id}"),
            Self::Sales => f.write_str("/sales"),
            Self::Inventory => f.write_str("/inventory"),
            Self::Profile => f.write_str("/profile"),
        }
    }
}

/// Broadcasts stale views to every subscriber. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Invalidator {
    tx: broadcast::Sender<View>,
}

impl Default for Invalidator {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl Invalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<View> {
        self.tx.subscribe()
    }

    /// Publish stale views. Having no subscribers is fine.
    pub fn publish(&self, views: impl IntoIterator<Item = View>) {
        for view in views {
            debug!(%view, "revalidate");
            let _ = self.tx.send(view);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn detail_changes_invalidate_the_list() {
        assert!(View::Products.is_affected_by(&View::Product("p1".into())));
        assert!(View::Products.is_affected_by(&View::Products));
        assert!(!View::Sales.is_affected_by(&View::Products));
        assert!(!View::Product("p1".into()).is_affected_by(&View::Products));
    }

    #[tokio::test]
    async fn subscribers_receive_published_views() {
        let inv = Invalidator::new();
        let mut rx = inv.subscribe();
        inv.publish([View::Categories, View::Category("c1".into())]);

        assert_eq!(rx.recv().await.unwrap(), View::Categories);
        assert_eq!(rx.recv().await.unwrap(), View::Category("c1".into()));
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        Invalidator::new().publish([View::Home]);
    }
}
