// ── Action layer ──
//
// One method per backend operation. Each resolves the session token,
// builds the request, calls the API, and folds every outcome into an
// `ActionResult`. Mutations publish the views they made stale.

mod auth;
mod categories;
mod kardex;
mod products;
mod profile;
mod sales;
mod users;

use std::future::Future;
use std::sync::Arc;

use bodega_api::{ApiClient, ApiResponse};
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::invalidate::{Invalidator, View};
use crate::result::ActionResult;
use crate::session::SessionProvider;

pub use categories::CATEGORY_PAGE_LIMIT;
pub use kardex::KARDEX_PAGE_LIMIT;
pub use products::PRODUCT_PAGE_LIMIT;
pub use sales::SALES_PAGE_LIMIT;
pub use users::USER_PAGE_LIMIT;

/// A page of records with its pagination meta.
pub type Page<T> = ApiResponse<Vec<T>>;

/// Handle to the action layer. Cheaply cloneable via `Arc<Inner>`.
#[derive(Clone)]
pub struct Actions {
    inner: Arc<Inner>,
}

struct Inner {
    api: ApiClient,
    session: Arc<dyn SessionProvider>,
    invalidator: Invalidator,
}

impl Actions {
    pub fn new(api: ApiClient, session: Arc<dyn SessionProvider>) -> Self {
        Self::with_invalidator(api, session, Invalidator::new())
    }

    pub fn with_invalidator(
        api: ApiClient,
        session: Arc<dyn SessionProvider>,
        invalidator: Invalidator,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                session,
                invalidator,
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn session(&self) -> &dyn SessionProvider {
        self.inner.session.as_ref()
    }

    pub fn invalidator(&self) -> &Invalidator {
        &self.inner.invalidator
    }

    fn invalidate(&self, views: impl IntoIterator<Item = View>) {
        self.inner.invalidator.publish(views);
    }

    /// Run `op` with the session token, or fail with `No autenticado`
    /// before anything is sent.
    async fn authed<T, F, Fut>(&self, name: &'static str, op: F) -> ActionResult<T>
    where
        F: FnOnce(SecretString) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let Some(token) = self.inner.session.token() else {
            return finish(name, Err(CoreError::NotAuthenticated));
        };
        debug!(action = name, "running");
        finish(name, op(token).await)
    }
}

impl std::fmt::Debug for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actions")
            .field("base_url", &self.inner.api.base_url().as_str())
            .field("authenticated", &self.inner.session.is_authenticated())
            .finish_non_exhaustive()
    }
}

fn finish<T>(name: &'static str, result: Result<T, CoreError>) -> ActionResult<T> {
    if let Err(ref err) = result {
        warn!(action = name, kind = ?err.kind(), error = %err, "action failed");
    }
    result.into()
}

/// The envelope's `data`, or a parse error when the API omitted it.
fn into_data<T>(resp: ApiResponse<T>) -> Result<T, CoreError> {
    resp.data.ok_or_else(|| {
        CoreError::Api(bodega_api::Error::Deserialization {
            message: format!("la respuesta no incluye datos ({})", resp.message),
            body: String::new(),
        })
    })
}
