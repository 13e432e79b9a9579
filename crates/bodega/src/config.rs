//! CLI configuration: a thin wrapper around `bodega_config` shared types.
//!
//! Resolves the active profile with `GlobalOpts` overrides and opens the
//! profile's session for the action layer.

use std::sync::Arc;

use bodega_config::{FileSessionStore, session_path};
use bodega_core::guard::{Route, RouteDecision, route_decision};
use bodega_core::{Actions, SessionProvider, User};

use crate::cli::GlobalOpts;
use crate::error::{CliError, FailureContext};

pub use bodega_config::{
    Config, Profile, config_path, load_config_or_default, resolve_email, resolve_password,
    save_config, store_password,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Everything a domain command needs: the action layer and who is calling.
pub struct Context {
    pub actions: Actions,
    pub profile_name: String,
    pub profile: Profile,
    role: String,
}

impl Context {
    /// Load config, apply flag overrides, and open the profile's session.
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = load_config_or_default();
        let profile_name = active_profile_name(global, &cfg);
        let unknown = global.profile.is_some()
            && !cfg.profiles.is_empty()
            && !cfg.profiles.contains_key(&profile_name);
        if unknown {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: cfg.profile_names().join(", "),
            });
        }
        let profile = cfg.profile_or_default(&profile_name);

        let timeout = global
            .timeout
            .map_or_else(|| profile.timeout(&cfg.defaults), std::time::Duration::from_secs);
        let api = profile.client(global.api_url.as_deref(), timeout)?;
        let session = FileSessionStore::open(session_path(&profile_name))?;

        let role = session
            .user()
            .map_or_else(|| "-".into(), |u| u.role.label().to_owned());

        tracing::debug!(profile = %profile_name, api = %api.base_url(), "context ready");
        Ok(Self {
            actions: Actions::new(api, Arc::new(session)),
            profile_name,
            profile,
            role,
        })
    }

    pub fn user(&self) -> Option<User> {
        self.actions.session().user()
    }

    /// How to describe a failure of a command whose listing is `list_command`.
    pub fn failure<'a>(&'a self, list_command: &'a str) -> FailureContext<'a> {
        FailureContext {
            profile: &self.profile_name,
            role: &self.role,
            list_command,
        }
    }

    /// Check the cached role against `route` before calling the API.
    pub fn require(&self, route: Route) -> Result<(), CliError> {
        let user = self.user();
        match route_decision(route, user.as_ref()) {
            RouteDecision::Allow => Ok(()),
            RouteDecision::RedirectToLogin => Err(CliError::NotLoggedIn {
                profile: self.profile_name.clone(),
            }),
            RouteDecision::RedirectToHome => Err(CliError::Forbidden {
                message: format!("Sin acceso a {}", route.title()),
                role: self.role.clone(),
            }),
        }
    }
}
