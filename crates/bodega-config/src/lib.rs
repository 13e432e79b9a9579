//! Shared configuration for the bodega CLI and TUI.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and the
//! file-backed session store. Both binaries depend on this crate; the CLI
//! layers its `GlobalOpts` overrides on top.

mod session_store;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bodega_api::{ApiClient, DEFAULT_API_URL, TransportConfig};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use session_store::FileSessionStore;

/// Keyring service name; entries are keyed `<profile>/password`.
pub const KEYRING_SERVICE: &str = "bodega";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Flag value if given, else the configured default, else `default`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// The named profile, or a fresh one pointing at the default API.
    pub fn profile_or_default(&self, name: &str) -> Profile {
        self.profiles.get(name).cloned().unwrap_or_default()
    }

    /// Sorted profile names.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named back-office account on one API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API origin (e.g., "http://localhost:3006").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Login email.
    pub email: Option<String>,

    /// Plaintext password; the keyring or `BODEGA_PASSWORD` take precedence.
    pub password: Option<String>,

    /// Override timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            email: None,
            password: None,
            timeout: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

impl Profile {
    /// Effective request timeout: profile override, else the global default.
    pub fn timeout(&self, defaults: &Defaults) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(defaults.timeout))
    }

    /// Build an API client for this profile, with optional flag overrides.
    pub fn client(
        &self,
        api_url: Option<&str>,
        timeout: Duration,
    ) -> Result<ApiClient, ConfigError> {
        let url = api_url.unwrap_or(&self.api_url);
        let transport = TransportConfig::default().with_timeout(timeout);
        ApiClient::new(url, &transport).map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{url}: {e}"),
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "bodega", "bodega")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("bodega");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where a profile's session file lives.
pub fn session_path(profile: &str) -> PathBuf {
    let base = project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    );
    base.join("sessions").join(format!("{profile}.json"))
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path`, then `BODEGA_*` variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BODEGA_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Login email: profile value, else `BODEGA_EMAIL`.
pub fn resolve_email(profile: &Profile) -> Option<String> {
    profile
        .email
        .clone()
        .or_else(|| std::env::var("BODEGA_EMAIL").ok())
        .filter(|e| !e.trim().is_empty())
}

/// Password from `BODEGA_PASSWORD`, then the keyring, then the profile.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Env var
    if let Some(pw) = std::env::var("BODEGA_PASSWORD").ok().filter(|p| !p.is_empty()) {
        return Some(SecretString::from(pw));
    }

    // 2. Keyring
    let stored = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name))
        .ok()
        .and_then(|entry| entry.get_password().ok());
    if let Some(pw) = stored {
        return Some(SecretString::from(pw));
    }

    // 3. Plaintext in config
    profile.password.clone().map(SecretString::from)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name))?;
    entry.set_password(password)?;
    Ok(())
}

fn keyring_key(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "tienda".into(),
            Profile {
                api_url: "https://api.tienda.co".into(),
                email: Some("ana@example.com".into()),
                password: None,
                timeout: Some(5),
            },
        );
        cfg.default_profile = Some("tienda".into());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile_or_default("tienda");
        assert_eq!(profile.api_url, "https://api.tienda.co");
        assert_eq!(profile.timeout(&loaded.defaults), Duration::from_secs(5));
        assert_eq!(loaded.active_profile_name(None), "tienda");
        assert_eq!(loaded.active_profile_name(Some("otra")), "otra");
    }

    #[test]
    fn unknown_profile_points_at_local_api() {
        let profile = Config::default().profile_or_default("nada");
        assert_eq!(profile.api_url, DEFAULT_API_URL);
        assert!(profile.client(None, Duration::from_secs(1)).is_ok());
        assert!(profile.client(Some("no es url"), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn session_files_are_per_profile() {
        let a = session_path("a");
        assert!(a.ends_with("sessions/a.json"));
        assert_ne!(a, session_path("b"));
    }
}
