//! Config subcommand handlers.

use bodega_api::DEFAULT_API_URL;
use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::{prompt_err, prompt_secret};

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for name in cfg.profile_names() {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Copy of the config with every plaintext password masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    cfg
}

/// Store a password in the keyring or hand it back for plaintext config.
///
/// Returns `Some(password)` if the user chose plaintext, `None` otherwise.
fn prompt_password_storage(profile_name: &str, password: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_password(profile_name, password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password.to_owned()))
    }
}

fn parse_timeout(value: &str) -> Result<u64, CliError> {
    value.parse().map_err(|_| CliError::InvalidArgument {
        field: "timeout".into(),
        reason: "must be a number (seconds)".into(),
    })
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            check_api_url(&value)?;
            profile.api_url = value;
        }
        "email" => profile.email = Some(value),
        "password" => profile.password = Some(value),
        "timeout" => profile.timeout = Some(parse_timeout(&value)?),
        other => {
            return Err(CliError::InvalidArgument {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, email, password, timeout"
                ),
            });
        }
    }
    Ok(())
}

fn check_api_url(value: &str) -> Result<(), CliError> {
    let host = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    if host.is_some_and(|h| !h.is_empty()) {
        Ok(())
    } else {
        Err(CliError::InvalidArgument {
            field: "api_url".into(),
            reason: format!("'{value}' is not an http(s) URL"),
        })
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("✨ bodega: configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. API URL
            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(DEFAULT_API_URL.into())
                .interact_text()
                .map_err(prompt_err)?;
            check_api_url(&api_url)?;

            // 3. Login email
            let email: String = Input::new()
                .with_prompt("Email (leave empty to ask at login)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            let email = Some(email.trim().to_owned()).filter(|e| !e.is_empty());

            // 4. Password, optional
            let password = if email.is_some() {
                let pass = prompt_secret("Password (leave empty to ask at login): ")?;
                if pass.is_empty() {
                    None
                } else {
                    prompt_password_storage(&profile_name, &pass)?
                }
            } else {
                None
            };

            // 5. Merge into the existing config
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_url,
                    email,
                    password,
                    timeout: None,
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: bodega login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;
            config::save_config(&cfg)?;
            output::notify(&format!("Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: bodega config init");
            } else {
                for name in cfg.profile_names() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                let available = cfg.profile_names().join(", ");
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available
                    },
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::notify(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let password = prompt_secret(&format!("Password for '{profile_name}': "))?;
            if password.is_empty() {
                return Err(CliError::InvalidArgument {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            config::store_password(&profile_name, &password)?;
            output::notify(
                &format!("Password for '{profile_name}' stored in system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_known_keys() {
        let mut profile = Profile::default();
        set_profile_key(&mut profile, "api_url", "https://api.tienda.co".into()).unwrap();
        set_profile_key(&mut profile, "email", "ana@example.com".into()).unwrap();
        set_profile_key(&mut profile, "timeout", "5".into()).unwrap();
        assert_eq!(profile.api_url, "https://api.tienda.co");
        assert_eq!(profile.email.as_deref(), Some("ana@example.com"));
        assert_eq!(profile.timeout, Some(5));
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut profile = Profile::default();
        assert!(set_profile_key(&mut profile, "timeout", "soon".into()).is_err());
        assert!(set_profile_key(&mut profile, "api_url", "localhost".into()).is_err());
        assert!(set_profile_key(&mut profile, "color", "red".into()).is_err());
    }

    #[test]
    fn show_masks_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "tienda".into(),
            Profile {
                password: Some("secreta".into()),
                ..Profile::default()
            },
        );
        let text = format_config_redacted(&redacted(&cfg));
        assert!(text.contains("[profiles.tienda]"));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("secreta"));
    }
}
