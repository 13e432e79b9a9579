//! Integration tests for the `bodega` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without any API. Session flows run against a wiremock server, with
//! config and session files inside a temporary home.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `bodega` binary with env isolation.
///
/// Clears all `BODEGA_*` env vars and points config and data directories
/// at `home` so tests never touch the user's real configuration.
fn bodega_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bodega");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("BODEGA_PROFILE")
        .env_remove("BODEGA_API_URL")
        .env_remove("BODEGA_OUTPUT")
        .env_remove("BODEGA_COLOR")
        .env_remove("BODEGA_QUIET")
        .env_remove("BODEGA_YES")
        .env_remove("BODEGA_TIMEOUT")
        .env_remove("BODEGA_EMAIL")
        .env_remove("BODEGA_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn scratch_cmd() -> assert_cmd::Command {
    bodega_cmd(Path::new("/tmp/bodega-cli-test-nonexistent"))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn user_json(role: &str) -> Value {
    json!({
        "_id": "u1",
        "name": "Ana",
        "lastName": "Pérez",
        "idNumber": "100200",
        "typeDocument": "cc",
        "phone": "3001234567",
        "email": "ana@example.com",
        "role": role,
        "status": true
    })
}

async fn mount_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "token": "tok-cli",
            "data": user_json(role)
        })))
        .mount(server)
        .await;
}

/// Run a prepared command off the async runtime so wiremock keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

async fn login(home: &Path, server: &MockServer) {
    let mut cmd = bodega_cmd(home);
    cmd.args(["login", "--email", "ana@example.com", "--api-url", &server.uri()])
        .env("BODEGA_PASSWORD", "secreta");
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let text = combined_output(&output);
    assert!(text.contains("¡Bienvenido al panel de administración!"), "{text}");
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = scratch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    scratch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("bodega store")
            .and(predicate::str::contains("categories"))
            .and(predicate::str::contains("products"))
            .and(predicate::str::contains("inventory")),
    );
}

#[test]
fn test_version_flag() {
    scratch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bodega"));
}

#[test]
fn test_invalid_subcommand() {
    scratch_cmd()
        .arg("warehouses")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_bad_date_is_a_usage_error() {
    scratch_cmd()
        .args(["sales", "list", "--from", "ayer"])
        .assert()
        .failure()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    scratch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    scratch_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    scratch_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_set_then_profiles() {
    let home = tempfile::tempdir().unwrap();
    bodega_cmd(home.path())
        .args(["config", "set", "api_url", "https://api.tienda.co"])
        .assert()
        .success();
    bodega_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
    bodega_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.tienda.co"));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    bodega_cmd(home.path())
        .args(["config", "use", "nada"])
        .assert()
        .failure()
        .code(4);
}

// ── Session ─────────────────────────────────────────────────────────

#[test]
fn test_domain_command_without_session() {
    let home = tempfile::tempdir().unwrap();
    let output = bodega_cmd(home.path())
        .args(["categories", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No autenticado"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_list_sends_bearer_token() {
    let server = MockServer::start().await;
    mount_login(&server, "admin").await;
    Mock::given(method("GET"))
        .and(path("/category"))
        .and(header("authorization", "Bearer tok-cli"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": [{"_id": "c1", "name": "Aseo", "description": "Limpieza"}],
            "meta": {"page": 1, "limit": 100, "total": 1, "totalPages": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    login(home.path(), &server).await;

    let mut cmd = bodega_cmd(home.path());
    cmd.args(["categories", "list", "--api-url", &server.uri(), "-o", "plain"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "c1");

    let mut cmd = bodega_cmd(home.path());
    cmd.args(["whoami", "-o", "plain"]);
    let output = run(cmd).await;
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ana@example.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_role_guard_stops_before_the_api() {
    let server = MockServer::start().await;
    mount_login(&server, "seller").await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    login(home.path(), &server).await;

    let mut cmd = bodega_cmd(home.path());
    cmd.args(["users", "list", "--api-url", &server.uri()]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_the_session() {
    let server = MockServer::start().await;
    mount_login(&server, "admin").await;

    let home = tempfile::tempdir().unwrap();
    login(home.path(), &server).await;

    let mut cmd = bodega_cmd(home.path());
    cmd.args(["logout", "--yes"]);
    assert!(run(cmd).await.status.success());

    let mut cmd = bodega_cmd(home.path());
    cmd.arg("whoami");
    assert_eq!(run(cmd).await.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_sales_export_writes_nothing() {
    let server = MockServer::start().await;
    mount_login(&server, "admin").await;
    Mock::given(method("GET"))
        .and(path("/sales/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": []
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    login(home.path(), &server).await;

    let out_dir = home.path().join("exports");
    let mut cmd = bodega_cmd(home.path());
    cmd.args(["sales", "export", "--api-url", &server.uri(), "--dir"])
        .arg(&out_dir);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(
        combined_output(&output)
            .contains("No hay ventas para exportar con los filtros seleccionados")
    );
    assert!(!out_dir.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_rejection_keeps_server_message() {
    let server = MockServer::start().await;
    mount_login(&server, "admin").await;
    Mock::given(method("DELETE"))
        .and(path("/user/u9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "message": "Usuario no encontrado"
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    login(home.path(), &server).await;

    let mut cmd = bodega_cmd(home.path());
    cmd.args(["users", "delete", "u9", "--yes", "--api-url", &server.uri()]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Usuario no encontrado"));
}
