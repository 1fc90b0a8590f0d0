//! CLI integration tests.
//!
//! Every test runs the binary against a throwaway HOME so the developer's own
//! session and credentials are never touched.

mod common;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{linux_session_path, run_cli_with_home, run_cli_with_home_success};

#[test]
fn test_schema_lists_bluemix_resources() {
    let home = TempDir::new().unwrap();

    let stdout = run_cli_with_home_success(&["schema", "bluemix"], home.path());
    let document: Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(document["provider"], "bluemix");
    assert!(document["resources"]["bluemix_infrastructure_ssh_key"].is_object());
    assert!(document["resources"]["bluemix_infrastructure_virtual_guest"].is_object());
    assert_eq!(document["schema"]["password"]["sensitive"], true);
}

#[test]
fn test_schema_lists_kubernetes_namespace() {
    let home = TempDir::new().unwrap();

    let stdout = run_cli_with_home_success(&["schema", "kubernetes"], home.path());
    let document: Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(
        document["resources"]["kubernetes_namespace"]["metadata"]["required"],
        true
    );
}

#[test]
fn test_whoami_without_session_fails() {
    let home = TempDir::new().unwrap();

    let output = run_cli_with_home(&["whoami"], home.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bmx login"), "stderr: {stderr}");
}

#[test]
fn test_login_without_credentials_fails() {
    let home = TempDir::new().unwrap();

    let output = run_cli_with_home(&["login", "--region", "eu-gb"], home.path());

    assert!(!output.status.success());
    let output = run_cli_with_home(&["whoami"], home.path());
    assert!(!output.status.success());
}

#[test]
fn test_identity_cookie_login_persists_session() {
    let home = TempDir::new().unwrap();

    // No password and no account: nothing to exchange, so no network.
    run_cli_with_home_success(
        &[
            "login",
            "--identity-cookie",
            "cookie-123",
            "--region",
            "eu-gb",
        ],
        home.path(),
    );

    let stdout = run_cli_with_home_success(&["whoami"], home.path());
    assert!(stdout.contains("eu-gb"), "stdout: {stdout}");
    assert!(stdout.contains("https://login.eu-gb.bluemix.net"), "stdout: {stdout}");

    #[cfg(target_os = "linux")]
    {
        use std::os::unix::fs::PermissionsExt;

        let session_file = linux_session_path(home.path());
        let mode = std::fs::metadata(&session_file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let stored: Value =
            serde_json::from_str(&std::fs::read_to_string(&session_file).unwrap()).unwrap();
        assert_eq!(stored["tokens"]["identity_cookie"], "cookie-123");
        assert_eq!(stored["options"]["region"], "eu-gb");
    }

    run_cli_with_home_success(&["logout"], home.path());
    assert!(!run_cli_with_home(&["whoami"], home.path()).status.success());
}

#[test]
fn test_namespace_invalid_name_fails_before_connecting() {
    let home = TempDir::new().unwrap();

    let output = run_cli_with_home(
        &["namespace", "create", "--name", "Not_Valid"],
        home.path(),
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("metadata.0.name"), "stderr: {stderr}");
}

#[test]
fn test_namespace_requires_host() {
    let home = TempDir::new().unwrap();

    let output = run_cli_with_home(&["namespace", "get", "team-a"], home.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("KUBE_HOST"), "stderr: {stderr}");
}

#[test]
fn test_ssh_key_without_session_fails() {
    let home = TempDir::new().unwrap();

    let output = run_cli_with_home(&["ssh-key", "get", "42"], home.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No active session"), "stderr: {stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_password_login_then_refresh() {
    let server = MockServer::start().await;
    let base = format!("http://127.0.0.1:{}", server.address().port());

    Mock::given(method("POST"))
        .and(path("/UAALoginServerWAR/oauth/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "first-access",
            "refresh_token": "first-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/UAALoginServerWAR/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=first-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "second-access",
            "refresh_token": "second-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let home_path = home.path().to_path_buf();
    let login_endpoint = format!("{base}/UAALoginServerWAR");

    let stdout = tokio::task::spawn_blocking(move || {
        run_cli_with_home_success(
            &[
                "login",
                "--username",
                "alice",
                "--password",
                "secret123",
                "--login-endpoint",
                &login_endpoint,
                "--iam-endpoint",
                &base,
            ],
            &home_path,
        );
        run_cli_with_home_success(&["refresh"], &home_path);
        run_cli_with_home_success(&["whoami"], &home_path)
    })
    .await
    .unwrap();

    assert!(stdout.contains("alice"), "stdout: {stdout}");

    #[cfg(target_os = "linux")]
    {
        let stored = std::fs::read_to_string(linux_session_path(home.path())).unwrap();
        assert!(stored.contains("second-refresh"));
        assert!(!stored.contains("secret123"));
    }
}
