#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Variables that would leak the developer's own credentials into a test.
const CREDENTIAL_VARS: &[&str] = &[
    "BM_USERNAME",
    "BM_PASSWORD",
    "BM_IDENTITY_COOKIE",
    "BM_REGION",
    "BM_TIMEOUT",
    "BM_IAM_CLIENT_ID",
    "BM_IAM_SECRET",
    "BLUEMIX_USERNAME",
    "BLUEMIX_PASSWORD",
    "BLUEMIX_IDENTITY_COOKIE",
    "BLUEMIX_REGION",
    "BLUEMIX_TIMEOUT",
    "BLUEMIX_IAM_CLIENT_ID",
    "BLUEMIX_IAM_SECRET",
    "SL_USERNAME",
    "SL_API_KEY",
    "SL_ACCOUNT_NUMBER",
    "SOFTLAYER_USERNAME",
    "SOFTLAYER_API_KEY",
    "SOFTLAYER_ACCOUNT_NUMBER",
    "KUBE_HOST",
    "KUBE_TOKEN",
    "KUBERNETES_HOST",
    "KUBERNETES_TOKEN",
];

/// Run the CLI with a custom HOME directory for isolated session storage.
pub fn run_cli_with_home(args: &[&str], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bmx"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("NO_COLOR", "1");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI with a custom HOME and expect success.
pub fn run_cli_with_home_success(args: &[&str], home: &Path) -> String {
    let output = run_cli_with_home(args, home);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Where the session file lands on Linux under the isolated HOME.
pub fn linux_session_path(home: &Path) -> PathBuf {
    home.join("data").join("bmx").join("session.json")
}
