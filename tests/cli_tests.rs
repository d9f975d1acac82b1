use assert_cmd::Command;
use predicates::prelude::*;

const CANISTER_VARS: [&str; 5] = [
    "DFX_NETWORK",
    "CANISTER_ID_NURU_BACKEND",
    "CANISTER_ID_CANISTER_TWO",
    "CANISTER_ID_CANISTER_THREE",
    "CANISTER_ID_CANISTER_FOUR",
];

fn nuru() -> Command {
    let mut cmd = Command::cargo_bin("nuru").expect("binary built");
    for var in CANISTER_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_commands() {
    nuru()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pools"))
        .stdout(predicate::str::contains("proposals"))
        .stdout(predicate::str::contains("portfolio"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    nuru().assert().failure();
}

#[test]
fn missing_canister_ids_fail_with_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nuru.toml");
    std::fs::write(&path, "[canisters]\ncore = \"bkyz2-fmaaa-aaaaa-qaaaq-cai\"\n")
        .expect("write config");

    nuru()
        .current_dir(dir.path())
        .args(["status", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("canisters.custody"));
}

#[test]
fn invalid_dfx_network_fails() {
    let dir = tempfile::tempdir().expect("tempdir");

    nuru()
        .current_dir(dir.path())
        .env("DFX_NETWORK", "staging")
        .args(["status", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("DFX_NETWORK"));
}

#[test]
fn json_errors_are_machine_readable() {
    let dir = tempfile::tempdir().expect("tempdir");

    nuru()
        .current_dir(dir.path())
        .args(["--json", "status", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"type\":\"error\""));
}
