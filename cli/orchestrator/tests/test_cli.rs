use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

const FLAVOR_REQUEST: &str = r#"{
  "files": [
    {
      "name": "edgeproto/flavor.proto",
      "services": [
        {
          "name": "FlavorApi",
          "methods": [
            { "name": "CreateFlavor", "input_type": "Flavor", "output_type": "Result",
              "mc2_api": "flavor,ActionManage,Key.Organization" },
            { "name": "ShowFlavor", "input_type": "Flavor", "output_type": "Flavor",
              "server_streaming": true, "mc2_api": "flavor,ActionView," }
          ]
        }
      ],
      "messages": [ { "name": "Flavor", "generate_cud_test": true } ]
    }
  ]
}"#;

fn write_request(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("request.json");
    fs::write(&path, body).expect("write request");
    path
}

/// Helper function to create a `restgate` command with an empty config file
fn restgate(dir: &Path) -> Command {
    let config = dir.join("restgate.toml");
    fs::write(&config, "").expect("write config");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("restgate"));
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn server_mode_is_the_default() {
    let tmp = tempdir().expect("tempdir");
    let input = write_request(tmp.path(), FLAVOR_REQUEST);
    let out = tmp.path().join("gen");

    restgate(tmp.path())
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("generated server code"));

    let flavor = fs::read_to_string(out.join("flavor.rs")).expect("flavor.rs");
    assert!(flavor.contains("pub trait FlavorApi: Send + Sync"));
    assert!(flavor.contains(r#"enforcer.enforce(&rc.username, "", "flavor", "ActionView")"#));
    assert!(out.join("mod.rs").exists());
}

#[test]
fn genapi_emits_wrappers() {
    let tmp = tempdir().expect("tempdir");
    let input = write_request(tmp.path(), FLAVOR_REQUEST);
    let out = tmp.path().join("gen");

    restgate(tmp.path())
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .arg("--genapi")
        .assert()
        .success();

    let flavor = fs::read_to_string(out.join("flavor.rs")).expect("flavor.rs");
    assert!(flavor.contains("pub struct RegionFlavor {"));
    assert!(!flavor.contains("pub trait FlavorApi"));
}

#[test]
fn invalid_annotation_fails_without_output() {
    let tmp = tempdir().expect("tempdir");
    let input = write_request(
        tmp.path(),
        &FLAVOR_REQUEST.replace("flavor,ActionView,", "flavor,ActionView,Key,Extra"),
    );
    let out = tmp.path().join("gen");

    restgate(tmp.path())
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("flavor,ActionView,Key,Extra"));

    assert!(!out.exists());
}

#[test]
fn missing_request_fails() {
    let tmp = tempdir().expect("tempdir");
    restgate(tmp.path())
        .arg("--input")
        .arg(tmp.path().join("nope.json"))
        .arg("--output")
        .arg(tmp.path().join("gen"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("request not found"));
}
