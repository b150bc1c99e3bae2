//! End-to-end tests for the `tamperguard` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn tamperguard(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tamperguard").unwrap();
    cmd.arg("--no-color")
        .arg("--config")
        .arg(config)
        .env_remove("TAMPERGUARD_URL_TEMPLATE")
        .env_remove("TAMPERGUARD_BUNDLE_ID")
        .env_remove("RUST_LOG");
    cmd
}

/// Bundle with a provisioning artifact ("abc") and a module image (empty).
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("embedded.mobileprovision"), b"abc").unwrap();
        std::fs::write(dir.path().join("Kit"), b"").unwrap();
        Self { dir }
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("config.toml")
    }

    fn write_config(&self, static_values: &str) {
        let root = self.dir.path().display();
        let config = format!(
            r#"
[references]
source = "static"
default_module = "Kit"

[references.static_values]
{static_values}

[bundle]
identifier = "com.example.app"
directory = '{root}'

[images.modules]
Kit = '{root}/Kit'
"#
        );
        std::fs::write(self.config_path(), config).unwrap();
    }
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("tamperguard")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("hash-file"));
}

#[test]
fn hash_file_prints_digest() {
    let fixture = Fixture::new();
    let file = fixture.dir.path().join("embedded.mobileprovision");

    tamperguard(&fixture.config_path())
        .args(["-o", "json", "hash-file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(r#""sha256":"{ABC_SHA256}""#)));
}

#[test]
fn hash_file_missing_path_fails() {
    let fixture = Fixture::new();

    tamperguard(&fixture.config_path())
        .args(["hash-file", "/nonexistent/tamperguard/file"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/tamperguard/file"));
}

#[test]
fn measurements_follow_config() {
    let fixture = Fixture::new();
    fixture.write_config("");

    tamperguard(&fixture.config_path())
        .arg("bundle-id")
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.app"));

    tamperguard(&fixture.config_path())
        .arg("provision-hash")
        .assert()
        .success()
        .stdout(predicate::str::contains(ABC_SHA256));

    tamperguard(&fixture.config_path())
        .args(["image-hash", "--module", "Kit"])
        .assert()
        .success()
        .stdout(predicate::str::contains(EMPTY_SHA256));
}

#[test]
fn bundle_id_flag_overrides_config() {
    let fixture = Fixture::new();
    fixture.write_config("");

    tamperguard(&fixture.config_path())
        .args(["--bundle-id", "com.other.app", "bundle-id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.other.app"));
}

#[test]
fn offline_check_passes_on_matching_references() {
    let fixture = Fixture::new();
    fixture.write_config(&format!(
        "bundleId = \"com.example.app\"\nprovisionHash = \"{ABC_SHA256}\"\n\"machOHash:Kit\" = \"{EMPTY_SHA256}\""
    ));

    tamperguard(&fixture.config_path())
        .args(["-o", "json", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""overall": true"#));
}

#[test]
fn offline_check_fails_on_tampered_provision() {
    let fixture = Fixture::new();
    fixture.write_config(&format!(
        "bundleId = \"com.example.app\"\nprovisionHash = \"{EMPTY_SHA256}\"\n\"machOHash:Kit\" = \"{EMPTY_SHA256}\""
    ));

    tamperguard(&fixture.config_path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL ProvisionFile"))
        .stdout(predicate::str::contains("PASS BundleIdentity"));
}

#[test]
fn offline_check_reports_missing_references() {
    let fixture = Fixture::new();
    fixture.write_config("bundleId = \"com.example.app\"");

    tamperguard(&fixture.config_path())
        .args(["-o", "json", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("InsufficientReferenceData"));
}

#[test]
fn config_set_then_show() {
    let fixture = Fixture::new();

    tamperguard(&fixture.config_path())
        .args(["config", "set", "bundle.identifier", "com.example.set"])
        .assert()
        .success();

    tamperguard(&fixture.config_path())
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.set"));

    tamperguard(&fixture.config_path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn malformed_endpoint_override_only_drops_that_key() {
    let fixture = Fixture::new();
    let config = r#"
[references]
source = "remote"
url_template = "http://127.0.0.1:9/Values/{key}"
timeout_secs = 2

[references.endpoints]
bundleId = "not a url"
"#;
    std::fs::write(fixture.config_path(), config).unwrap();

    tamperguard(&fixture.config_path())
        .args(["-o", "json", "references"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""bundleId""#))
        .stdout(predicate::str::contains(r#""provisionHash""#))
        .stdout(predicate::str::contains(r#""mainBinaryHash""#));

    tamperguard(&fixture.config_path())
        .args(["-o", "json", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("InsufficientReferenceData"));
}
