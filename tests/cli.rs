use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn install_tailwind(root: &Path, version: &str) {
    write_file(
        &root.join("node_modules/tailwindcss/package.json"),
        &format!(r#"{{"name": "tailwindcss", "version": "{}"}}"#, version),
    );
}

fn twpatch(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("twpatch"));
    cmd.arg("--root").arg(root);
    cmd
}

#[test]
fn init_config_writes_starter_file() {
    let temp = tempdir().unwrap();

    twpatch(temp.path()).arg("init-config").assert().success();

    let content = fs::read_to_string(temp.path().join("twpatch.config.json")).unwrap();
    let config: Value = serde_json::from_str(&content).expect("valid config json");
    assert_eq!(
        config["tailwind"]["package"],
        Value::String("tailwindcss".to_string())
    );
    assert_eq!(config["cache"]["enabled"], Value::Bool(true));
}

#[test]
fn init_config_refuses_to_clobber_without_force() {
    let temp = tempdir().unwrap();

    twpatch(temp.path()).arg("init-config").assert().success();
    twpatch(temp.path())
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    twpatch(temp.path())
        .arg("init-config")
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn tokens_lines_format_reports_positions() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("app.html"),
        "<div class=\"flex p-4\"></div>\n",
    );

    let assert = twpatch(temp.path())
        .arg("tokens")
        .arg("--tokens-format")
        .arg("lines")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_eq!(stdout, "app.html:1:13 flex (12-16)\napp.html:1:18 p-4 (17-20)\n");
}

#[test]
fn tokens_json_format_reports_scan_summary() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("src/app.vue"),
        "<template><span class=\"mt-2\"></span></template>\n",
    );
    write_file(&temp.path().join("notes.txt"), "class=\"ignored-1\"\n");

    let assert = twpatch(temp.path()).arg("tokens").assert().success();
    let report: Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json report");

    assert_eq!(report["filesScanned"], Value::from(1));
    let entries = report["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["rawCandidate"], Value::from("mt-2"));
    assert_eq!(entries[0]["relativeFile"], Value::from("src/app.vue"));
    assert_eq!(entries[0]["line"], Value::from(1));
}

#[test]
fn tokens_by_file_format_groups_entries() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.html"), "<i class=\"p-1\"></i>\n");
    write_file(&temp.path().join("b.html"), "<i class=\"p-2\"></i>\n");

    let assert = twpatch(temp.path())
        .arg("tokens")
        .arg("--tokens-format")
        .arg("by-file")
        .assert()
        .success();

    let grouped: Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json map");
    let keys: Vec<_> = grouped.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a.html", "b.html"]);
}

#[test]
fn tokens_respects_explicit_glob_sources() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("src/a.html"), "<i class=\"p-1\"></i>\n");
    write_file(&temp.path().join("other/b.html"), "<i class=\"p-2\"></i>\n");

    let assert = twpatch(temp.path())
        .arg("tokens")
        .arg("src/**/*.html")
        .arg("--tokens-format")
        .arg("lines")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("p-1"));
    assert!(!stdout.contains("p-2"));
}

#[test]
fn extract_fails_without_an_installed_package() {
    let temp = tempdir().unwrap();

    twpatch(temp.path())
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be resolved"));
}

#[test]
fn patch_fails_without_an_installed_package() {
    let temp = tempdir().unwrap();

    twpatch(temp.path())
        .arg("patch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tailwindcss"));
}

#[test]
fn cache_clear_succeeds_on_a_fresh_project() {
    let temp = tempdir().unwrap();
    install_tailwind(temp.path(), "3.4.1");

    twpatch(temp.path())
        .arg("cache")
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("classes.json"));
}

#[test]
fn cache_clear_removes_the_persisted_set() {
    let temp = tempdir().unwrap();
    install_tailwind(temp.path(), "3.4.1");
    let cache_file = temp
        .path()
        .join("node_modules/.cache/twpatch/classes.json");
    write_file(&cache_file, "[\"flex\"]");

    twpatch(temp.path()).arg("cache").arg("clear").assert().success();
    assert!(!cache_file.exists());
}

#[test]
fn legacy_config_shape_is_accepted() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("twpatch.config.json"),
        r#"{"patch": {"output": {"filename": "out.json"}, "tailwindcss": {"version": 3}, "cache": {"dir": ".twcache"}}}"#,
    );
    install_tailwind(temp.path(), "3.4.1");
    write_file(&temp.path().join(".twcache/classes.json"), "[\"flex\"]");

    twpatch(temp.path()).arg("cache").arg("clear").assert().success();
    assert!(!temp.path().join(".twcache/classes.json").exists());
}
