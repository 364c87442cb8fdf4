use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Command with HOME and every XDG root pointed into a fresh directory.
fn sweep(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sweep").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CACHE_HOME", home.join(".cache"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("CARGO_HOME", home.join(".cargo"))
        .env_remove("RUST_LOG");
    cmd
}

fn home_with_thumbnails() -> TempDir {
    let home = TempDir::new().unwrap();
    let normal = home.path().join(".cache/thumbnails/normal");
    fs::create_dir_all(&normal).unwrap();
    fs::write(normal.join("a.png"), "x".repeat(300)).unwrap();
    home
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn shows_help() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reclaim disk space"))
        .stdout(predicate::str::contains("clean-as-root").not());
}

#[test]
fn shows_version() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn requires_subcommand() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_config_path_fails() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .args(["--config", "/nonexistent/path.toml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn list_json_includes_builtin_units() {
    let home = home_with_thumbnails();
    let output = sweep(home.path())
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let rows = stdout_json(&output);
    let rows = rows.as_array().unwrap();
    let thumbnails = rows.iter().find(|r| r["id"] == "thumbnails").unwrap();
    assert_eq!(thumbnails["state"], "ready");
    assert_eq!(thumbnails["category"], "user");

    let trash = rows.iter().find(|r| r["id"] == "trash").unwrap();
    assert_eq!(trash["state"], "unavailable");
    assert_eq!(trash["reason"], "Trash directory not found");

    let coredumps = rows.iter().find(|r| r["id"] == "coredumps").unwrap();
    assert_eq!(coredumps["requires_root"], true);
}

#[test]
fn list_filters_by_category() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .args(["list", "--category", "system"])
        .assert()
        .success()
        .stdout(predicate::str::contains("coredumps"))
        .stdout(predicate::str::contains("thumbnails").not());
}

#[test]
fn disabled_units_are_hidden() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("sweep.toml");
    fs::write(&config, "[units]\ndisabled = [\"old_kernels\"]\n").unwrap();

    sweep(home.path())
        .args(["--config", config.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("old_kernels").not());
}

#[test]
fn info_shows_unit_details() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .args(["info", "old_kernels"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Old Kernel Images (old_kernels)"))
        .stdout(predicate::str::contains("Requires root: yes"))
        .stdout(predicate::str::contains("aggressive"));
}

#[test]
fn info_unknown_unit_fails() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .args(["info", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown unit 'nope'"));
}

#[test]
fn scan_unknown_unit_exits_2() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .args(["scan", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown unit(s): nope"));
}

#[test]
fn scan_json_reports_sizes() {
    let home = home_with_thumbnails();
    let output = sweep(home.path())
        .args(["scan", "--json", "thumbnails"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results = stdout_json(&output);
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["unit_id"], "thumbnails");
    assert_eq!(results[0]["total_bytes"], 300);
}

#[test]
fn scan_table_shows_total() {
    let home = home_with_thumbnails();
    sweep(home.path())
        .args(["scan", "thumbnails"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:"))
        .stdout(predicate::str::contains("thumbnails"));
}

#[test]
fn clean_dry_run_keeps_files() {
    let home = home_with_thumbnails();
    sweep(home.path())
        .args(["clean", "--dry-run", "thumbnails"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]"));

    assert!(home.path().join(".cache/thumbnails/normal/a.png").exists());
}

#[test]
fn clean_json_requires_yes() {
    let home = home_with_thumbnails();
    sweep(home.path())
        .args(["clean", "--json", "thumbnails"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn clean_aborts_without_confirmation() {
    let home = home_with_thumbnails();
    sweep(home.path())
        .args(["clean", "thumbnails"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));

    assert!(home.path().join(".cache/thumbnails/normal/a.png").exists());
}

fn home_with_thumbnails_and_trash() -> TempDir {
    let home = home_with_thumbnails();
    let files = home.path().join(".local/share/Trash/files");
    fs::create_dir_all(&files).unwrap();
    fs::write(files.join("old.txt"), "x".repeat(100)).unwrap();
    home
}

#[test]
fn clean_select_cleans_only_chosen_units() {
    let home = home_with_thumbnails_and_trash();
    sweep(home.path())
        .args(["clean", "thumbnails", "trash"])
        .write_stdin("select\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[y/N/select]"))
        .stdout(predicate::str::contains("[1] Thumbnails"))
        .stdout(predicate::str::contains("[2] Trash"))
        .stdout(predicate::str::contains("Freed:"));

    assert!(!home.path().join(".cache/thumbnails/normal").exists());
    assert!(home.path().join(".local/share/Trash/files/old.txt").exists());
}

#[test]
fn clean_select_with_no_valid_choice() {
    let home = home_with_thumbnails_and_trash();
    sweep(home.path())
        .args(["clean", "thumbnails", "trash"])
        .write_stdin("select\n7, abc\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing selected."));

    assert!(home.path().join(".cache/thumbnails/normal/a.png").exists());
    assert!(home.path().join(".local/share/Trash/files/old.txt").exists());
}

#[test]
fn clean_removes_files() {
    let home = home_with_thumbnails();
    let output = sweep(home.path())
        .args(["clean", "--yes", "--json", "thumbnails"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results = stdout_json(&output);
    assert_eq!(results[0]["unit_id"], "thumbnails");
    assert_eq!(results[0]["freed_bytes"], 300);
    assert_eq!(results[0]["items_removed"], 1);
    assert!(!home.path().join(".cache/thumbnails/normal").exists());
}

#[test]
fn clean_with_nothing_found() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .args(["clean", "--yes", "thumbnails"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean."));
}

#[test]
fn clean_as_root_rejects_bad_input() {
    let home = TempDir::new().unwrap();
    let output = sweep(home.path())
        .arg("clean-as-root")
        .write_stdin("this is not json")
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let results = stdout_json(&output);
    assert_eq!(results[0]["plugin_id"], "unknown");
    assert_eq!(results[0]["freed_bytes"], 0);
    assert!(results[0]["errors"][0]
        .as_str()
        .unwrap()
        .starts_with("Bad input: "));
}

#[test]
fn clean_as_root_empty_request() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .arg("clean-as-root")
        .write_stdin(r#"{"entries_by_plugin":{}}"#)
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn clean_as_root_skips_unknown_units() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .arg("clean-as-root")
        .write_stdin(r#"{"entries_by_plugin":{"no_such_unit":[]}}"#)
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn clean_as_root_removes_requested_entries() {
    let home = home_with_thumbnails();
    let target = home.path().join(".cache/thumbnails/normal/a.png");
    let request = serde_json::json!({
        "entries_by_plugin": {
            "thumbnails": [{"path": target, "size_bytes": 300}]
        }
    });

    let output = sweep(home.path())
        .arg("clean-as-root")
        .write_stdin(request.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results = stdout_json(&output);
    assert_eq!(
        results,
        serde_json::json!([{
            "plugin_id": "thumbnails",
            "freed_bytes": 300,
            "files_removed": 1,
            "errors": []
        }])
    );
    assert!(!target.exists());
}

#[test]
fn clean_as_root_refuses_paths_outside_unit_scan() {
    let home = home_with_thumbnails();
    let outside = home.path().join("notes.txt");
    fs::write(&outside, "keep me").unwrap();
    let request = serde_json::json!({
        "entries_by_plugin": {
            "thumbnails": [{"path": outside, "size_bytes": 7}]
        }
    });

    let output = sweep(home.path())
        .arg("clean-as-root")
        .write_stdin(request.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results = stdout_json(&output);
    assert_eq!(results[0]["plugin_id"], "thumbnails");
    assert_eq!(results[0]["freed_bytes"], 0);
    let errors = results[0]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().starts_with("Refused "));
    assert!(outside.exists());
    assert!(home.path().join(".cache/thumbnails/normal/a.png").exists());
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    sweep(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sweep"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let home = TempDir::new().unwrap();
    let output = sweep(home.path())
        .args(["-vv", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    // stdout stays machine readable
    stdout_json(&output);
}
