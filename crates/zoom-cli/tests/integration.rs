#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn zoom(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("zoom").unwrap();
    cmd.current_dir(dir.path()).env("ZOOM_ROOT", dir.path());
    cmd
}

fn init_root(dir: &TempDir) {
    zoom(dir).arg("init").assert().success();
}

const DEMO: &str = "# Project: Demo\n## Level 0 Actions (Next 15 minutes)\n- [ ] Write tests\n- [x] Draft design\n";

fn write_demo(dir: &TempDir) {
    std::fs::write(dir.path().join("projects/demo.md"), DEMO).unwrap();
}

fn read_demo(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("projects/demo.md")).unwrap()
}

fn status_json(dir: &TempDir) -> serde_json::Value {
    let out = zoom(dir).args(["status", "--json"]).output().unwrap();
    assert!(out.status.success());
    serde_json::from_slice(&out.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// zoom init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_projects_dir() {
    let dir = TempDir::new().unwrap();
    zoom(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .zoom/config.yaml"));

    assert!(dir.path().join(".zoom/config.yaml").exists());
    assert!(dir.path().join("projects").is_dir());

    let yaml = std::fs::read_to_string(dir.path().join(".zoom/config.yaml")).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(value["projects_dir"], serde_yaml::Value::from("projects"));
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    zoom(&dir).arg("init").assert().success();
    zoom(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .zoom/config.yaml"));
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();
    zoom(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("zoom init"));
}

// ---------------------------------------------------------------------------
// zoom project
// ---------------------------------------------------------------------------

#[test]
fn project_new_scaffolds_all_levels() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);

    zoom(&dir)
        .args(["project", "new", "Home", "Renovation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("home-renovation.md"));

    let text = std::fs::read_to_string(dir.path().join("projects/home-renovation.md")).unwrap();
    assert!(text.starts_with("# Project: Home Renovation\n"));
    for heading in ["## Level 0", "## Level 1", "## Level 2", "## Level 3", "## Level 4"] {
        assert!(text.contains(heading), "missing {heading}");
    }

    zoom(&dir)
        .args(["project", "new", "Home Renovation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn project_list_shows_names_and_files() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);

    zoom(&dir)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo").and(predicate::str::contains("demo.md")));
}

// ---------------------------------------------------------------------------
// zoom status / plan / level
// ---------------------------------------------------------------------------

#[test]
fn status_reports_completion() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);

    let json = status_json(&dir);
    assert_eq!(json["projects"][0]["name"], "Demo");
    assert_eq!(json["projects"][0]["total_tasks"], 2);
    assert_eq!(json["projects"][0]["completed_tasks"], 1);
    assert_eq!(json["projects"][0]["completion_rate"], 50);

    zoom(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("1/2 (50%)"));
}

#[test]
fn plan_groups_tasks_by_level() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);

    zoom(&dir)
        .args(["plan", "Demo"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Level 0 Actions (Next 15 minutes)")
                .and(predicate::str::contains("[ ] Write tests"))
                .and(predicate::str::contains("[x] Draft design")),
        );

    zoom(&dir)
        .args(["plan", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project not found"));
}

#[test]
fn level_view_hides_done_with_open_flag() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);

    zoom(&dir)
        .args(["level", "0", "--open"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Write tests").and(predicate::str::contains("Draft design").not()),
        );

    zoom(&dir)
        .args(["level", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid level"));
}

// ---------------------------------------------------------------------------
// zoom task
// ---------------------------------------------------------------------------

#[test]
fn complete_by_project_name_reaches_full_completion() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);

    zoom(&dir)
        .args(["task", "complete", "Demo", "Write", "tests"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: Write tests"));

    assert!(read_demo(&dir).contains("- [x] Write tests"));
    let json = status_json(&dir);
    assert_eq!(json["projects"][0]["completed_tasks"], 2);
    assert_eq!(json["projects"][0]["completion_rate"], 100);
}

#[test]
fn complete_requires_exact_description() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);

    zoom(&dir)
        .args(["task", "complete", "demo.md", "Write"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found"));
    assert_eq!(read_demo(&dir), DEMO);
}

#[test]
fn reopen_then_complete_again() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);

    zoom(&dir)
        .args(["task", "reopen", "demo.md", "Draft design"])
        .assert()
        .success();
    assert!(read_demo(&dir).contains("- [ ] Draft design"));
    assert_eq!(status_json(&dir)["projects"][0]["completed_tasks"], 0);
}

#[test]
fn add_inserts_into_level_section() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    zoom(&dir).args(["project", "new", "Garden"]).assert().success();

    zoom(&dir)
        .args(["task", "add", "Garden", "--level", "today", "Water", "the", "beds"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to Level 1 Today: Water the beds"));

    let out = zoom(&dir)
        .args(["level", "1", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["tasks"][0]["description"], "Water the beds");
    assert_eq!(json["tasks"][0]["project_name"], "Garden");
    assert_eq!(json["tasks"][0]["completed"], false);
}

#[test]
fn add_to_missing_section_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);

    zoom(&dir)
        .args(["task", "add", "demo.md", "--level", "3", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Level 3 section not found in project Demo",
        ));
    assert_eq!(read_demo(&dir), DEMO);
}

#[test]
fn task_paths_cannot_escape_projects_dir() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    std::fs::write(dir.path().join("outside.md"), "- [ ] a\n").unwrap();

    zoom(&dir)
        .args(["task", "complete", "../outside.md", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid path"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("outside.md")).unwrap(),
        "- [ ] a\n"
    );
}

// ---------------------------------------------------------------------------
// zoom config / analyze
// ---------------------------------------------------------------------------

#[test]
fn config_validate_passes_after_init() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    zoom(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_set_backend_persists() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    zoom(&dir)
        .args([
            "config",
            "set-backend",
            "--type",
            "anthropic_api",
            "--model",
            "claude-haiku-4-5",
            "--timeout",
            "30",
        ])
        .assert()
        .success();

    let out = zoom(&dir).args(["config", "show", "--json"]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["llm"]["backend"]["type"], "anthropic_api");
    assert_eq!(json["llm"]["backend"]["model"], "claude-haiku-4-5");
    assert_eq!(json["llm"]["timeout_secs"], 30);
}

#[test]
fn analyze_reports_missing_api_key() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    zoom(&dir)
        .args([
            "config",
            "set-backend",
            "--type",
            "anthropic_api",
            "--api-key-env",
            "ZOOM_IT_UNSET_API_KEY",
        ])
        .assert()
        .success();

    zoom(&dir)
        .env_remove("ZOOM_IT_UNSET_API_KEY")
        .args(["analyze", "what", "next?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ZOOM_IT_UNSET_API_KEY"));
}

#[test]
fn analyze_reports_missing_claude_binary() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    write_demo(&dir);
    zoom(&dir)
        .args([
            "config",
            "set-backend",
            "--type",
            "claude_cli",
            "--executable",
            "/nonexistent/claude",
        ])
        .assert()
        .success();

    zoom(&dir)
        .args(["analyze", "--project", "Demo", "what next?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("analysis via claude-cli failed"));
    assert_eq!(read_demo(&dir), DEMO);
}
