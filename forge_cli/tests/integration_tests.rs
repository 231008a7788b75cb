//! Integration tests for the forge binary.
//!
//! These tests verify end-to-end behavior including:
//! - Plan generation and its JSON shape
//! - Daily task rotation and toggling
//! - Profile, metrics and goal-based tasks
//! - Progress logging, history and CSV rollup

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI with config lookups pointed at an empty directory
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("forge"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn status_json(data_dir: &Path) -> serde_json::Value {
    let output = cli(data_dir)
        .args(["status", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("status --json is not JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("forge"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout plan generator"));
}

#[test]
fn test_plan_text_output() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--level", "beginner", "--days", "3", "--location", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 1 — Chest"))
        .stdout(predicate::str::contains("Day 3 — Legs"));
}

#[test]
fn test_plan_json_is_deterministic() {
    let temp_dir = setup_test_dir();
    let args = ["plan", "--goal", "bulking", "--level", "advanced", "--days", "4", "--json"];

    let first = cli(temp_dir.path()).args(args).assert().success().get_output().stdout.clone();
    let second = cli(temp_dir.path()).args(args).assert().success().get_output().stdout.clone();
    assert_eq!(first, second);

    let json: serde_json::Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(json["cached"], false);
    assert_eq!(json["meta"]["days"], 4);
    assert_eq!(json["meta"]["level"], "advanced");

    let days = json["workouts"].as_array().unwrap();
    assert_eq!(days.len(), 4);
    assert_eq!(days[0]["day"], "Day 1 — Chest / Arms");
    for day in days {
        assert!(day["exercises"].as_array().unwrap().len() <= 8);
    }
}

#[test]
fn test_plan_days_clamped() {
    let temp_dir = setup_test_dir();

    let output = cli(temp_dir.path())
        .args(["plan", "--days", "0", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["workouts"].as_array().unwrap().len(), 1);
    assert_eq!(json["meta"]["days"], 1);
}

#[test]
fn test_status_creates_user_with_five_tasks() {
    let temp_dir = setup_test_dir();

    let json = status_json(temp_dir.path());
    assert_eq!(json["progression"]["points"], 0);
    assert_eq!(json["progression"]["level"], 1);
    assert_eq!(json["progression"]["title"], "Rookie");
    assert_eq!(json["progression"]["today_tasks"].as_array().unwrap().len(), 5);
    assert!(temp_dir.path().join("wal/state.json").exists());

    // Within 24h the same draw comes back
    let again = status_json(temp_dir.path());
    assert_eq!(json["progression"]["today_tasks"], again["progression"]["today_tasks"]);
    assert_eq!(json["id"], again["id"]);
}

#[test]
fn test_toggle_today_task_round_trip() {
    let temp_dir = setup_test_dir();
    status_json(temp_dir.path());

    cli(temp_dir.path())
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("done"))
        .stdout(predicate::str::contains("Points: 10"));

    let json = status_json(temp_dir.path());
    assert_eq!(json["progression"]["points"], 10);
    assert_eq!(json["progression"]["streak"], 1);
    assert_eq!(json["progression"]["today_tasks"][1]["done"], true);

    cli(temp_dir.path())
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pending"));

    let json = status_json(temp_dir.path());
    assert_eq!(json["progression"]["points"], 0);
    assert_eq!(json["progression"]["streak"], 0);
}

#[test]
fn test_toggle_missing_task_fails() {
    let temp_dir = setup_test_dir();
    status_json(temp_dir.path());

    cli(temp_dir.path())
        .args(["toggle", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));

    assert_eq!(status_json(temp_dir.path())["progression"]["points"], 0);
}

#[test]
fn test_profile_and_metrics() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args([
            "profile", "--age", "30", "--sex", "male", "--height", "180", "--weight", "80",
            "--goal", "cutting",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 24.7"))
        .stdout(predicate::str::contains("BMR: 1780"));

    cli(temp_dir.path())
        .arg("metrics")
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI: 24.7"));
}

#[test]
fn test_metrics_without_profile_fails() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("metrics")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no profile stored"));
}

#[test]
fn test_invalid_profile_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args([
            "profile", "--age", "30", "--sex", "female", "--height", "20", "--weight", "60",
            "--goal", "bulking",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("height"));
}

#[test]
fn test_init_tasks_follow_profile_goal() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args([
            "profile", "--age", "25", "--sex", "female", "--height", "165", "--weight", "70",
            "--goal", "bulking",
        ])
        .assert()
        .success();

    cli(temp_dir.path())
        .arg("init-tasks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Weight Training"))
        .stdout(predicate::str::contains("High Protein Meal"))
        .stdout(predicate::str::contains("10 min Meditation"));

    cli(temp_dir.path())
        .args(["toggle", "0", "--category", "workouts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Points: 10"));

    cli(temp_dir.path())
        .args(["toggle", "0", "--category", "meals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Points: 15"));
}

#[test]
fn test_add_task() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["add-task", "meals", "  Protein shake  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("'Protein shake' (5 pts)"));

    cli(temp_dir.path())
        .args(["add-task", "workouts", "Hill sprints", "--points", "20"])
        .assert()
        .success();

    let json = status_json(temp_dir.path());
    assert_eq!(json["progression"]["meals"][0]["name"], "Protein shake");
    assert_eq!(json["progression"]["workouts"][0]["points"], 20);

    cli(temp_dir.path())
        .args(["add-task", "meals", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));

    cli(temp_dir.path())
        .args(["add-task", "today", "Walk the dog"])
        .assert()
        .failure();
}

#[test]
fn test_log_and_history() {
    let temp_dir = setup_test_dir();

    for weight in ["82.0", "81.5", "81.0"] {
        cli(temp_dir.path())
            .args(["log", "--weight", weight, "--points", "10"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Logged"));
    }

    let wal = fs::read_to_string(temp_dir.path().join("wal/progress.wal")).unwrap();
    assert_eq!(wal.lines().count(), 3);

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("82.0 kg"))
        .stdout(predicate::str::contains("Change: -1.0 kg"));
}

#[test]
fn test_rollup_creates_csv() {
    let temp_dir = setup_test_dir();

    for _ in 0..3 {
        cli(temp_dir.path())
            .args(["log", "--weight", "75", "--points", "40"])
            .assert()
            .success();
    }

    cli(temp_dir.path())
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 3 entries"));

    let csv = fs::read_to_string(temp_dir.path().join("progress.csv")).unwrap();
    assert!(csv.starts_with("id,logged_at,weight_kg,points"));

    // Archived entries still show in history
    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("75.0 kg"));
}

#[test]
fn test_rollup_with_cleanup() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["log", "--weight", "90", "--points", "10"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["rollup", "--cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned up 1 processed WAL"));

    let leftovers: Vec<_> = fs::read_dir(temp_dir.path().join("wal"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".wal.processed"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_empty_rollup() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to roll up"));
}

#[test]
fn test_log_rejects_bad_measurements() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["log", "--weight", "450", "--points", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid progress entry"));

    // Points are mandatory
    cli(temp_dir.path())
        .args(["log", "--weight", "80"])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("wal/progress.wal").exists());
}

#[test]
fn test_history_window_is_bounded() {
    let temp_dir = setup_test_dir();

    for days in ["0", "36501", "1000000000000000"] {
        cli(temp_dir.path())
            .args(["history", "--days", days])
            .assert()
            .failure();
    }

    cli(temp_dir.path())
        .args(["history", "--days", "36500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No progress entries"));
}

#[test]
fn test_meals_grouped_and_capped() {
    let temp_dir = setup_test_dir();

    let output = cli(temp_dir.path())
        .args(["meals", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let groups: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let groups = groups.as_array().unwrap();

    let types: Vec<&str> = groups
        .iter()
        .map(|g| g["meal_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["Breakfast", "Lunch", "Snacks", "Dinner"]);
    for group in groups {
        assert_eq!(group["meals"].as_array().unwrap().len(), 4);
    }
}

#[test]
fn test_meals_filters_and_text_output() {
    let temp_dir = setup_test_dir();

    let output = cli(temp_dir.path())
        .args(["meals", "--diet", "vegan", "--phase", "cutting", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let groups: serde_json::Value = serde_json::from_slice(&output).unwrap();
    for group in groups.as_array().unwrap() {
        for meal in group["meals"].as_array().unwrap() {
            assert_eq!(meal["diet"], "vegan");
            assert_eq!(meal["phase"], "Cutting");
        }
    }

    cli(temp_dir.path())
        .args(["meals", "--regen"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Breakfast:"))
        .stdout(predicate::str::contains("kcal"));
}

#[test]
fn test_meals_unknown_diet() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["meals", "--diet", "carnivore"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown diet 'carnivore'"));
}

#[test]
fn test_config_file_overrides_defaults() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("forge.toml");
    fs::write(
        &config_path,
        "[plan]\nlevel = \"beginner\"\ndays = 2\n\n[tasks]\ndaily_points = 25\n",
    )
    .unwrap();

    let output = cli(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["plan", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["meta"]["level"], "beginner");
    assert_eq!(json["meta"]["days"], 2);

    status_json(temp_dir.path());
    cli(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["toggle", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Points: 25"));
}
