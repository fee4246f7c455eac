#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn craig(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("craig").unwrap();
    cmd.current_dir(dir.path())
        .env("CRAIG_ROOT", dir.path())
        .env_remove("CRAIG_DRY_RUN")
        .env_remove("SLACK_BOT_TOKEN")
        .env_remove("SENDGRID_API_KEY")
        .env_remove("COMPLIANCE_API_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

const THREE_TIERS: &str = r#"
outstanding_tasks:
  - email: sarah@company.com
    name: Sarah Chen
    first_name: Sarah
    task_name: Security Awareness Training
    task_url: https://training.example.com/abc123
    days_overdue: 3
  - email: mike@company.com
    name: Mike Johnson
    first_name: Mike
    task_name: Policy Acknowledgment
    task_url: https://policies.example.com/ack
    days_overdue: 10
  - email: lisa@company.com
    name: Lisa Park
    first_name: Lisa
    task_name: Access Review
    task_url: https://reviews.example.com/q3
    days_overdue: 20
    manager_email: m@x.com
weekly_digest:
  compliance_percentage: 87.0
  previous_percentage: 82.5
  completed_this_week:
    - { name: Ann, task: Security Awareness Training }
  outstanding_items:
    - { name: Lisa Park, task: Access Review, days_overdue: 20 }
  upcoming_deadlines:
    - { name: Q4 Access Review, date: "2026-12-01" }
"#;

const NO_MANAGER: &str = r#"
outstanding_tasks:
  - email: tom@company.com
    name: Tom Reed
    first_name: Tom
    task_name: Background Check Consent
    task_url: https://hr.example.com/consent
    days_overdue: 30
"#;

/// `.craig/config.yaml` pointing at a fixture file, with the given memory block.
fn setup(dir: &TempDir, fixture: &str, memory: &str) {
    std::fs::create_dir_all(dir.path().join(".craig")).unwrap();
    std::fs::write(dir.path().join("fixture.yaml"), fixture).unwrap();
    let config = format!(
        "company:\n  name: Acme\n  frameworks: [SOC 2]\n\
         escalation:\n  first_email_days: 8\n  manager_cc_days: 15\n\
         source:\n  type: fixture\n  path: fixture.yaml\n\
         memory:\n{memory}\n"
    );
    std::fs::write(dir.path().join(".craig/config.yaml"), config).unwrap();
}

fn setup_volatile(dir: &TempDir, fixture: &str) {
    setup(dir, fixture, "  type: volatile");
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// ---------------------------------------------------------------------------
// craig init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_default_config() {
    let dir = TempDir::new().unwrap();
    craig(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let data = std::fs::read_to_string(dir.path().join(".craig/config.yaml")).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&data).unwrap();
    assert_eq!(value["escalation"]["first_email_days"], 8);
    assert_eq!(value["escalation"]["manager_cc_days"], 15);
    assert_eq!(value["slack"]["channel"], "#compliance-updates");
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    craig(&dir).arg("init").assert().success();
    std::fs::write(
        dir.path().join(".craig/config.yaml"),
        "company:\n  name: Kept\n",
    )
    .unwrap();

    craig(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    let data = std::fs::read_to_string(dir.path().join(".craig/config.yaml")).unwrap();
    assert!(data.contains("Kept"));
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();
    craig(&dir)
        .args(["daily-check", "--dry-run"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("craig init"));
}

// ---------------------------------------------------------------------------
// craig daily-check
// ---------------------------------------------------------------------------

#[test]
fn daily_check_dry_run_prints_summary() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    craig(&dir)
        .args(["daily-check", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting daily compliance check for Acme"))
        .stdout(predicate::str::contains("Tasks checked:    3"))
        .stdout(predicate::str::contains("Chat reminders:   1"))
        .stdout(predicate::str::contains("Emails:           2"))
        .stdout(predicate::str::contains("Escalations:      1"))
        .stdout(predicate::str::contains("nothing was sent"));
}

#[test]
fn daily_check_json_counts_each_tier() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    let json = json_stdout(craig(&dir).args(["daily-check", "--dry-run", "--json"]));
    let result = &json["result"];
    assert_eq!(json["dry_run"], true);
    assert!(json["run_id"].as_str().is_some());
    assert_eq!(result["total_checked"], 3);
    assert_eq!(result["channel_counts"]["chat"], 1);
    assert_eq!(result["channel_counts"]["email"], 2);
    assert_eq!(result["escalations"], 1);
    assert_eq!(result["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn dry_run_from_env_var() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    craig(&dir)
        .env("CRAIG_DRY_RUN", "true")
        .arg("daily-check")
        .assert()
        .success();
}

#[test]
fn daily_check_without_credentials_fails() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    craig(&dir)
        .arg("daily-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SLACK_BOT_TOKEN"));
}

#[test]
fn escalation_without_manager_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, NO_MANAGER);

    craig(&dir)
        .args(["daily-check", "--dry-run"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Emails:           1"))
        .stdout(predicate::str::contains("no manager email on file"))
        .stderr(predicate::str::contains("1 error(s)"));
}

#[test]
fn missing_fixture_is_a_run_failure() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);
    std::fs::remove_file(dir.path().join("fixture.yaml")).unwrap();

    craig(&dir)
        .args(["daily-check", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("compliance source"));
}

#[test]
fn durable_memory_dedups_across_runs() {
    let dir = TempDir::new().unwrap();
    setup(&dir, THREE_TIERS, "  type: durable");

    let first = json_stdout(craig(&dir).args(["daily-check", "--dry-run", "--json"]));
    assert_eq!(first["result"]["channel_counts"]["chat"], 1);
    assert!(dir.path().join(".craig/reminders.redb").exists());

    let second = json_stdout(craig(&dir).args(["daily-check", "--dry-run", "--json"]));
    assert_eq!(second["result"]["total_checked"], 3);
    assert_eq!(second["result"]["escalations"], 0);
    let counts = second["result"]["channel_counts"].as_object().unwrap();
    assert!(counts.values().all(|n| n == 0));
}

#[test]
fn volatile_memory_does_not_persist() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    craig(&dir).args(["daily-check", "--dry-run"]).assert().success();
    let second = json_stdout(craig(&dir).args(["daily-check", "--dry-run", "--json"]));
    assert_eq!(second["result"]["channel_counts"]["chat"], 1);
}

// ---------------------------------------------------------------------------
// craig weekly-summary
// ---------------------------------------------------------------------------

#[test]
fn weekly_summary_dry_run_posts() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    craig(&dir)
        .args(["weekly-summary", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compliance-updates"));
}

#[test]
fn weekly_summary_without_data_still_posts() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, NO_MANAGER);

    let json = json_stdout(craig(&dir).args(["weekly-summary", "--dry-run", "--json"]));
    assert_eq!(json["summary_posted"], true);
    assert!(json.get("error").is_none());
}

#[test]
fn weekly_summary_source_failure_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, "weekly_digest: [not, a, map]\n");

    craig(&dir)
        .args(["weekly-summary", "--dry-run"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// craig query / celebrate / test
// ---------------------------------------------------------------------------

#[test]
fn query_without_text_fails() {
    let dir = TempDir::new().unwrap();
    craig(&dir)
        .arg("query")
        .assert()
        .failure()
        .stderr(predicate::str::contains("please provide a question"));
}

#[test]
fn query_reports_not_supported() {
    let dir = TempDir::new().unwrap();
    craig(&dir)
        .args(["query", "Who needs to complete training?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not supported yet"));
}

#[test]
fn celebrate_dry_run() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    craig(&dir)
        .args([
            "celebrate",
            "sarah@company.com",
            "Sarah",
            "Security Awareness Training",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Celebrated Sarah"));
}

#[test]
fn test_command_passes_in_dry_run() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    craig(&dir)
        .args(["test", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS"))
        .stdout(predicate::str::contains("3 outstanding task(s)"))
        .stdout(predicate::str::contains("FAIL").not());
}

#[test]
fn test_command_reports_missing_credentials() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);

    let json: serde_json::Value = serde_json::from_slice(
        &craig(&dir)
            .args(["test", "--json"])
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone(),
    )
    .unwrap();
    let probes = json.as_array().unwrap();
    assert_eq!(probes.len(), 4);
    assert_eq!(probes[0]["integration"], "chat");
    assert_eq!(probes[0]["passed"], false);
    assert_eq!(probes[2]["passed"], true);
    assert_eq!(probes[3]["passed"], true);
}

// ---------------------------------------------------------------------------
// craig config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_default_is_clean() {
    let dir = TempDir::new().unwrap();
    craig(&dir).arg("init").assert().success();
    craig(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_rejects_inverted_thresholds() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".craig")).unwrap();
    std::fs::write(
        dir.path().join(".craig/config.yaml"),
        "escalation:\n  first_email_days: 15\n  manager_cc_days: 8\n",
    )
    .unwrap();

    craig(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_show_json_applies_dry_run_flag() {
    let dir = TempDir::new().unwrap();
    craig(&dir).arg("init").assert().success();

    let json = json_stdout(craig(&dir).args(["config", "show", "--json", "--dry-run"]));
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["source"]["type"], "http");
}

#[test]
fn config_show_with_zero_first_email_days() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".craig")).unwrap();
    std::fs::write(
        dir.path().join(".craig/config.yaml"),
        "escalation:\n  first_email_days: 0\n  manager_cc_days: 5\n",
    )
    .unwrap();

    craig(&dir).args(["config", "validate"]).assert().success();
    craig(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "chat below day 0, email from day 0, manager CC from day 5",
        ));
}

#[test]
fn config_set_thresholds_saves_and_reloads() {
    let dir = TempDir::new().unwrap();
    craig(&dir).arg("init").assert().success();

    craig(&dir)
        .args(["config", "set-thresholds", "--first-email", "5", "--manager-cc", "12"])
        .assert()
        .success();

    let json = json_stdout(craig(&dir).args(["config", "show", "--json"]));
    assert_eq!(json["escalation"]["first_email_days"], 5);
    assert_eq!(json["escalation"]["manager_cc_days"], 12);
}

#[test]
fn config_set_thresholds_rejects_inverted_pair() {
    let dir = TempDir::new().unwrap();
    craig(&dir).arg("init").assert().success();

    craig(&dir)
        .args(["config", "set-thresholds", "--first-email", "15", "--manager-cc", "8"])
        .assert()
        .failure();

    let json = json_stdout(craig(&dir).args(["config", "show", "--json"]));
    assert_eq!(json["escalation"]["first_email_days"], 8);
}

#[test]
fn weekly_summary_reports_unreadable_source_as_outcome() {
    let dir = TempDir::new().unwrap();
    setup_volatile(&dir, THREE_TIERS);
    std::fs::remove_file(dir.path().join("fixture.yaml")).unwrap();

    let output = craig(&dir)
        .args(["weekly-summary", "--dry-run", "--json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error running weekly summary"))
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["summary_posted"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("cannot read fixture"));
}
