use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

const CONTENT: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../content-spec/tests/fixtures/content"
);

fn content() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_content"));
    cmd.env_remove("CONTENT_PATH")
        .env_remove("RUST_LOG")
        .args(["--content-path", CONTENT]);
    cmd
}

fn manifest_args(manifest: &str) -> [&str; 6] {
    [
        "--framework",
        "g-cloud-7",
        "--question-set",
        "services",
        "--manifest",
        manifest,
    ]
}

#[test]
fn sections_lists_numbered_questions() {
    content()
        .arg("sections")
        .args(manifest_args("edit_submission"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Section: First section (first-section)"))
        .stdout(predicate::str::contains("1. firstQuestion (text)"))
        .stdout(predicate::str::contains("[read-only]"))
        .stdout(predicate::str::contains("3. uptime (percentage)"));
}

#[test]
fn sections_filters_by_answers() {
    let temp = TempDir::new().expect("temp dir");
    let answers = temp.child("answers.json");
    answers.write_str(r#"{ "lot": "SaaS" }"#).expect("write answers");

    let output = content()
        .arg("sections")
        .args(manifest_args("lots"))
        .args(["--format", "json", "--answers"])
        .arg(answers.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json output");
    let sections = parsed["sections"].as_array().expect("sections");
    let ids: Vec<&str> = sections
        .iter()
        .filter_map(|section| section["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["saas-only", "everyone"]);
    assert_eq!(sections[1]["questions"][0]["number"], 4);
}

#[test]
fn next_section_honours_editable_flag() {
    content()
        .arg("next-section")
        .args(manifest_args("edit_submission"))
        .args(["--current", "pricing", "--editable"])
        .assert()
        .success()
        .stdout("resilience\n");

    content()
        .arg("next-section")
        .args(manifest_args("edit_submission"))
        .args(["--current", "resilience"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no next section"));
}

#[test]
fn extract_converts_submission() {
    let temp = TempDir::new().expect("temp dir");
    let submission = temp.child("submission.json");
    submission
        .write_str(r#"{ "dataBackup": "Yes", "dataBackup--assurance": " Service provider assertion ", "contactName": "Ada", "unknown": "x" }"#)
        .expect("write submission");

    let output = content()
        .arg("extract")
        .args(manifest_args("edit_submission"))
        .args(["--section", "resilience", "--submission"])
        .arg(submission.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(
        parsed,
        serde_json::json!({
            "dataBackup": { "value": true, "assurance": "Service provider assertion" },
            "contactName": "Ada"
        })
    );
}

#[test]
fn message_renders_placeholders() {
    let temp = TempDir::new().expect("temp dir");
    let context = temp.child("context.json");
    context
        .write_str(r#"{ "closes": "5pm" }"#)
        .expect("write context");

    content()
        .args([
            "message",
            "--framework",
            "g-cloud-7",
            "--block",
            "dashboard",
            "--status",
            "open",
            "--supplier-status",
            "registered",
            "--context",
        ])
        .arg(context.path())
        .assert()
        .success()
        .stdout("Finish your application before 5pm\n");
}

#[test]
fn missing_manifest_fails() {
    content()
        .arg("sections")
        .args(manifest_args("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("content not found"));
}

#[test]
fn config_file_supplies_defaults() {
    let temp = TempDir::new().expect("temp dir");
    let config = temp.child("content.json");
    config
        .write_str(&format!(
            r#"{{ "content_path": "{CONTENT}", "framework": "g-cloud-7", "question_set": "services", "manifest": "edit_submission" }}"#
        ))
        .expect("write config");

    Command::new(env!("CARGO_BIN_EXE_content"))
        .env_remove("CONTENT_PATH")
        .args(["next-section", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout("first-section\n");
}

#[test]
fn schema_describes_question_files() {
    let output = content().arg("schema").output().expect("run");
    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert!(parsed["question"]["properties"]["depends"].is_object());
}
