use std::io::Write;

use assert_cmd::Command;
use tempfile::TempDir;

fn network_available() -> bool {
    let config = ureq::Agent::config_builder()
        .timeout_connect(Some(std::time::Duration::from_secs(2)))
        .timeout_global(Some(std::time::Duration::from_secs(5)))
        .build();
    let agent = ureq::Agent::new_with_config(config);
    agent
        .get("https://export.arxiv.org/api/query?search_query=cat:cs.NE&max_results=1")
        .call()
        .map(|res| !res.status().is_server_error())
        .unwrap_or(false)
}

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("digest.toml");
    let mut file = std::fs::File::create(&path).expect("config file");
    file.write_all(body.as_bytes()).expect("write config");
    path
}

const CONFIG: &str = r#"
[search]
max_results = 25

[criteria]
authors = ["Jeff Hawkins"]
topics = ["Predictive Coding"]
categories = ["cs.NE"]

[mail]
smtp_host = "smtp.example.com"
username = "digest@example.com"
password = "unused-in-dry-run"
from = "digest@example.com"
to = "reader@example.com"
"#;

#[test]
fn help_describes_the_flags() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("arxiv-digest")?;
    let output = cmd.arg("--help").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--date"));
    assert!(stdout.contains("--dry-run"));
    Ok(())
}

#[test]
fn missing_config_fails_without_sending() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("arxiv-digest")?;
    cmd.env("NO_COLOR", "1");

    let output = cmd
        .arg("--config")
        .arg("/no/such/digest.toml")
        .arg("--dry-run")
        .output()?;
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let stderr = String::from_utf8(strip_ansi_escapes::strip(output.stderr))?;
    assert!(stdout.is_empty(), "no report should be rendered, got=\n{stdout}");
    assert!(
        stderr.contains("failed to load config"),
        "stderr mismatch. stderr=\n{stderr}"
    );
    Ok(())
}

#[test]
fn invalid_criteria_fail_validation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, &CONFIG.replace("topics = [\"Predictive Coding\"]", "topics = []"));

    let mut cmd = Command::cargo_bin("arxiv-digest")?;
    cmd.env("NO_COLOR", "1");
    let output = cmd.arg("--config").arg(&path).arg("--dry-run").output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(strip_ansi_escapes::strip(output.stderr))?;
    assert!(
        stderr.contains("criteria.topics"),
        "stderr mismatch. stderr=\n{stderr}"
    );
    Ok(())
}

#[test]
fn dry_run_renders_a_dated_report() -> Result<(), Box<dyn std::error::Error>> {
    if !network_available() {
        eprintln!("skipping dry_run_renders_a_dated_report: network unavailable");
        return Ok(());
    }

    let dir = TempDir::new()?;
    let path = write_config(&dir, CONFIG);

    let mut cmd = Command::cargo_bin("arxiv-digest")?;
    cmd.env("NO_COLOR", "1");
    let output = cmd
        .arg("--config")
        .arg(&path)
        .arg("--date")
        .arg("2025-06-05")
        .arg("--dry-run")
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    // Target date is the run date minus the default two-day lag.
    assert!(
        stdout.contains("<h1>Arxiv Daily Digest for 2025-06-03</h1>"),
        "stdout mismatch. stdout=\n{stdout}"
    );
    let stderr = String::from_utf8(strip_ansi_escapes::strip(output.stderr))?;
    assert!(stderr.contains("✓"), "stderr summary mismatch. stderr=\n{stderr}");
    Ok(())
}
