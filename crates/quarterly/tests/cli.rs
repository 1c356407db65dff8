use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CREDENTIAL_VARS: &[&str] = &[
    "AZURE_LANGUAGE_ENDPOINT",
    "AZURE_LANGUAGE_KEY",
    "FOUNDRY_API_KEY",
    "FOUNDRY_ENDPOINT",
    "FOUNDRY_MODEL",
    "QUARTERLY_OUTPUT_DIR",
    "QUARTERLY_CONFIG",
];

/// Command running in `dir` with no service credentials.
fn quarterly(dir: &Path) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("quarterly").into();
    cmd.current_dir(dir);
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

fn json_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".json"))
        .collect();
    names.sort();
    names
}

const RECORD: &str = r#"{
    "filename": "ADM-Q1-2024.pdf",
    "results": {
        "sentiment": "positive",
        "confidence_scores": {"positive": 0.8, "neutral": 0.15, "negative": 0.05},
        "key_phrases": ["Nutrition", "crush margins"],
        "summary": "Revenue grew."
    }
}"#;

// --- Binary startup ---

#[test]
fn binary_runs() {
    let mut cmd: Command = cargo_bin_cmd!("quarterly").into();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("quarterly"));
}

// --- Extract ---

#[test]
fn extract_prints_normalized_text() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("q1.txt"),
        "Operator: Welcome.\nCopyright © 2024 S&P Global Market Intelligence, a division of S&P Global Inc.\n1\nRevenue   grew.\u{c}Next page.\n",
    )
    .unwrap();

    quarterly(tmp.path())
        .args(["extract", "q1.txt"])
        .assert()
        .success()
        .stdout("Operator: Welcome. Revenue grew. Next page.\n");
}

#[test]
fn extract_missing_file_fails() {
    let tmp = TempDir::new().unwrap();

    quarterly(tmp.path())
        .args(["extract", "absent.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn extract_unsupported_type_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("q1.docx"), "binary").unwrap();

    quarterly(tmp.path())
        .args(["extract", "q1.docx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported document type"));
}

// --- Run ---

#[test]
fn run_with_missing_documents_writes_nothing() {
    let tmp = TempDir::new().unwrap();

    quarterly(tmp.path())
        .args(["run", "ADM-Q1-2024.pdf", "ADM-Q2-2024.pdf"])
        .assert()
        .success()
        .stderr(predicate::str::contains("0 persisted, 2 skipped, 0 failed"));

    assert!(json_files(tmp.path()).is_empty());
    assert!(!tmp.path().join("earnings_analysis.md").exists());
}

#[test]
fn run_without_credentials_skips_analysis() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("q1.txt"), "Revenue grew.").unwrap();

    quarterly(tmp.path())
        .args(["run", "q1.txt", "--output-dir", "out"])
        .assert()
        .success()
        .stderr(predicate::str::contains("language service not configured"));

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn run_without_documents() {
    let tmp = TempDir::new().unwrap();

    quarterly(tmp.path())
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("No documents to process"));
}

#[test]
fn run_reads_documents_from_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("quarterly.toml"),
        "documents = [\"q1.pdf\", \"q2.pdf\", \"q3.pdf\"]\n",
    )
    .unwrap();

    quarterly(tmp.path())
        .args(["--config", "quarterly.toml", "run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("0 persisted, 3 skipped, 0 failed"));
}

#[test]
fn run_with_invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("quarterly.toml"), "documents = 3\n").unwrap();

    quarterly(tmp.path())
        .args(["run", "--config", "quarterly.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn run_with_invalid_footer_pattern_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("quarterly.toml"),
        "[normalizer]\nfooter_patterns = [\"(unclosed\"]\n",
    )
    .unwrap();

    quarterly(tmp.path())
        .args(["run", "-c", "quarterly.toml", "q1.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid footer pattern"));
}

// --- Synthesize ---

#[test]
fn synthesize_without_key_writes_no_report() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("transcript_1.json"), RECORD).unwrap();

    quarterly(tmp.path())
        .args(["synthesize", "transcript_1.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("FOUNDRY_API_KEY is not set"));

    assert!(!tmp.path().join("earnings_analysis.md").exists());
}

#[test]
fn synthesize_rejects_invalid_record() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("transcript_1.json"), "{\"filename\": 1}").unwrap();

    quarterly(tmp.path())
        .args(["synthesize", "transcript_1.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load records"));
}

#[test]
fn synthesize_requires_records() {
    let tmp = TempDir::new().unwrap();

    quarterly(tmp.path()).arg("synthesize").assert().failure();
}
