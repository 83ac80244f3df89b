//! Integration tests for configuration layering.
//!
//! Tests the full priority chain: defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity
#![allow(deprecated)] // cargo_bin deprecation warning

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use clarityx_test_support::SyntheticImageBuilder;
use predicates::prelude::*;

/// Temp project with a mid-grey image and an empty XDG config home.
struct Project {
    dir: tempfile::TempDir,
    image: PathBuf,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("xdg")).unwrap();
        let image = SyntheticImageBuilder::write(
            dir.path(),
            "grey.png",
            &SyntheticImageBuilder::low_contrast_grey(),
        );
        Self { dir, image }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_project_config(&self, toml: &str) {
        fs::write(self.path().join(".clarityx.toml"), toml).unwrap();
    }

    fn write_xdg_config(&self, toml: &str) {
        let dir = self.path().join("xdg").join("clarityx");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), toml).unwrap();
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("clarityx").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"));
        cmd
    }
}

#[test]
fn test_defaults_fail_grey_image() {
    let project = Project::new();

    project.command().arg(&project.image).assert().code(1);
}

#[test]
fn test_project_config_applies_format() {
    let project = Project::new();
    project.write_project_config("[output]\nformat = 'json'\n");

    project
        .command()
        .arg(&project.image)
        .assert()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_cli_overrides_project_config() {
    let project = Project::new();
    project.write_project_config("[output]\nformat = 'json'\n");

    project
        .command()
        .arg("--format")
        .arg("jsonl")
        .arg(&project.image)
        .assert()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_project_config_thresholds() {
    let project = Project::new();
    project.write_project_config(
        r"
[contrast]
threshold = 0.0

[clarity]
threshold = 0.0
",
    );

    project.command().arg(&project.image).assert().code(0);
}

#[test]
fn test_cli_threshold_overrides_project_threshold() {
    let project = Project::new();
    project.write_project_config("[contrast]\nthreshold = 0.0\n\n[clarity]\nthreshold = 0.0\n");

    project
        .command()
        .arg("--contrast-threshold")
        .arg("25")
        .arg(&project.image)
        .assert()
        .code(1);
}

#[test]
fn test_project_config_found_in_parent_directory() {
    let project = Project::new();
    project.write_project_config("[output]\nformat = 'jsonl'\n");
    let nested = project.path().join("sub").join("dir");
    fs::create_dir_all(&nested).unwrap();

    project
        .command()
        .current_dir(&nested)
        .arg(&project.image)
        .assert()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_invalid_config_value_warns() {
    let project = Project::new();
    project.write_project_config("[clarity]\nthreshold = 250.0\n");

    project
        .command()
        .arg(&project.image)
        .assert()
        .stderr(predicate::str::contains("clarity.threshold must be 0-100"));
}

#[test]
fn test_unparseable_config_is_ignored() {
    let project = Project::new();
    project.write_project_config("[output\nformat = 'json'\n");

    project
        .command()
        .arg(&project.image)
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("file,"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_xdg_config_applies() {
    let project = Project::new();
    project.write_xdg_config("[output]\nformat = 'jsonl'\n");

    project
        .command()
        .arg(&project.image)
        .assert()
        .stdout(predicate::str::starts_with("{"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_project_config_overrides_xdg() {
    let project = Project::new();
    project.write_xdg_config("[output]\nformat = 'jsonl'\n\n[general]\nworkers = 2\n");
    project.write_project_config("[output]\nformat = 'json'\n");

    project
        .command()
        .arg(&project.image)
        .assert()
        .stdout(predicate::str::starts_with("["));
}
