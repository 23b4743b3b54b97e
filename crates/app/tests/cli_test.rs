//! Integration tests for the `deployable` binary
//!
//! These tests run the compiled binary against descriptors in a temporary
//! directory and check the written output and exit status.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
    <artifactId>demo</artifactId>
    <version>1.0.0-${revision}${changelist}</version>
    <url>https://example.org/${user.name}</url>
    <properties>
        <changelist>-SNAPSHOT</changelist>
    </properties>
</project>
"#;

fn deployable(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deployable"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("REVISION")
        .env_remove("revision")
        .env_remove("SHA1")
        .env_remove("sha1")
        .env_remove("CHANGELIST")
        .env_remove("changelist")
        .output()
        .expect("Failed to run deployable")
}

#[test]
fn test_resolve_default_paths() {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("pom.xml"), POM).unwrap();

    let output = deployable(dir.path(), &["resolve", "-Drevision=5"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(dir.path().join("target/deployable-pom.xml")).unwrap();
    assert!(written.contains("<version>1.0.0-5-SNAPSHOT</version>"));
    assert!(written.contains("<url>https://example.org/${user.name}</url>"));
}

#[test]
fn test_resolve_modules_write_next_to_their_descriptors() {
    let dir = tempdir().expect("Failed to create temp directory");
    for module in ["core", "cli"] {
        fs::create_dir(dir.path().join(module)).unwrap();
        let artifact = format!("<artifactId>{module}</artifactId>");
        let pom = POM.replace("<artifactId>demo</artifactId>", &artifact);
        fs::write(dir.path().join(module).join("pom.xml"), pom).unwrap();
    }

    for descriptor in ["core/pom.xml", "cli/pom.xml"] {
        let output = deployable(dir.path(), &["resolve", descriptor, "-Drevision=1"]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    }

    for module in ["core", "cli"] {
        let written =
            fs::read_to_string(dir.path().join(module).join("target/deployable-pom.xml")).unwrap();
        assert!(written.contains(&format!("<artifactId>{module}</artifactId>")));
    }
    assert!(!dir.path().join("target").exists());
}

#[test]
fn test_resolve_with_environment_and_output() {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("pom.xml"), POM).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_deployable"))
        .args(["resolve", "pom.xml", "-o", "out/pom.xml", "-Dchangelist="])
        .current_dir(dir.path())
        .env("REVISION", "7")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(dir.path().join("out/pom.xml")).unwrap();
    assert!(written.contains("<version>1.0.0-7</version>"));
}

#[test]
fn test_settings_file_sets_output() {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("pom.xml"), POM).unwrap();
    fs::write(
        dir.path().join("deployable.toml"),
        "output = \"dist/pom.xml\"\nlog_level = \"warn\"\n",
    )
    .unwrap();

    let output = deployable(dir.path(), &["resolve"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("dist/pom.xml").exists());
}

#[test]
fn test_recursive_value_fails() {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("pom.xml"), POM).unwrap();

    let output = deployable(dir.path(), &["resolve", "-Drevision=${revision}"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to interpolate CI properties"));
    assert!(!dir.path().join("target/deployable-pom.xml").exists());
}

#[test]
fn test_missing_descriptor_fails() {
    let dir = tempdir().expect("Failed to create temp directory");

    let output = deployable(dir.path(), &["resolve"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Document not found"));
}

#[test]
fn test_scan_lists_placeholders() {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("pom.xml"), POM).unwrap();

    let output = deployable(dir.path(), &["scan", "pom.xml"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("project.version: ${revision}, ${changelist}"));
    assert!(stdout.contains("project.url: ${user.name} (ignored)"));
}
