//! Integration tests for the Bindery CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a project directory with the given files
fn create_project(dir: &TempDir, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let root = dir.path().join(name);
    for (path, content) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).expect("Failed to write test file");
    }
    root
}

fn simple_project(dir: &TempDir) -> PathBuf {
    create_project(
        dir,
        "book",
        &[
            ("meta", "title = My Book\nauthor = A. Writer\nlanguage = en\n"),
            ("chapters/01.md", "# Hello\n\nFirst chapter."),
            ("chapters/02.md", "# Again\n\nSecond chapter."),
        ],
    )
}

fn bindery() -> Command {
    Command::cargo_bin("bindery-cli").unwrap()
}

/// Entry names in archive order
fn zip_names(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_help() {
    bindery()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_version() {
    bindery()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bindery"));
}

#[test]
fn test_build_help() {
    bindery()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--require-cover"))
        .stdout(predicate::str::contains("--cover-linkage"))
        .stdout(predicate::str::contains("--stylesheet"))
        .stdout(predicate::str::contains("--directory"));
}

#[test]
fn test_usage_error_exits_one() {
    bindery().arg("build").assert().code(1);
    bindery().arg("frobnicate").assert().code(1);
}

#[test]
fn test_build_default_output() {
    let temp_dir = TempDir::new().unwrap();
    let project = simple_project(&temp_dir);

    bindery()
        .args(["build", project.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 'My Book' (2 chapters"));

    let output = temp_dir.path().join("book.epub");
    assert!(output.exists(), "Output file should exist");

    let names = zip_names(&output);
    assert_eq!(names[0], "mimetype");
    assert!(names.contains(&"epub/01.html".to_string()));
    assert!(names.contains(&"epub/02.html".to_string()));
    assert!(names.contains(&"epub/style.css".to_string()));
}

#[test]
fn test_build_explicit_output_and_info() {
    let temp_dir = TempDir::new().unwrap();
    let project = simple_project(&temp_dir);
    let output = temp_dir.path().join("out.epub");

    bindery()
        .args(["build", project.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .success();

    bindery()
        .args(["info", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("My Book"))
        .stdout(predicate::str::contains("A. Writer"))
        .stdout(predicate::str::contains("Chapters:   2"));

    let assert = bindery()
        .args(["info", "--json", output.to_str().unwrap()])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(json["title"], "My Book");
    assert_eq!(json["language"], "en");
    assert_eq!(json["chapters"], 2);
    assert!(json["cover"].is_null());
}

#[test]
fn test_build_fatal_error_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(
        &temp_dir,
        "book",
        &[
            ("meta", "title = T\nauthor = A\nlanguage = en\n"),
            ("chapters/01.html", "<p>no heading</p>"),
        ],
    );
    let output = temp_dir.path().join("book.epub");

    bindery()
        .args(["build", project.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("doesn't have chapter titles"));

    assert!(!output.exists(), "No output may be created on fatal errors");
}

#[test]
fn test_build_invalid_title() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(
        &temp_dir,
        "book",
        &[
            ("meta", "title = T\nauthor = A\nlanguage = en\n"),
            ("chapters/01.html", "<h1><b>bold</b></h1>"),
        ],
    );

    bindery()
        .args(["build", project.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("01.html"));
}

#[test]
fn test_build_require_cover() {
    let temp_dir = TempDir::new().unwrap();
    let project = simple_project(&temp_dir);

    bindery()
        .args(["build", "--require-cover", project.to_str().unwrap()])
        .assert()
        .failure();
    assert!(!temp_dir.path().join("book.epub").exists());

    fs::write(project.join("cover.jpg"), [0xFFu8, 0xD8, 0xFF]).unwrap();
    bindery()
        .args([
            "build",
            "--require-cover",
            "--cover-linkage",
            "property",
            project.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("cover"));

    let output = temp_dir.path().join("book.epub");
    bindery()
        .args(["info", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cover:      cover.jpg"));
}

#[test]
fn test_build_custom_stylesheet() {
    let temp_dir = TempDir::new().unwrap();
    let project = simple_project(&temp_dir);
    let css = temp_dir.path().join("custom.css");
    fs::write(&css, "body { color: teal; }").unwrap();
    let output = temp_dir.path().join("tree");

    bindery()
        .args([
            "build",
            "--directory",
            "--stylesheet",
            css.to_str().unwrap(),
            project.to_str().unwrap(),
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(output.join("epub/style.css")).unwrap(),
        "body { color: teal; }"
    );
    assert_eq!(
        fs::read_to_string(output.join("mimetype")).unwrap(),
        "application/epub+zip"
    );
    assert!(output.join("epub/content.opf").is_file());
}

#[test]
fn test_build_missing_stylesheet() {
    let temp_dir = TempDir::new().unwrap();
    let project = simple_project(&temp_dir);

    bindery()
        .args([
            "build",
            "--stylesheet",
            "/nonexistent/style.css",
            project.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Stylesheet not found"));
    assert!(!temp_dir.path().join("book.epub").exists());
}

#[test]
fn test_build_missing_project() {
    bindery()
        .args(["build", "/nonexistent/project"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project directory not found"));
}

#[test]
fn test_check() {
    let temp_dir = TempDir::new().unwrap();
    let project = simple_project(&temp_dir);

    bindery()
        .args(["check", project.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 'My Book'"));

    assert!(!temp_dir.path().join("book.epub").exists());
}

#[test]
fn test_check_strict_fails_on_diagnostics() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(
        &temp_dir,
        "book",
        &[
            ("meta", "title = T\nauthor = A\nlanguage = en\n"),
            ("chapters/01.html", "<h1>One</h1>\n<p>never closed\n"),
        ],
    );

    bindery()
        .args(["check", project.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("not well-formed"));

    bindery()
        .args(["check", "--strict", project.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn test_check_unknown_extension() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(
        &temp_dir,
        "book",
        &[
            ("meta", "title = T\nauthor = A\nlanguage = en\n"),
            ("chapters/01.md", "# One"),
            ("images/logo.svg", "<svg/>"),
        ],
    );

    bindery()
        .args(["check", project.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("logo.svg"));
}

#[test]
fn test_init_then_build() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("novel");

    bindery()
        .args(["init", project.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(project.join("chapters/0.html")).unwrap(),
        "<h1>Chapter 1</h1>\n"
    );
    let meta = fs::read_to_string(project.join("meta")).unwrap();
    assert!(meta.contains("title = novel"));
    assert!(meta.contains("language = en"));

    bindery()
        .args(["build", project.to_str().unwrap()])
        .assert()
        .success();
    assert!(temp_dir.path().join("novel.epub").exists());
}

#[test]
fn test_init_existing_directory() {
    let temp_dir = TempDir::new().unwrap();

    bindery()
        .args(["init", temp_dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_info_nonexistent_file() {
    bindery()
        .args(["info", "/nonexistent/file.epub"])
        .assert()
        .failure();
}

#[test]
fn test_info_not_a_package() {
    let temp_dir = TempDir::new().unwrap();
    let bogus = temp_dir.path().join("bogus.epub");
    fs::write(&bogus, "definitely not a zip").unwrap();

    bindery()
        .args(["info", bogus.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read package"));
}

#[test]
fn test_verbose_flag() {
    let temp_dir = TempDir::new().unwrap();
    let project = simple_project(&temp_dir);

    bindery()
        .args(["--verbose", "check", project.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_rename() {
    let temp_dir = TempDir::new().unwrap();
    let project = simple_project(&temp_dir);
    let output = temp_dir.path().join("draft.epub");

    bindery()
        .args(["build", project.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .success();

    let renamed = temp_dir.path().join("A. Writer - My Book.epub");

    bindery()
        .args(["rename", "--dry-run", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("A. Writer - My Book.epub"));
    assert!(output.exists());
    assert!(!renamed.exists());

    bindery()
        .args(["rename", output.to_str().unwrap()])
        .assert()
        .success();
    assert!(!output.exists());
    assert!(renamed.exists());

    bindery()
        .args(["rename", renamed.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("same"));
}

#[test]
fn test_rename_without_author() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("anonymous");

    bindery()
        .args(["init", project.to_str().unwrap()])
        .assert()
        .success();
    bindery()
        .args(["build", project.to_str().unwrap()])
        .assert()
        .success();

    let package = temp_dir.path().join("anonymous.epub");
    bindery()
        .args(["rename", package.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("couldn't get title or author"));
    assert!(package.exists());
}
