use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn repolens(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.env_remove("RUST_LOG").arg("--root").arg(root);
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let assert = cmd.assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn tree_hides_ignored_and_default_excluded_entries() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("README.md"), &"r".repeat(50));
    write_file(&temp.path().join(".gitignore"), "build/\n");
    write_file(&temp.path().join(".git/HEAD"), "ref: refs/heads/main");
    write_file(&temp.path().join("build/out.o"), "o");
    write_file(&temp.path().join("node_modules/pkg/index.js"), "");

    let out = stdout_of(repolens(temp.path()).arg("tree"));

    assert!(out.contains("📄 README.md (50.0 B)"));
    assert!(out.contains("📄 .gitignore"));
    assert!(!out.contains("build"));
    assert!(!out.contains(".git/"));
    assert!(!out.contains("node_modules"));
}

#[test]
fn tree_json_reports_summary_at_depth_limit() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a/b/c.txt"), "hello");
    write_file(&temp.path().join("a/b/d.txt"), "hi");

    let out = stdout_of(
        repolens(temp.path())
            .args(["--format", "json", "tree", "--depth", "2"]),
    );
    let tree: Value = serde_json::from_str(&out).expect("valid json");

    assert_eq!(tree["type"], "directory");
    let a = &tree["children"][0];
    assert_eq!(a["path"], "a");
    let b = &a["children"][0];
    assert_eq!(b["path"], "a/b");
    assert!(b.get("children").is_none());
    assert_eq!(b["summary"]["file_count"], 2);
    assert_eq!(b["summary"]["dir_count"], 0);
    assert_eq!(b["summary"]["total_size"], 7);
}

#[test]
fn tree_width_limit_summarizes_remaining_entries() {
    let temp = tempdir().unwrap();
    for i in 0..5 {
        write_file(&temp.path().join(format!("f{}.txt", i)), "xx");
    }

    let out = stdout_of(
        repolens(temp.path())
            .args(["--max-children", "2", "--format", "json", "tree"]),
    );
    let tree: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(tree["children"].as_array().unwrap().len(), 2);
    assert_eq!(tree["summary"]["file_count"], 3);
    assert_eq!(tree["summary"]["total_size"], 6);
}

#[test]
fn tree_sub_path_outside_root_is_refused() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("repo/a.txt"), "a");

    repolens(&temp.path().join("repo"))
        .args(["tree", "../"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Error analyzing repository structure: Attempted to access path outside repository",
        ));
}

#[test]
fn read_prints_header_and_content() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("src/app.py"), "import os\nprint(os.name)\n");

    repolens(temp.path())
        .args(["read", "src/app.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "File: src/app.py\nLanguage: python\nSize: 25 bytes\nTotal lines: 2\n\nimport os\nprint(os.name)",
        ));
}

#[test]
fn read_truncates_at_line_limit() {
    let temp = tempdir().unwrap();
    let body: String = (1..=10).map(|i| format!("line {}\n", i)).collect();
    write_file(&temp.path().join("notes.txt"), &body);

    let out = stdout_of(
        repolens(temp.path())
            .args(["--max-lines", "3", "read", "notes.txt"]),
    );

    assert!(out.contains("Total lines: 3"));
    assert!(out.contains("line 3\n\n[File truncated after 3 lines]"));
    assert!(!out.contains("line 4"));
}

#[test]
fn read_limits_follow_environment() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("big.txt"), &"x".repeat(64));

    repolens(temp.path())
        .env("REPOLENS_MAX_FILE_SIZE", "16")
        .args(["read", "big.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "File big.txt is too large (64 bytes). Maximum size is 16 bytes.",
        ));
}

#[test]
fn read_outside_root_is_refused() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("repo/a.txt"), "a");
    write_file(&temp.path().join("secret.txt"), "hunter2");

    repolens(&temp.path().join("repo"))
        .args(["read", "../secret.txt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Error: Attempted to access path outside repository",
        ))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn read_ignored_file_is_refused() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join(".gitignore"), "*.log\n");
    write_file(&temp.path().join("debug.log"), "noise");

    repolens(temp.path())
        .args(["read", "debug.log"])
        .assert()
        .success()
        .stdout("Error: debug.log is ignored based on .gitignore patterns\n");
}

#[test]
fn read_error_as_json() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("blob.bin"), "ab\0cd");

    let out = stdout_of(
        repolens(temp.path())
            .args(["--format", "json", "read", "blob.bin"]),
    );
    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["error"]["code"], "DECODE_FAILURE");
}

#[test]
fn info_reports_ignore_file() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join(".gitignore"), "target/\n");

    repolens(temp.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Code Repository Information:"))
        .stdout(predicate::str::contains("Is Directory: true"))
        .stdout(predicate::str::contains("Found .gitignore file"));
}

#[test]
fn missing_root_fails() {
    let temp = tempdir().unwrap();

    repolens(&temp.path().join("does-not-exist"))
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Repository path does not exist"));
}

#[test]
fn serve_answers_commands_until_quit() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("hello.rs"), "fn main() {}\n");

    let script = format!(
        "info\ninit {}\nread hello.rs\ntree\nquit\nread hello.rs\n",
        temp.path().display()
    );

    let out = stdout_of(
        Command::new(assert_cmd::cargo::cargo_bin!("repolens"))
            .arg("serve")
            .write_stdin(script),
    );

    assert!(out.starts_with("No code repository has been initialized yet."));
    assert!(out.contains("Successfully initialized code repository at: "));
    assert!(out.contains("No .gitignore file present"));
    assert_eq!(out.matches("Language: rust").count(), 1);
    assert!(out.contains("📄 hello.rs (13.0 B)"));
}

#[test]
fn serve_json_answers_in_json_before_init() {
    let out = stdout_of(
        Command::new(assert_cmd::cargo::cargo_bin!("repolens"))
            .args(["--format", "json", "serve"])
            .write_stdin("info\nquit\n"),
    );

    let value: Value = serde_json::from_str(out.trim()).expect("json response");
    assert_eq!(value["error"]["code"], "NOT_INITIALIZED");
}
