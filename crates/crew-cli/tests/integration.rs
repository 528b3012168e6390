#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// An isolated home directory plus project root.
struct Env {
    home: TempDir,
    project: TempDir,
}

impl Env {
    fn new() -> Self {
        Env {
            home: TempDir::new().unwrap(),
            project: TempDir::new().unwrap(),
        }
    }

    fn crew(&self) -> Command {
        let mut cmd = Command::cargo_bin("crew").unwrap();
        cmd.current_dir(self.project.path())
            .env("CREW_ROOT", self.project.path())
            .env("HOME", self.home.path())
            .env_remove("RUST_LOG");
        cmd
    }

    fn project_file(&self, rel: &str) -> std::path::PathBuf {
        self.project.path().join(rel)
    }

    /// Point the claude executable at `executable` and avatars at a closed port.
    fn configure(&self, executable: &str) {
        write(
            &self.project_file(".claude/crew.yaml"),
            &format!(
                "claude:\n  executable: {executable}\n  timeout_secs: 10\navatar:\n  base_url: http://127.0.0.1:9/avatar.png\n  fetch_timeout_secs: 1\n"
            ),
        );
    }

    fn with_agents(self) -> Self {
        write(
            &self.home.path().join(".claude/agents/reviewer.md"),
            "---\ndescription: Reviews code: finds <subtle> bugs\ncolor: blue\n---\nYou review code.",
        );
        write(
            &self.project_file(".claude/agents/db-tuner.md"),
            "---\ndescription: Tunes queries\nmodel: opus\n---\nYou tune databases.",
        );
        self
    }

    fn cache(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.project_file(".claude/crew-metadata.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// A stand-in `claude` that ignores its prompt and replies with `result`.
#[cfg(unix)]
fn fake_claude(dir: &Path, result: &str) -> String {
    use std::os::unix::fs::PermissionsExt;
    let envelope = serde_json::json!({
        "type": "result",
        "subtype": "success",
        "is_error": false,
        "result": result,
    });
    let path = dir.join("claude");
    std::fs::write(
        &path,
        format!("#!/bin/sh\ncat > /dev/null\ncat <<'EOF'\n{envelope}\nEOF\n"),
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

// ---------------------------------------------------------------------------
// crew generate
// ---------------------------------------------------------------------------

#[test]
fn generate_without_agents_fails() {
    let env = Env::new();
    env.configure("/nonexistent/claude");
    env.crew()
        .args(["generate", "--no-plugins"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: no agents found"));
}

#[test]
fn generate_without_claude_synthesizes_locally() {
    let env = Env::new().with_agents();
    env.configure("/nonexistent/claude");

    env.crew()
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 synthesized locally"));

    let png = std::fs::read(env.project_file("crew.png")).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");

    let cache = env.cache();
    assert_eq!(cache["reviewer"]["source"], "local");
    assert_eq!(cache["db-tuner"]["source"], "local");
    assert_ne!(cache["reviewer"]["displayName"], cache["db-tuner"]["displayName"]);
}

#[cfg(unix)]
#[test]
fn generate_with_claude_suffixes_duplicate_names() {
    let bin = TempDir::new().unwrap();
    let env = Env::new().with_agents();
    env.configure(&fake_claude(
        bin.path(),
        r#"Sure! {"displayName": "Nova", "gender": "F", "tagline": "Ships it"}"#,
    ));
    let out = env.project_file("out/sheet.png");

    let output = env
        .crew()
        .args(["generate", "--json", "-o"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["report"]["generated"], 2);
    assert_eq!(report["cards"][0]["displayName"], "Nova");
    assert_eq!(report["cards"][1]["displayName"], "Nova 2");
    assert!(out.exists());

    let cache = env.cache();
    assert_eq!(cache["reviewer"]["gender"], "female");
    assert_eq!(cache["reviewer"]["tagline"], "Ships it");
    assert!(cache["reviewer"]["avatarUrl"]
        .as_str()
        .unwrap()
        .contains("seed=reviewer"));

    // Cached personas are reused on the next run.
    env.crew()
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 cached"));
}

#[test]
fn generate_reads_custom_agents_dir() {
    let env = Env::new().with_agents();
    env.configure("/nonexistent/claude");
    let custom = env.project_file("elsewhere");
    write(&custom.join("scout.md"), "---\ndescription: Scouts\n---\n");

    let output = env
        .crew()
        .args(["generate", "--json", "--no-plugins", "--agents-dir"])
        .arg(&custom)
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["cards"].as_array().unwrap().len(), 1);
    assert_eq!(report["cards"][0]["name"], "scout");
}

// ---------------------------------------------------------------------------
// crew list / skills
// ---------------------------------------------------------------------------

#[test]
fn list_shows_user_and_project_agents() {
    let env = Env::new().with_agents();
    env.crew()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer"))
        .stdout(predicate::str::contains("db-tuner"))
        .stdout(predicate::str::contains("project"));

    let output = env.crew().args(["list", "--json"]).output().unwrap();
    let agents: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(agents[0]["name"], "reviewer");
    assert_eq!(agents[0]["description"], "Reviews code: finds <subtle> bugs");
    assert_eq!(agents[1]["scope"], "project");
}

#[test]
fn list_with_missing_directories_is_empty() {
    let env = Env::new();
    env.crew()
        .args(["list", "--no-plugins"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No agents found."));
}

#[test]
fn skills_lists_project_skills() {
    let env = Env::new();
    write(
        &env.project_file(".claude/skills/pdf/SKILL.md"),
        "---\ndescription: Reads PDFs\nallowed-tools: Read, Bash\n---\nUse pdftotext.",
    );
    let output = env.crew().args(["skills", "--json"]).output().unwrap();
    assert!(output.status.success());
    let skills: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(skills[0]["name"], "pdf");
    assert_eq!(skills[0]["allowedTools"], serde_json::json!(["Read", "Bash"]));
}

// ---------------------------------------------------------------------------
// crew new
// ---------------------------------------------------------------------------

#[test]
fn new_without_claude_fails() {
    let env = Env::new();
    env.configure("/nonexistent/claude");
    env.crew()
        .args(["new", "an agent that writes release notes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unavailable"));
}

#[cfg(unix)]
#[test]
fn new_writes_agent_and_refuses_to_overwrite() {
    let bin = TempDir::new().unwrap();
    let env = Env::new();
    env.configure(&fake_claude(
        bin.path(),
        r#"{"name": "Release Notes Writer", "description": "Use when: cutting a release", "prompt": "You write release notes."}"#,
    ));

    env.crew()
        .args(["new", "release notes", "--model", "haiku", "--color", "green"])
        .assert()
        .success()
        .stdout(predicate::str::contains("release-notes-writer"));

    let text = std::fs::read_to_string(env.project_file(".claude/agents/release-notes-writer.md")).unwrap();
    assert!(text.starts_with("---\n"));
    assert!(text.contains("model: haiku"));
    assert!(text.contains("color: green"));
    assert!(text.trim_end().ends_with("You write release notes."));

    env.crew()
        .args(["new", "release notes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ---------------------------------------------------------------------------
// crew cache / config
// ---------------------------------------------------------------------------

#[test]
fn cache_show_delete_and_clear() {
    let env = Env::new().with_agents();
    env.configure("/nonexistent/claude");
    env.crew().arg("generate").assert().success();

    env.crew()
        .args(["cache", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer"));

    env.crew().args(["cache", "delete", "reviewer"]).assert().success();
    assert!(env.cache().get("reviewer").is_none());
    env.crew()
        .args(["cache", "delete", "reviewer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cached persona"));

    let output = env.crew().args(["cache", "clear", "--json"]).output().unwrap();
    let cleared: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cleared["removed"], 1);
    assert_eq!(env.cache(), serde_json::json!({}));
}

#[test]
fn config_show_and_validate() {
    let env = Env::new();
    env.crew()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));

    let output = env.crew().args(["config", "show", "--json"]).output().unwrap();
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["claude"]["executable"], "claude");
    assert_eq!(config["claude"]["timeout_secs"], 120);

    write(&env.project_file(".claude/crew.yaml"), "claude:\n  timeout_secs: 0\n");
    env.crew().args(["config", "validate"]).assert().failure();
}
