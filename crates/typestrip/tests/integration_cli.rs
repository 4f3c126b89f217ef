//! Integration tests for the typestrip binary.
//!
//! Each test builds a small project in a temporary directory, runs the
//! binary against it and checks the files and output it leaves behind.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// ============================================================================
// TEST INFRASTRUCTURE
// ============================================================================

struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_typestrip"))
            .arg("--workspace")
            .arg(self.root())
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("TYPESTRIP_TIMINGS")
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const BUTTON: &str = r#"import React from 'react';
import type { ReactNode } from 'react';
import { cn } from '../lib/utils.ts';

export interface ButtonProps {
  label: string;
  icon?: ReactNode;
}

export function Button({ label, icon }: ButtonProps) {
  return <button className={cn('btn')}>{icon}{label}</button>;
}
"#;

const UTILS: &str = r#"export type ClassValue = string | undefined | false;

export function cn(...values: ClassValue[]): string {
  return values.filter(Boolean).join(' ');
}
"#;

fn sample_project() -> Project {
    let project = Project::new();
    project.write("src/components/Button.tsx", BUTTON);
    project.write("src/lib/utils.ts", UTILS);
    project.write("src/types/env.d.ts", "declare const VERSION: string;\n");
    project.write("src/node_modules/pkg/index.ts", "export const x: number = 1;\n");
    project.write("src/styles.css", "button { color: red; }\n");
    project
}

// ============================================================================
// DIRECTORY RUNS
// ============================================================================

#[test]
fn converts_source_tree_into_destination() {
    let project = sample_project();
    let output = project.run(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        project.read("src-js/components/Button.jsx"),
        r#"import React from 'react';
import { cn } from '../lib/utils.js';

export function Button({ label, icon }) {
  return <button className={cn('btn')}>{icon}{label}</button>;
}
"#
    );
    assert_eq!(
        project.read("src-js/lib/utils.js"),
        r#"export function cn(...values) {
  return values.filter(Boolean).join(' ');
}
"#
    );
    assert!(!project.path("src-js/types").exists());
    assert!(!project.path("src-js/node_modules").exists());
    assert!(!project.path("src-js/styles.css").exists());
    assert!(project.path("src/components/Button.tsx").exists());

    insta::assert_snapshot!(stdout(&output).trim_end(), @r"
    Converted: src/components/Button.tsx -> src-js/components/Button.jsx
    Converted: src/lib/utils.ts -> src-js/lib/utils.js
    typestrip converted 2 files, 0 unchanged, 0 failed
    ");
}

#[test]
fn second_run_is_byte_identical() {
    let project = sample_project();
    assert!(project.run(&[]).status.success());
    let first = project.read("src-js/components/Button.jsx");

    let output = project.run(&[]);
    assert!(output.status.success());
    assert_eq!(project.read("src-js/components/Button.jsx"), first);

    let output = project.run(&["--skip-unchanged"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Unchanged: src/lib/utils.ts -> src-js/lib/utils.js"));
    assert!(stdout(&output).contains("typestrip converted 0 files, 2 unchanged, 0 failed"));
}

#[test]
fn in_place_with_delete_original() {
    let project = sample_project();
    let output = project.run(&["--in-place", "--delete-original"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(project.path("src/components/Button.jsx").exists());
    assert!(!project.path("src/components/Button.tsx").exists());
    assert!(project.path("src/lib/utils.js").exists());
    assert!(!project.path("src/lib/utils.ts").exists());
    assert!(project.path("src/types/env.d.ts").exists());
    assert!(stdout(&output).contains("(original removed)"));
}

#[test]
fn dry_run_touches_nothing() {
    let project = sample_project();
    let output = project.run(&["--dry-run", "--delete-original"]);
    assert!(output.status.success());
    assert!(!project.path("src-js").exists());
    assert!(project.path("src/lib/utils.ts").exists());
    assert!(stdout(&output).contains("Would convert: src/lib/utils.ts -> src-js/lib/utils.js"));
    assert!(stdout(&output).contains("typestrip would convert 2 files"));
}

#[test]
fn missing_root_fails_but_converts_others() {
    let project = sample_project();
    let output = project.run(&["--src", "src", "--src", "missing"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: source root"));
    assert!(stderr(&output).contains("does not exist"));
    assert!(project.path("src-js/lib/utils.js").exists());
}

#[test]
fn unparsable_file_uses_fallback_or_fails_in_strict_mode() {
    let project = Project::new();
    project.write("src/broken.ts", "import type { A } from './a';\nconst x = (;\n");
    project.write("src/ok.ts", "export const ok: boolean = true;\n");

    let output = project.run(&[]);
    assert!(output.status.success());
    assert_eq!(project.read("src-js/broken.js"), "const x = (;\n");
    assert!(stderr(&output).contains("Warning: src/broken.ts:2:"));
    assert!(stderr(&output).contains("lexical fallback"));

    fs::remove_dir_all(project.path("src-js")).unwrap();
    let output = project.run(&["--strict"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: src/broken.ts: parse error at 2:"));
    assert!(!project.path("src-js/broken.js").exists());
    assert_eq!(project.read("src-js/ok.js"), "export const ok = true;\n");
    assert!(stdout(&output).contains("typestrip converted 1 file, 0 unchanged, 1 failed"));
}

#[test]
fn json_output() {
    let project = sample_project();
    let output = project.run(&["--output", "json", "--timings"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["summary"]["converted"], 2);
    assert_eq!(value["summary"]["failed"], 0);
    assert_eq!(value["files"][0]["source"], "src/components/Button.tsx");
    assert_eq!(value["files"][0]["status"], "converted");
    assert!(value["timings"]["totalMs"].is_number());
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn config_file_sets_roots_and_extensions() {
    let project = Project::new();
    project.write("app/main.ts", "const port: number = 3000;\n");
    project.write("app/fixtures/sample.ts", "const skip: string = '';\n");
    project.write(
        "typestrip.json",
        r#"{
  // convert the app directory only
  "sourceRoots": ["app"],
  "destinationRoot": "build",
  "excludedDirectoryNames": ["fixtures"],
  "extensionMap": { "ts": "mjs" }
}
"#,
    );

    let output = project.run(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(project.read("build/main.mjs"), "const port = 3000;\n");
    assert!(!project.path("build/fixtures").exists());
}

#[test]
fn invalid_config_is_fatal() {
    let project = sample_project();
    project.write("typestrip.json", "{ \"sourceRoots\": \"src\" }\n");
    let output = project.run(&[]);
    assert!(!output.status.success());
    assert!(!stderr(&output).is_empty());
    assert!(!project.path("src-js").exists());
}

// ============================================================================
// SINGLE FILE MODE
// ============================================================================

#[test]
fn single_file_to_stdout() {
    let project = sample_project();
    let output = project.run(&["src/lib/utils.ts", "--stdout"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "export function cn(...values) {\n  return values.filter(Boolean).join(' ');\n}\n"
    );
    assert!(!project.path("src-js").exists());
}

#[test]
fn single_file_is_written_to_mirrored_destination() {
    let project = sample_project();
    let output = project.run(&["src/components/Button.tsx"]);
    assert!(output.status.success());
    assert!(project.path("src-js/components/Button.jsx").exists());
    assert!(!project.path("src-js/lib").exists());
    assert!(stdout(&output).contains("typestrip converted 1 file, 0 unchanged, 0 failed"));
}

#[test]
fn single_file_errors() {
    let project = sample_project();
    let output = project.run(&["src/nope.ts"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));

    let output = project.run(&["src/styles.css"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not have a convertible extension"));
}
