// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides temp directory fixtures and a runner for the tpl binary

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn create_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Run the tpl binary inside the temp directory, feeding `stdin` when given.
    pub fn run(&self, args: &[&str], stdin: Option<&str>) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_tpl"));
        command
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path())
            .env_remove("RUST_LOG")
            .env_remove("TPL_LOG_LEVEL")
            .env_remove("TPL_LOG_FORMAT")
            .env_remove("TPL_TEMPLATE")
            .env_remove("TPL_STRICT")
            .env_remove("TPL_CSV_DELIMITER")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::piped());

        let mut child = command.spawn().expect("Failed to spawn tpl");
        {
            let mut pipe = child.stdin.take().expect("stdin is piped");
            if let Some(input) = stdin {
                pipe.write_all(input.as_bytes())
                    .expect("Failed to write stdin");
            }
        }
        child.wait_with_output().expect("Failed to wait for tpl")
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
