//! Common test utilities and fixtures
//!
//! Every command runs in its own temporary HOME and working directory so a
//! developer's real `~/.devmetrics/config.toml` never leaks into a test.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "DEVMETRICS_CONFIG",
    "DEVMETRICS_DAYS",
    "DEVMETRICS_PERSONA",
    "DEVMETRICS_SEED",
    "DEVMETRICS_FORMAT",
    "DEVMETRICS_SPRINT_LENGTH_DAYS",
    "DEVMETRICS_HOTFIX_PROBABILITY",
    "DEVMETRICS_LOG_LEVEL",
    "DEVMETRICS_LOG_FILE",
    "DEVMETRICS_LOG_JSON",
    "RUST_LOG",
];

/// Isolated home directory for one test
pub struct Sandbox {
    temp_dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` inside the sandbox and return its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// The devmetrics binary, confined to the sandbox
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("devmetrics").unwrap();
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.root())
            .env("HOME", self.root())
            .env("XDG_CONFIG_HOME", self.root().join(".config"));
        cmd
    }
}
