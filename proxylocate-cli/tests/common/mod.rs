//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Child, Command as StdCommand};

use assert_cmd::Command;

pub struct TestContext {
    pub cmd: Command,
}

impl TestContext {
    /// A fresh command with the same isolation as `cmd`.
    pub fn new_cmd(&self) -> Command {
        base_cmd()
    }
}

fn base_cmd() -> Command {
    let mut cmd = Command::cargo_bin("proxylocate").expect("binary should be built");
    cmd.env_remove("PROXYLOCATE_CONFIG").env_remove("RUST_LOG");
    cmd
}

pub fn proxylocate() -> TestContext {
    TestContext { cmd: base_cmd() }
}

/// A `sleep` process with extra environment, killed on drop.
pub struct Target(Child);

impl Target {
    pub fn spawn(env: &[(&str, &Path)]) -> Self {
        let mut cmd = StdCommand::new("sleep");
        cmd.arg("30");
        for (key, value) in env {
            cmd.env(key, value);
        }
        Self(cmd.spawn().expect("Failed to spawn sleep"))
    }

    pub fn pid(&self) -> String {
        self.0.id().to_string()
    }
}

impl Drop for Target {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}
