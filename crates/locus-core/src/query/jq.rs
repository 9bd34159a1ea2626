//! Native engine backed by a `jq` executable
//!
//! Copyright (c) 2025 Locus Team
//! Licensed under the Apache-2.0 license

use super::QueryEngine;
use anyhow::{bail, Context};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// Runs expressions through an external `jq` binary
#[derive(Debug)]
pub struct JqCommand {
    program: PathBuf,
    available: OnceLock<bool>,
}

impl Default for JqCommand {
    fn default() -> Self {
        Self::new("jq")
    }
}

impl JqCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            available: OnceLock::new(),
        }
    }

    fn check_available(&self) -> bool {
        let ok = Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        log::debug!("jq availability check for {}: {}", self.program.display(), ok);
        ok
    }
}

impl QueryEngine for JqCommand {
    fn name(&self) -> &str {
        "jq"
    }

    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| self.check_available())
    }

    fn query(&self, data: &Value, expression: &str) -> anyhow::Result<Vec<Value>> {
        let input = serde_json::to_vec(data)?;
        let mut child = Command::new(&self.program)
            .arg("--compact-output")
            .arg(expression)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start {}", self.program.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&input).context("failed to write query input")?;
        }

        let output = child.wait_with_output().context("failed to read query output")?;
        if !output.status.success() {
            bail!(
                "jq exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8(output.stdout).context("jq produced non-UTF-8 output")?;
        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).with_context(|| format!("unparseable jq output: {}", line)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_unavailable() {
        let engine = JqCommand::new("/nonexistent/locus-test-jq");
        assert!(!engine.is_available());
        assert!(engine.query(&Value::Null, ".").is_err());
    }
}
