//! JSONL run log — append-only record of pipeline steps.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// One pipeline step.
#[derive(Debug, Clone, Serialize)]
pub struct RunEvent {
    pub timestamp: String,
    pub run_id: String,
    pub step: String,
    pub target: Option<String>,
    pub duration_ms: u64,
    pub status: String,
}

/// Append-only JSONL run log.
pub struct RunLog {
    file: File,
}

impl RunLog {
    /// Open or create the log file, creating parent directories as needed.
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open run log: {}", path.display()))?;

        Ok(Self { file })
    }

    /// Open the default log at ~/.reach/audit.jsonl.
    pub fn default_log() -> Result<Self> {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".reach")
            .join("audit.jsonl");
        Self::open(&path)
    }

    /// Append one event.
    pub fn log(&mut self, event: &RunEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.file, "{json}")?;
        Ok(())
    }

    /// Append a step with timing.
    pub fn log_step(
        &mut self,
        run_id: &str,
        step: &str,
        target: Option<&str>,
        duration_ms: u64,
        status: &str,
    ) -> Result<()> {
        self.log(&RunEvent {
            timestamp: Utc::now().to_rfc3339(),
            run_id: run_id.to_string(),
            step: step.to_string(),
            target: target.map(String::from),
            duration_ms,
            status: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_append_as_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        let mut log = RunLog::open(&path).unwrap();
        log.log_step("run-1", "session", Some("sess-42"), 120, "ok")
            .unwrap();
        log.log_step("run-1", "extract", None, 950, "ok").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["step"], "session");
        assert_eq!(first["target"], "sess-42");
        assert_eq!(first["status"], "ok");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["step"], "extract");
        assert_eq!(second["target"], serde_json::Value::Null);
    }
}
