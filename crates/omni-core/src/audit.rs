//! Append-only audit log for operator visibility.
//!
//! Records command dispatches, authorization denials, rate limits, and
//! errors. Supports JSON-lines or a readable plain-text format.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::{errors::Error, Result};

const AUDIT_MAX_TEXT: usize = 500;

fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEvent {
    fn base(event: &str, user_id: i64, username: &str) -> Self {
        Self {
            timestamp: iso_timestamp_utc(),
            event: event.to_string(),
            user_id: Some(user_id),
            username: Some(username.to_string()),
            command: None,
            args: None,
            reply: None,
            ok: None,
            authorized: None,
            retry_after: None,
            error: None,
        }
    }

    pub fn dispatch(
        user_id: i64,
        username: &str,
        command: &str,
        args: &str,
        reply: &str,
        ok: bool,
    ) -> Self {
        let mut ev = Self::base("dispatch", user_id, username);
        ev.command = Some(command.to_string());
        ev.args = Some(args.to_string());
        ev.reply = Some(reply.to_string());
        ev.ok = Some(ok);
        ev
    }

    pub fn auth(user_id: i64, username: &str, authorized: bool) -> Self {
        let mut ev = Self::base("auth", user_id, username);
        ev.authorized = Some(authorized);
        ev
    }

    pub fn rate_limit(user_id: i64, username: &str, retry_after: f64) -> Self {
        let mut ev = Self::base("rate_limit", user_id, username);
        ev.retry_after = Some(retry_after);
        ev
    }

    pub fn error(user_id: i64, username: &str, error: &str) -> Self {
        let mut ev = Self::base("error", user_id, username);
        ev.error = Some(error.to_string());
        ev
    }
}

#[derive(Clone, Debug)]
pub struct AuditLogger {
    path: PathBuf,
    json: bool,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>, json: bool) -> Self {
        Self {
            path: path.into(),
            json,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, mut event: AuditEvent) -> Result<()> {
        // Truncate potentially large payloads before they hit disk.
        for field in [&mut event.args, &mut event.reply, &mut event.error] {
            if let Some(s) = field {
                *s = crate::formatting::truncate_text(s, AUDIT_MAX_TEXT);
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if self.json {
            let line = serde_json::to_string(&event)?;
            writeln!(file, "{line}")?;
            return Ok(());
        }

        // Plain text format for readability.
        let mut out = String::new();
        out.push('\n');
        out.push_str(&"=".repeat(60));

        let value = serde_json::to_value(&event)?;
        let Some(obj) = value.as_object() else {
            return Err(Error::External(
                "audit event is not a JSON object".to_string(),
            ));
        };
        for (k, v) in obj {
            out.push('\n');
            out.push_str(k);
            out.push_str(": ");
            match v {
                serde_json::Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
        }
        out.push('\n');

        file.write_all(out.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_file(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.log"))
    }

    #[test]
    fn json_lines_contain_dispatch_fields() {
        let log = AuditLogger::new(tmp_file("omni-audit-test"), true);
        log.write(AuditEvent::dispatch(1, "u", "dinner", "", "🍽️ ...", true))
            .unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        assert!(written.contains("\"event\":\"dispatch\""));
        assert!(written.contains("\"command\":\"dinner\""));
        assert!(written.contains("\"ok\":true"));
    }

    #[test]
    fn long_fields_are_truncated_on_write() {
        let log = AuditLogger::new(tmp_file("omni-audit-trunc"), true);
        let args = "x".repeat(AUDIT_MAX_TEXT + 50);
        log.write(AuditEvent::dispatch(1, "u", "video", &args, "ok", true))
            .unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        assert!(written.contains("..."));
        assert!(!written.contains(&args));
    }

    #[test]
    fn plain_format_is_key_value() {
        let log = AuditLogger::new(tmp_file("omni-audit-plain"), false);
        log.write(AuditEvent::auth(5, "mallory", false)).unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        assert!(written.contains("event: auth"));
        assert!(written.contains("authorized: false"));
    }
}
