//! Append-only JSONL transcript of a session.
//!
//! Every record carries `type`, `session` and `timestamp` next to the
//! event's own fields. Several sessions may share one file; filter on
//! `session` to read one back.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use toolgate_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use tracing::warn;

pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    session_id: String,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating it and its parent directories
    /// as needed.
    pub fn open(path: impl AsRef<Path>, session_id: impl Into<String>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            session_id: session_id.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&self, event: ConversationEvent) -> serde_json::Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut map = match event.payload {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), event.event_type.into());
        map.insert("session".to_string(), self.session_id.clone().into());
        map.insert("timestamp".to_string(), timestamp.into());
        serde_json::Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let event_type = event.event_type;
        let Ok(line) = serde_json::to_string(&self.record(event)) else {
            return;
        };

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        // One flush per record keeps the file readable after a crash
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(event = event_type, path = %self.path.display(), "Could not write transcript: {}", e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_domain::HumanDecision;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_records_carry_type_session_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("session.jsonl");
        let logger = JsonlConversationLogger::open(&path, "s1").unwrap();

        logger.log(ConversationEvent::user_input("invoice cus_1 for $20"));
        logger.log(ConversationEvent::confirmation_decision(
            "Stripe_CreateInvoice",
            HumanDecision::Deny,
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "user_input");
        assert_eq!(records[0]["text"], "invoice cus_1 for $20");
        assert_eq!(records[1]["type"], "confirmation_decision");
        assert_eq!(records[1]["approved"], false);
        for record in &records {
            assert_eq!(record["session"], "s1");
            assert!(record["timestamp"].is_string());
        }
    }

    #[test]
    fn test_appends_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");

        JsonlConversationLogger::open(&path, "s1")
            .unwrap()
            .log(ConversationEvent::tool_denied("Stripe_CreateInvoice"));
        JsonlConversationLogger::open(&path, "s2")
            .unwrap()
            .log(ConversationEvent::reconciled("Stripe_CreateInvoice", 4));

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["session"], "s1");
        assert_eq!(records[1]["session"], "s2");
        assert_eq!(records[1]["history_len"], 4);
    }

    #[test]
    fn test_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let logger = JsonlConversationLogger::open(&path, "s1").unwrap();

        logger.log(ConversationEvent::new("note", serde_json::json!("plain text")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "note");
        assert_eq!(records[0]["data"], "plain text");
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        assert!(JsonlConversationLogger::open(blocker.join("session.jsonl"), "s1").is_err());
    }
}
