//! Wire shapes for the Supabase REST error body and the realtime
//! (Phoenix channel) envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// PostgREST error reply, e.g. `{"code":"42P01","message":"relation ... does not exist"}`.
#[derive(Debug, Deserialize)]
pub struct RestErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl RestErrorBody {
    pub fn describe(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{} ({})", self.message, hint),
            None => self.message.clone(),
        }
    }
}

/// Every realtime frame, in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

pub mod events {
    pub const JOIN: &str = "phx_join";
    pub const LEAVE: &str = "phx_leave";
    pub const REPLY: &str = "phx_reply";
    pub const ERROR: &str = "phx_error";
    pub const CLOSE: &str = "phx_close";
    pub const HEARTBEAT: &str = "heartbeat";
    pub const POSTGRES_CHANGES: &str = "postgres_changes";
}

pub const PHOENIX_TOPIC: &str = "phoenix";

impl PhoenixMessage {
    /// Join `realtime:{table}` asking for every change event on the table.
    pub fn join(topic: &str, schema: &str, table: &str, api_key: &str, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: events::JOIN.to_string(),
            payload: json!({
                "config": {
                    "broadcast": { "self": false },
                    "presence": { "key": "" },
                    "postgres_changes": [
                        { "event": "*", "schema": schema, "table": table }
                    ]
                },
                "access_token": api_key
            }),
            reference: Some(reference.to_string()),
        }
    }

    pub fn leave(topic: &str, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: events::LEAVE.to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    pub fn heartbeat(reference: u64) -> Self {
        Self {
            topic: PHOENIX_TOPIC.to_string(),
            event: events::HEARTBEAT.to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    pub fn is_change_for(&self, topic: &str) -> bool {
        self.topic == topic && self.event == events::POSTGRES_CHANGES
    }

    /// A `phx_reply` whose status is not "ok".
    pub fn rejection(&self) -> Option<String> {
        if self.event != events::REPLY {
            return None;
        }
        let status = self.payload.get("status").and_then(Value::as_str).unwrap_or("ok");
        (status != "ok").then(|| {
            self.payload
                .pointer("/response/reason")
                .and_then(Value::as_str)
                .unwrap_or(status)
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_requests_all_events_for_table() {
        let join = PhoenixMessage::join("realtime:brent_crude", "public", "brent_crude", "anon", 1);
        let changes = &join.payload["config"]["postgres_changes"][0];
        assert_eq!(changes["event"], "*");
        assert_eq!(changes["table"], "brent_crude");
        let wire = serde_json::to_value(&join).unwrap();
        assert_eq!(wire["ref"], "1");
        assert_eq!(wire["event"], "phx_join");
    }

    #[test]
    fn recognises_change_frames_and_rejections() {
        let change: PhoenixMessage = serde_json::from_str(
            r#"{"topic":"realtime:brent_crude","event":"postgres_changes","payload":{"data":{"type":"INSERT"}},"ref":null}"#,
        )
        .unwrap();
        assert!(change.is_change_for("realtime:brent_crude"));
        assert!(!change.is_change_for("realtime:other"));

        let reply: PhoenixMessage = serde_json::from_str(
            r#"{"topic":"realtime:brent_crude","event":"phx_reply","payload":{"status":"error","response":{"reason":"unauthorized"}},"ref":"1"}"#,
        )
        .unwrap();
        assert_eq!(reply.rejection().as_deref(), Some("unauthorized"));
    }
}
