use std::fs;
use std::io;
use std::sync::Mutex;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::adapters::backend::{ApiError, InspectionApi};
use crate::domain::query::GalleryFilter;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay script: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse replay script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid replay script: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptFile {
    #[serde(default = "default_loop")]
    loop_forever: bool,
    recent: Vec<ScriptEvent>,
    #[serde(default)]
    defects: Vec<ScriptEvent>,
    #[serde(default)]
    presign: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScriptEvent {
    ok: Option<Value>,
    error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Channel {
    Recent,
    Defects,
    Presign,
}

#[derive(Debug, Default)]
struct ReplayState {
    recent_idx: usize,
    defects_idx: usize,
    presign_idx: usize,
}

/// Serves scripted backend responses from a JSON file, for running the client
/// without a backend.
#[derive(Debug)]
pub struct ReplayBackend {
    script: ScriptFile,
    state: Mutex<ReplayState>,
}

fn default_loop() -> bool {
    true
}

impl ReplayBackend {
    pub fn from_file(path: &str) -> Result<Self, ReplayError> {
        let content = fs::read_to_string(path)?;
        Self::from_script(&content)
    }

    pub fn from_script(content: &str) -> Result<Self, ReplayError> {
        let script: ScriptFile = serde_json::from_str(content)?;

        if script.recent.is_empty() {
            return Err(ReplayError::Invalid(
                "replay script must contain at least one recent event",
            ));
        }

        Ok(Self {
            script,
            state: Mutex::new(ReplayState::default()),
        })
    }

    fn next_event(&self, channel: Channel) -> Result<ScriptEvent, ApiError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ApiError::Replay("replay state lock poisoned".to_string()))?;

        let (events, idx_ref) = match channel {
            Channel::Recent => (&self.script.recent, &mut state.recent_idx),
            Channel::Defects => (&self.script.defects, &mut state.defects_idx),
            Channel::Presign => (&self.script.presign, &mut state.presign_idx),
        };

        if events.is_empty() {
            return Err(ApiError::Status(404));
        }

        if *idx_ref >= events.len() {
            if self.script.loop_forever {
                *idx_ref = 0;
            } else {
                return Err(ApiError::Replay("replay finished".to_string()));
            }
        }

        let event = events[*idx_ref].clone();
        *idx_ref = idx_ref.saturating_add(1);

        Ok(event)
    }

    fn execute_event(event: ScriptEvent) -> Result<Value, ApiError> {
        match (event.ok, event.error) {
            (Some(payload), None) => Ok(payload),
            (None, Some(error)) => Err(map_script_error(&error)),
            _ => Err(ApiError::Replay(
                "script event must contain exactly one of: ok or error".to_string(),
            )),
        }
    }

    fn respond(&self, channel: Channel) -> Result<Value, ApiError> {
        Self::execute_event(self.next_event(channel)?)
    }
}

fn map_script_error(kind: &str) -> ApiError {
    let normalized = kind.trim().to_ascii_lowercase();
    if let Some(code) = normalized.strip_prefix("status:") {
        return match code.trim().parse::<u16>() {
            Ok(code) => ApiError::Status(code),
            Err(_) => ApiError::Replay(format!("invalid scripted status: {kind}")),
        };
    }

    match normalized.as_str() {
        "timeout" | "network_unreachable" | "connection_refused" => {
            ApiError::Replay(kind.trim().to_string())
        }
        "invalid_json" => match serde_json::from_str::<Value>("not json") {
            Err(parse_err) => ApiError::Decode(parse_err),
            Ok(_) => ApiError::Replay(kind.trim().to_string()),
        },
        _ => ApiError::Replay(format!("unknown scripted error kind: {kind}")),
    }
}

impl InspectionApi for ReplayBackend {
    async fn recent(&self, _query: &[(String, String)]) -> Result<Value, ApiError> {
        self.respond(Channel::Recent)
    }

    async fn defects(
        &self,
        _filter: &GalleryFilter,
        _limit: u32,
        _page: u32,
    ) -> Result<Value, ApiError> {
        self.respond(Channel::Defects)
    }

    async fn presign(&self, _key: &str) -> Result<Value, ApiError> {
        self.respond(Channel::Presign)
    }
}

#[cfg(test)]
mod tests {
    use crate::adapters::backend::{ApiError, InspectionApi};
    use crate::domain::query::GalleryFilter;

    use super::{ReplayBackend, ReplayError};

    fn fixture(path: &str) -> String {
        format!(
            "{}/testdata/replay/{path}",
            env!("CARGO_MANIFEST_DIR").replace("\\", "/")
        )
    }

    #[tokio::test]
    async fn replays_and_loops_scripted_payloads() {
        let backend = ReplayBackend::from_file(&fixture("happy_loop.json")).expect("script");

        let first = backend.recent(&[]).await.expect("recent #1 should succeed");
        let second = backend.recent(&[]).await.expect("recent #2 should succeed");
        let third = backend.recent(&[]).await.expect("recent should loop");

        assert_eq!(first["items"][0]["event_id"], "e1");
        assert_eq!(second["items"].as_array().map(Vec::len), Some(0));
        assert_eq!(third["items"][0]["event_id"], "e1");

        let defects = backend
            .defects(&GalleryFilter::default(), 30, 1)
            .await
            .expect("defects should succeed");
        assert_eq!(defects["items"][0]["overlay_key"], "overlays/e9.png");

        let signed = backend.presign("overlays/e9.png").await.expect("presign");
        assert_eq!(signed["url"], "http://minio.local/overlays/e9.png?sig=1");
    }

    #[tokio::test]
    async fn simulates_status_and_decode_failures() {
        let backend = ReplayBackend::from_file(&fixture("failures.json")).expect("script");

        let status = backend.recent(&[]).await.expect_err("first event is a 502");
        let decode = backend.recent(&[]).await.expect_err("second event is bad json");
        let finished = backend.recent(&[]).await.expect_err("script does not loop");

        assert!(matches!(status, ApiError::Status(502)));
        assert!(matches!(decode, ApiError::Decode(_)));
        assert!(matches!(finished, ApiError::Replay(_)));
    }

    #[tokio::test]
    async fn missing_channel_answers_not_found() {
        let backend = ReplayBackend::from_script(r#"{ "recent": [{ "ok": { "items": [] } }] }"#)
            .expect("script");

        let err = backend.presign("k").await.expect_err("no presign events");
        assert!(matches!(err, ApiError::Status(404)));
    }

    #[test]
    fn rejects_script_without_recent_events() {
        let err = ReplayBackend::from_script(r#"{ "recent": [] }"#).expect_err("must fail");
        assert!(matches!(err, ReplayError::Invalid(_)));
    }

    #[test]
    fn rejects_invalid_top_level_json() {
        let err = ReplayBackend::from_script("{ nope").expect_err("must fail");
        assert!(matches!(err, ReplayError::Json(_)));
    }

    #[tokio::test]
    async fn rejects_ambiguous_and_unknown_events() {
        let backend = ReplayBackend::from_script(
            r#"{ "recent": [{ "ok": {}, "error": "timeout" }, { "error": "gremlins" }] }"#,
        )
        .expect("script");

        let ambiguous = backend.recent(&[]).await.expect_err("ambiguous event");
        let unknown = backend.recent(&[]).await.expect_err("unknown kind");

        assert!(ambiguous.to_string().contains("exactly one of"));
        assert!(unknown.to_string().contains("unknown scripted error kind"));
    }
}
