use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use crate::adapters::backend::{ApiError, InspectionApi};
use crate::domain::query::GalleryFilter;

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    InvalidJson,
}

impl Reply {
    fn into_result(self) -> Result<Value, ApiError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Status(code) => Err(ApiError::Status(code)),
            Self::InvalidJson => Err(ApiError::Decode(
                serde_json::from_str::<Value>("<html>").expect_err("markup is not json"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Recent(Vec<(String, String)>),
    Defects {
        filter: GalleryFilter,
        limit: u32,
        page: u32,
    },
    Presign(String),
}

/// In-process backend. Recent replies are consumed in order and the last one
/// repeats; presign replies are keyed by storage key and default to 404.
#[derive(Debug, Default)]
pub struct FakeApi {
    recent: Mutex<VecDeque<Reply>>,
    defects: Mutex<Option<Reply>>,
    presign: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recent(self, reply: Reply) -> Self {
        self.recent.lock().expect("recent lock").push_back(reply);
        self
    }

    pub fn with_defects(self, reply: Reply) -> Self {
        *self.defects.lock().expect("defects lock") = Some(reply);
        self
    }

    pub fn with_presign(self, key: &str, reply: Reply) -> Self {
        self.presign
            .lock()
            .expect("presign lock")
            .insert(key.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn recent_calls(&self) -> Vec<Vec<(String, String)>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Recent(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    pub fn presign_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Presign(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn next_recent(&self) -> Reply {
        let mut queue = self.recent.lock().expect("recent lock");
        if queue.len() > 1 {
            queue.pop_front().expect("queue is non-empty")
        } else {
            queue.front().cloned().unwrap_or(Reply::Status(404))
        }
    }
}

impl InspectionApi for FakeApi {
    async fn recent(&self, query: &[(String, String)]) -> Result<Value, ApiError> {
        self.record(Call::Recent(query.to_vec()));
        self.next_recent().into_result()
    }

    async fn defects(
        &self,
        filter: &GalleryFilter,
        limit: u32,
        page: u32,
    ) -> Result<Value, ApiError> {
        self.record(Call::Defects {
            filter: filter.clone(),
            limit,
            page,
        });
        let reply = self
            .defects
            .lock()
            .expect("defects lock")
            .clone()
            .unwrap_or(Reply::Status(404));
        reply.into_result()
    }

    async fn presign(&self, key: &str) -> Result<Value, ApiError> {
        self.record(Call::Presign(key.to_string()));
        let reply = self
            .presign
            .lock()
            .expect("presign lock")
            .get(key)
            .cloned()
            .unwrap_or(Reply::Status(404));
        reply.into_result()
    }
}
