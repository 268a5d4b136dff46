use serde_json::Value;

use crate::domain::fields::{self, OVERLAY_URL_FIELDS, PRESIGNED_URL_FIELDS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Pass,
    Fail,
    Other(String),
    Missing,
}

impl Decision {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::Missing;
        };

        let normalized = raw.to_uppercase();
        match normalized.as_str() {
            "PASS" => Self::Pass,
            "FAIL" => Self::Fail,
            _ => Self::Other(normalized),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Other(value) => value,
            Self::Missing => "-",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Pass => "text-bg-success",
            Self::Fail => "text-bg-danger",
            Self::Other(_) | Self::Missing => "text-bg-secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectionEvent {
    pub event_id: Option<String>,
    pub ts: Option<String>,
    pub product_code: Option<String>,
    pub station_id: Option<String>,
    pub decision: Decision,
    pub defect_count: Option<i64>,
    pub overlay_url: Option<String>,
    pub overlay_key: Option<String>,
}

impl InspectionEvent {
    /// Reads one item of an `items` array. Anything other than a JSON object
    /// yields `None`; individual fields of the wrong type are treated as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        Some(Self {
            event_id: fields::text(object, "event_id"),
            ts: fields::text(object, "ts"),
            product_code: fields::text(object, "product_code"),
            station_id: fields::text(object, "station_id"),
            decision: Decision::parse(fields::text(object, "aql_final_decision").as_deref()),
            defect_count: fields::integer(object, "defect_count"),
            overlay_url: fields::first_text(object, OVERLAY_URL_FIELDS),
            overlay_key: fields::text(object, "overlay_key"),
        })
    }
}

/// Extracts events from a `{ "items": [...] }` body. A missing or malformed
/// `items` member is an empty page, not an error.
pub fn parse_items(body: &Value) -> Vec<InspectionEvent> {
    body.get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(InspectionEvent::from_value).collect())
        .unwrap_or_default()
}

pub fn presigned_url(body: &Value) -> Option<String> {
    body.as_object()
        .and_then(|object| fields::first_text(object, PRESIGNED_URL_FIELDS))
}
