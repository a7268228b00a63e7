//! Typed decoding of inbound event payloads.
//!
//! Every inbound event carries a JSON payload. Each event has one accepted
//! shape, decoded here once; anything else becomes a [`PayloadError`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::NewTodo;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("payload for `{event}` must be {expected}: {source}")]
    Shape {
        event: &'static str,
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("payload for `{event}` is not an integer id: {reason}")]
    InvalidId { event: &'static str, reason: String },
}

impl PayloadError {
    /// Name of the event whose payload failed to decode, when known.
    pub fn event(&self) -> Option<&str> {
        match self {
            PayloadError::UnknownEvent(name) => Some(name.as_str()),
            PayloadError::Shape { event, .. } | PayloadError::InvalidId { event, .. } => {
                Some(*event)
            }
        }
    }
}

/// Id of a todo row as sent by the frontend.
///
/// Accepts an integral JSON number (`3`, `3.0`) or a string holding an
/// integer (`"3"`, `" 3 "`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawItemId")]
pub struct ItemId(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItemId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl TryFrom<RawItemId> for ItemId {
    type Error = String;

    fn try_from(raw: RawItemId) -> Result<Self, Self::Error> {
        match raw {
            RawItemId::Int(id) => Ok(ItemId(id)),
            RawItemId::Float(value) => {
                if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
                    Ok(ItemId(value as i64))
                } else {
                    Err(format!("`{value}` is not an integer id"))
                }
            }
            RawItemId::Text(text) => text
                .trim()
                .parse::<i64>()
                .map(ItemId)
                .map_err(|_| format!("`{text}` is not an integer id")),
        }
    }
}

impl From<ItemId> for i64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Create payload: the object itself, or a JSON string encoding it.
///
/// Held as a map so arrays never reach the struct deserializer, which would
/// accept them positionally.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNewTodo {
    Object(Map<String, Value>),
    Encoded(String),
}

/// `[id, text]` as sent by the edit-description event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DescriptionEdit(pub ItemId, pub String);

pub(crate) fn decode<T: DeserializeOwned>(
    event: &'static str,
    expected: &'static str,
    payload: &str,
) -> Result<T, PayloadError> {
    serde_json::from_str(payload).map_err(|source| PayloadError::Shape {
        event,
        expected,
        source,
    })
}

pub fn decode_item_id(event: &'static str, payload: &str) -> Result<ItemId, PayloadError> {
    let raw: RawItemId = decode(event, "a number or a numeric string", payload)?;
    ItemId::try_from(raw).map_err(|reason| PayloadError::InvalidId { event, reason })
}

pub fn decode_new_todo(event: &'static str, payload: &str) -> Result<NewTodo, PayloadError> {
    const EXPECTED: &str = "a todo object or its JSON encoding";
    let fields = match decode::<RawNewTodo>(event, EXPECTED, payload)? {
        RawNewTodo::Object(fields) => fields,
        RawNewTodo::Encoded(inner) => decode::<Map<String, Value>>(event, EXPECTED, &inner)?,
    };
    serde_json::from_value(Value::Object(fields)).map_err(|source| PayloadError::Shape {
        event,
        expected: EXPECTED,
        source,
    })
}

pub fn decode_description_edit(
    event: &'static str,
    payload: &str,
) -> Result<DescriptionEdit, PayloadError> {
    decode(event, "an [id, text] pair", payload)
}

/// Optional window label; any non-string payload means "no label".
pub fn decode_window_label(payload: &str) -> Option<String> {
    serde_json::from_str::<String>(payload)
        .ok()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
}
