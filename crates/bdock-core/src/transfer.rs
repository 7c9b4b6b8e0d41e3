#![forbid(unsafe_code)]

//! Drag transfer payloads.
//!
//! A sidebar item writes the dragged block-type name in two encodings: a
//! structured JSON payload under [`STRUCTURED_MIME`] and the bare name under
//! [`PLAIN_TEXT_MIME`]. A drop surface living in a foreign document may only
//! see one of them, so [`decode_block_name`] tries them in a fixed order:
//!
//! 1. structured payload,
//! 2. plain text,
//! 3. [`TransferError::Unreadable`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type of the structured payload.
pub const STRUCTURED_MIME: &str = "application/x-bdock-block+json";
/// MIME type of the plain-text payload.
pub const PLAIN_TEXT_MIME: &str = "text/plain";

const PAYLOAD_KIND: &str = "block";

/// Decoding failure for a drop payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Neither encoding produced a usable block name.
    #[error("TransferPayloadUnreadable")]
    Unreadable,
}

/// Snapshot of a `DataTransfer` object: MIME type to string data.
///
/// The host copies what it can read out of the browser's transfer object
/// into this map before forwarding the event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferData {
    entries: BTreeMap<String, String>,
}

impl TransferData {
    /// Empty transfer data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data for `mime`.
    pub fn set(&mut self, mime: impl Into<String>, data: impl Into<String>) {
        self.entries.insert(mime.into(), data.into());
    }

    /// Data stored under `mime`, if any.
    #[must_use]
    pub fn get(&self, mime: &str) -> Option<&str> {
        self.entries.get(mime).map(String::as_str)
    }

    /// Iterate `(mime, data)` pairs in MIME order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true when nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredPayload {
    #[serde(rename = "type")]
    kind: String,
    block_name: String,
}

/// Write both encodings of `block_name`.
#[must_use]
pub fn encode_block_name(block_name: &str) -> TransferData {
    let mut data = TransferData::new();
    data.set(PLAIN_TEXT_MIME, block_name);
    let structured = StructuredPayload {
        kind: PAYLOAD_KIND.to_string(),
        block_name: block_name.to_string(),
    };
    match serde_json::to_string(&structured) {
        Ok(json) => data.set(STRUCTURED_MIME, json),
        Err(err) => tracing::debug!(
            target: "bdock.transfer",
            error = %err,
            "structured payload not written"
        ),
    }
    data
}

/// Decode the dragged block-type name: structured first, then plain text.
pub fn decode_block_name(data: &TransferData) -> Result<String, TransferError> {
    if let Some(name) = data.get(STRUCTURED_MIME).and_then(decode_structured) {
        return Ok(name);
    }
    if let Some(name) = data.get(PLAIN_TEXT_MIME).and_then(decode_plain) {
        return Ok(name);
    }
    Err(TransferError::Unreadable)
}

fn decode_structured(raw: &str) -> Option<String> {
    let payload: StructuredPayload = serde_json::from_str(raw).ok()?;
    if payload.kind != PAYLOAD_KIND {
        return None;
    }
    valid_block_name(payload.block_name.trim())
}

fn decode_plain(raw: &str) -> Option<String> {
    valid_block_name(raw.trim())
}

// Block names are namespaced identifiers; anything with whitespace is text
// dragged in from elsewhere, not one of our tokens.
fn valid_block_name(name: &str) -> Option<String> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_writes_both_encodings() {
        let data = encode_block_name("core/heading");
        assert_eq!(data.get(PLAIN_TEXT_MIME), Some("core/heading"));
        let json = data.get(STRUCTURED_MIME).expect("structured payload");
        assert!(json.contains("\"blockName\":\"core/heading\""));
        assert_eq!(decode_block_name(&data), Ok("core/heading".to_string()));
    }

    #[test]
    fn structured_wins_over_plain() {
        let mut data = TransferData::new();
        data.set(PLAIN_TEXT_MIME, "core/text");
        data.set(
            STRUCTURED_MIME,
            r#"{"type":"block","blockName":"core/button"}"#,
        );
        assert_eq!(decode_block_name(&data), Ok("core/button".to_string()));
    }

    #[test]
    fn corrupt_structured_falls_back_to_plain() {
        let mut data = TransferData::new();
        data.set(STRUCTURED_MIME, "{not json");
        data.set(PLAIN_TEXT_MIME, "  core/text\n");
        assert_eq!(decode_block_name(&data), Ok("core/text".to_string()));
    }

    #[test]
    fn wrong_kind_is_not_a_block() {
        let mut data = TransferData::new();
        data.set(STRUCTURED_MIME, r#"{"type":"file","blockName":"x/y"}"#);
        assert_eq!(decode_block_name(&data), Err(TransferError::Unreadable));
    }

    #[test]
    fn foreign_text_is_unreadable() {
        let mut data = TransferData::new();
        data.set(PLAIN_TEXT_MIME, "some dragged sentence");
        assert_eq!(decode_block_name(&data), Err(TransferError::Unreadable));
        assert_eq!(
            decode_block_name(&TransferData::new()),
            Err(TransferError::Unreadable)
        );
        assert_eq!(TransferError::Unreadable.to_string(), "TransferPayloadUnreadable");
    }
}
