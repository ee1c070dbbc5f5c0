//! Wire types for the Gmail REST API.
//!
//! Field names follow the API's camelCase JSON. Everything optional on the
//! wire is optional here; the pipeline decides what absence means.

use serde::{Deserialize, Deserializer};

use crate::model::{Label, MessageRef};

/// Response of `GET users/me/labels`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLabelsResponse {
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// One page of `GET users/me/messages`.
///
/// The final page of a listing may omit `messages` entirely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<MessageRef>,

    /// Cursor for the next page; absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,

    #[serde(default)]
    pub result_size_estimate: Option<u64>,
}

/// Full message detail from `GET users/me/messages/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,

    /// Server receive time in milliseconds since the epoch. The API encodes
    /// int64 values as JSON strings; present even under `format=minimal`.
    #[serde(default, deserialize_with = "millis_opt")]
    pub internal_date: Option<i64>,

    /// Root of the MIME part tree. Absent under `format=minimal`.
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

/// One node of a message's MIME part tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub part_id: Option<String>,

    /// Media type, e.g. `multipart/mixed` or `application/pdf`.
    #[serde(default)]
    pub mime_type: String,

    /// Original filename; empty for non-attachment parts.
    #[serde(default)]
    pub filename: String,

    #[serde(default)]
    pub body: Option<PartBody>,

    /// Child parts for `multipart/*` nodes.
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// Body descriptor of one MIME part.
///
/// Small bodies arrive inline in `data`; attachment bodies carry an
/// `attachment_id` for a follow-up fetch instead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    #[serde(default)]
    pub attachment_id: Option<String>,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub data: Option<String>,
}

/// Response of `GET users/me/messages/{id}/attachments/{aid}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentBody {
    #[serde(default)]
    pub size: Option<u64>,

    /// URL-safe base64 content (`-`/`_` alphabet).
    #[serde(default)]
    pub data: Option<String>,
}

/// Accept int64 millisecond timestamps as either a JSON number or the
/// string encoding the API actually sends.
fn millis_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_date_string_form() {
        let msg: Message =
            serde_json::from_str(r#"{"id":"m1","internalDate":"1709649000000"}"#).unwrap();
        assert_eq!(msg.internal_date, Some(1_709_649_000_000));
    }

    #[test]
    fn test_internal_date_number_form() {
        let msg: Message =
            serde_json::from_str(r#"{"id":"m1","internalDate":1709649000000}"#).unwrap();
        assert_eq!(msg.internal_date, Some(1_709_649_000_000));
    }

    #[test]
    fn test_empty_final_page() {
        let page: MessagePage = serde_json::from_str(r#"{"resultSizeEstimate":0}"#).unwrap();
        assert!(page.messages.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_payload_tree() {
        let msg: Message = serde_json::from_str(
            r#"{
                "id": "m1",
                "internalDate": "1709649000000",
                "payload": {
                    "mimeType": "multipart/mixed",
                    "filename": "",
                    "parts": [
                        {"mimeType": "text/plain", "filename": "", "body": {"size": 12}},
                        {
                            "mimeType": "application/pdf",
                            "filename": "invoice.pdf",
                            "body": {"attachmentId": "att-1", "size": 2048}
                        }
                    ]
                }
            }"#,
        )
        .unwrap();

        let payload = msg.payload.unwrap();
        assert_eq!(payload.parts.len(), 2);
        assert_eq!(payload.parts[1].filename, "invoice.pdf");
        assert_eq!(
            payload.parts[1].body.as_ref().unwrap().attachment_id.as_deref(),
            Some("att-1")
        );
    }
}
