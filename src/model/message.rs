//! Message and label identifiers returned by listing calls.

use serde::{Deserialize, Serialize};

/// Opaque reference to one remote message, as returned by a listing call.
///
/// Listing returns only identifiers; the payload tree and timestamp require
/// a follow-up `get_message` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Remote message id.
    pub id: String,

    /// Conversation thread id (unused by the pipeline, kept for logging).
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl MessageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thread_id: None,
        }
    }
}

/// A Gmail label (system or user-defined).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    /// Remote label id, used as the `labelIds` listing filter.
    pub id: String,

    /// Human-readable label name, matched against `--label`.
    pub name: String,
}
