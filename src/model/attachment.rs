//! Attachment references and persisted-file records.
//!
//! The binary content is NOT fetched at extraction time. Only the
//! `(mail_id, id)` address is stored; the payload is downloaded during the
//! save stage.

use std::path::PathBuf;

/// Address of one attachment within one message.
///
/// `mail_id` and `id` together uniquely identify the binary in the remote
/// store; `name` is the original filename as reported by the MIME part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Id of the message that carries the attachment.
    pub mail_id: String,

    /// Original attachment filename (may be empty for unnamed parts).
    pub name: String,

    /// Opaque attachment id for the follow-up body fetch.
    pub id: String,
}

/// Record of one attachment written to disk.
#[derive(Debug, Clone)]
pub struct SavedAttachment {
    /// Final path, after timestamp suffixing and collision resolution.
    pub path: PathBuf,

    /// Decoded size in bytes.
    pub size: u64,
}
