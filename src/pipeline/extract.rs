//! Attachment extraction from message payload trees.

use std::collections::HashMap;

use crate::api::{Message, MessagePart};
use crate::model::AttachmentRef;

/// Walk the fetched messages and collect every attachment reference, in
/// message order and part order.
///
/// Messages without a payload or without parts are dropped. Signed
/// messages (`multipart/signed` at the top level) keep their attachments
/// two levels down: only `multipart/mixed` children are descended into,
/// and their direct children inspected. Every other message exposes
/// attachments as direct children of the payload. Parts whose body carries
/// no attachment id are skipped silently.
pub fn extract_attachments(mails: &[Message]) -> Vec<AttachmentRef> {
    let mut out = Vec::new();

    for mail in mails {
        let Some(payload) = &mail.payload else {
            continue;
        };
        if payload.parts.is_empty() {
            continue;
        }

        if payload.mime_type == "multipart/signed" {
            for part in &payload.parts {
                if part.mime_type != "multipart/mixed" {
                    continue;
                }
                for inner in &part.parts {
                    push_if_attachment(&mail.id, inner, &mut out);
                }
            }
        } else {
            for part in &payload.parts {
                push_if_attachment(&mail.id, part, &mut out);
            }
        }
    }

    out
}

/// Build the `mail id → internalDate` index used by the save stage, so the
/// persisted timestamps come from the details already fetched instead of a
/// second round of per-attachment message fetches.
pub fn timestamp_index(mails: &[Message]) -> HashMap<String, i64> {
    mails
        .iter()
        .filter_map(|m| m.internal_date.map(|d| (m.id.clone(), d)))
        .collect()
}

fn push_if_attachment(mail_id: &str, part: &MessagePart, out: &mut Vec<AttachmentRef>) {
    let Some(body) = &part.body else {
        return;
    };
    let Some(id) = &body.attachment_id else {
        return;
    };
    out.push(AttachmentRef {
        mail_id: mail_id.to_string(),
        name: part.filename.clone(),
        id: id.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PartBody;

    fn attachment_part(name: &str, attachment_id: &str) -> MessagePart {
        MessagePart {
            filename: name.to_string(),
            mime_type: "application/octet-stream".to_string(),
            body: Some(PartBody {
                attachment_id: Some(attachment_id.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn inline_part(mime_type: &str) -> MessagePart {
        MessagePart {
            mime_type: mime_type.to_string(),
            body: Some(PartBody {
                size: Some(64),
                data: Some("aGk=".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn message(id: &str, payload: MessagePart) -> Message {
        Message {
            id: id.to_string(),
            internal_date: Some(1_700_000_000_000),
            payload: Some(payload),
        }
    }

    #[test]
    fn test_flat_multipart_extraction_preserves_order() {
        let payload = MessagePart {
            mime_type: "multipart/mixed".to_string(),
            parts: vec![
                inline_part("text/plain"),
                attachment_part("a.pdf", "att-a"),
                attachment_part("b.png", "att-b"),
            ],
            ..Default::default()
        };

        let refs = extract_attachments(&[message("m1", payload)]);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].id, "att-a");
        assert_eq!(refs[0].name, "a.pdf");
        assert_eq!(refs[0].mail_id, "m1");
        assert_eq!(refs[1].id, "att-b");
    }

    #[test]
    fn test_signed_multipart_descends_into_mixed_only() {
        let payload = MessagePart {
            mime_type: "multipart/signed".to_string(),
            parts: vec![
                // Signature part; never yields attachments
                inline_part("application/pkcs7-signature"),
                MessagePart {
                    mime_type: "multipart/mixed".to_string(),
                    parts: vec![
                        attachment_part("contract.pdf", "att-1"),
                        inline_part("text/plain"),
                    ],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let refs = extract_attachments(&[message("m2", payload)]);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].id, "att-1");
        assert_eq!(refs[0].name, "contract.pdf");
    }

    #[test]
    fn test_signed_attachment_at_top_level_is_not_extracted() {
        // Inside multipart/signed, direct children are never attachments
        let payload = MessagePart {
            mime_type: "multipart/signed".to_string(),
            parts: vec![attachment_part("stray.bin", "att-x")],
            ..Default::default()
        };
        assert!(extract_attachments(&[message("m3", payload)]).is_empty());
    }

    #[test]
    fn test_messages_without_payload_or_parts_are_dropped() {
        let no_payload = Message {
            id: "m4".to_string(),
            internal_date: Some(1),
            payload: None,
        };
        let no_parts = message(
            "m5",
            MessagePart {
                mime_type: "text/plain".to_string(),
                ..Default::default()
            },
        );
        assert!(extract_attachments(&[no_payload, no_parts]).is_empty());
    }

    #[test]
    fn test_timestamp_index_skips_missing_dates() {
        let mut without_date = message("m7", MessagePart::default());
        without_date.internal_date = None;
        let mails = vec![message("m6", MessagePart::default()), without_date];

        let index = timestamp_index(&mails);
        assert_eq!(index.get("m6"), Some(&1_700_000_000_000));
        assert!(!index.contains_key("m7"));
    }
}
