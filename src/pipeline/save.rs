//! Batched attachment fetch, decode, and persist.
//!
//! Attachments are grouped per owning message and the groups processed in
//! concurrency windows (same discipline as the detail fetch, no cooldown).
//! Each file lands under the output directory named
//! `<stem>-<YYYY-MM-DD_HHmmss><ext>`, with its mtime rewritten to the
//! message's internal timestamp and its atime set to now.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{NaiveDateTime, Offset, TimeZone};
use futures::future;
use tracing::{debug, warn};

use crate::api::MailApi;
use crate::encoding::decode_urlsafe_base64;
use crate::error::{GrabError, Result};
use crate::model::{AttachmentRef, SavedAttachment};

use super::Progress;

/// Timestamp suffix appended to every saved file name.
const NAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Fetch and persist every attachment, windowed by owning message.
///
/// `timestamps` maps mail id → internalDate milliseconds, threaded through
/// from the detail-fetch stage. A failure on any single attachment is
/// wrapped with its id and aborts the enclosing batch.
pub async fn fetch_and_save_attachments(
    api: &dyn MailApi,
    attachments: &[AttachmentRef],
    timestamps: &HashMap<String, i64>,
    output_dir: &Path,
    batch_size: usize,
    progress: &dyn Fn(Progress),
) -> Result<Vec<SavedAttachment>> {
    if attachments.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(output_dir).map_err(|e| GrabError::io(output_dir, e))?;

    let groups = group_by_mail(attachments);
    let total = attachments.len();
    let mut saved = Vec::with_capacity(total);

    for window in groups.chunks(batch_size.max(1)) {
        let tasks = window
            .iter()
            .map(|(mail_id, refs)| save_group(api, mail_id, refs, timestamps, output_dir));
        for group in future::try_join_all(tasks).await? {
            saved.extend(group);
        }
        progress(Progress::AttachmentsSaved {
            saved: saved.len(),
            total,
        });
    }

    Ok(saved)
}

/// Fetch and persist the attachments of one message, sequentially.
async fn save_group(
    api: &dyn MailApi,
    mail_id: &str,
    refs: &[&AttachmentRef],
    timestamps: &HashMap<String, i64>,
    output_dir: &Path,
) -> Result<Vec<SavedAttachment>> {
    let internal_date = *timestamps.get(mail_id).ok_or_else(|| {
        GrabError::InvalidTimestamp(format!("no internalDate for message '{mail_id}'"))
    })?;

    let sent_at = chrono::Local
        .timestamp_millis_opt(internal_date)
        .single()
        .ok_or_else(|| GrabError::InvalidTimestamp(internal_date.to_string()))?;

    let mut saved = Vec::with_capacity(refs.len());
    for att in refs {
        let encoded = api
            .get_attachment(&att.mail_id, &att.id)
            .await
            .map_err(|e| GrabError::attachment("fetch", &att.id, e))?;
        let bytes = decode_urlsafe_base64(&encoded)
            .map_err(|e| GrabError::attachment("decode", &att.id, e))?;

        let name = timestamped_name(&att.name, sent_at.naive_local());
        let path = unique_path(&output_dir.join(name));
        write_with_times(
            &path,
            &bytes,
            internal_date,
            sent_at.offset().fix().local_minus_utc(),
        )
        .map_err(|e| GrabError::attachment("save", &att.id, e))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Saved attachment");
        saved.push(SavedAttachment {
            path,
            size: bytes.len() as u64,
        });
    }

    Ok(saved)
}

/// Group attachment refs by owning message, preserving first-seen order.
fn group_by_mail(attachments: &[AttachmentRef]) -> Vec<(&str, Vec<&AttachmentRef>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&AttachmentRef>)> = Vec::new();

    for att in attachments {
        match index.get(att.mail_id.as_str()) {
            Some(&i) => groups[i].1.push(att),
            None => {
                index.insert(&att.mail_id, groups.len());
                groups.push((&att.mail_id, vec![att]));
            }
        }
    }

    groups
}

/// Build the destination file name: the original stem, the message's send
/// time, then the original extension. `invoice.pdf` sent 2024-03-05
/// 14:30:00 becomes `invoice-2024-03-05_143000.pdf`.
fn timestamped_name(original: &str, sent_at: NaiveDateTime) -> String {
    let sanitized = sanitize_filename(original);
    let formatted = sent_at.format(NAME_TIMESTAMP_FORMAT);

    let path = Path::new(&sanitized);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("attachment");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{formatted}.{ext}"),
        None => format!("{stem}-{formatted}"),
    }
}

/// Sanitize an attachment name for use as a file name.
///
/// Replaces invalid characters with `_` and truncates to 150 chars.
fn sanitize_filename(s: &str) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' || c == '_' || c == '@' {
                c
            } else {
                '_'
            }
        })
        .take(150)
        .collect();

    if sanitized.trim_matches(['.', '_']).is_empty() {
        "attachment".to_string()
    } else {
        sanitized
    }
}

/// If `path` already exists, append a counter to make it unique.
fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    for i in 1..1000 {
        let candidate = if ext.is_empty() {
            parent.join(format!("{stem}_{i}"))
        } else {
            parent.join(format!("{stem}_{i}.{ext}"))
        };
        if !candidate.exists() {
            return candidate;
        }
    }

    warn!(path = %path.display(), "Could not find a free name, overwriting");
    path.to_path_buf()
}

/// Write the bytes, then rewrite the file times: mtime from the message's
/// internal timestamp shifted by the local UTC offset, atime now.
fn write_with_times(
    path: &Path,
    bytes: &[u8],
    internal_date_ms: i64,
    local_offset_secs: i32,
) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| GrabError::io(path, e))?;

    let mtime = millis_to_system_time(adjusted_mtime_millis(internal_date_ms, local_offset_secs));
    let times = std::fs::FileTimes::new()
        .set_accessed(SystemTime::now())
        .set_modified(mtime);

    let file = std::fs::File::options()
        .write(true)
        .open(path)
        .map_err(|e| GrabError::io(path, e))?;
    file.set_times(times).map_err(|e| GrabError::io(path, e))?;

    Ok(())
}

/// Shift an epoch-milliseconds timestamp by the local UTC offset, so the
/// recorded mtime reads as the message's wall-clock send time.
fn adjusted_mtime_millis(internal_date_ms: i64, local_offset_secs: i32) -> i64 {
    internal_date_ms - i64::from(local_offset_secs) * 1000
}

fn millis_to_system_time(ms: i64) -> SystemTime {
    if ms >= 0 {
        SystemTime::UNIX_EPOCH + Duration::from_millis(ms as u64)
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_millis(ms.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sent_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_timestamped_name_with_extension() {
        assert_eq!(
            timestamped_name("invoice.pdf", sent_at()),
            "invoice-2024-03-05_143000.pdf"
        );
    }

    #[test]
    fn test_timestamped_name_without_extension() {
        assert_eq!(timestamped_name("README", sent_at()), "README-2024-03-05_143000");
    }

    #[test]
    fn test_timestamped_name_multiple_dots() {
        assert_eq!(
            timestamped_name("backup.tar.gz", sent_at()),
            "backup.tar-2024-03-05_143000.gz"
        );
    }

    #[test]
    fn test_timestamped_name_sanitizes() {
        assert_eq!(
            timestamped_name("my report (final).pdf", sent_at()),
            "my_report__final_-2024-03-05_143000.pdf"
        );
    }

    #[test]
    fn test_timestamped_name_empty() {
        assert_eq!(timestamped_name("", sent_at()), "attachment-2024-03-05_143000");
    }

    #[test]
    fn test_group_by_mail_preserves_first_seen_order() {
        let refs = vec![
            AttachmentRef {
                mail_id: "m2".into(),
                name: "a".into(),
                id: "1".into(),
            },
            AttachmentRef {
                mail_id: "m1".into(),
                name: "b".into(),
                id: "2".into(),
            },
            AttachmentRef {
                mail_id: "m2".into(),
                name: "c".into(),
                id: "3".into(),
            },
        ];

        let groups = group_by_mail(&refs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "m2");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "m1");
        assert_eq!(groups[1].1.len(), 1);
    }

    #[test]
    fn test_unique_path_appends_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice-2024-03-05_143000.pdf");
        assert_eq!(unique_path(&path), path);

        std::fs::write(&path, b"x").unwrap();
        assert_eq!(
            unique_path(&path),
            dir.path().join("invoice-2024-03-05_143000_1.pdf")
        );

        std::fs::write(dir.path().join("invoice-2024-03-05_143000_1.pdf"), b"x").unwrap();
        assert_eq!(
            unique_path(&path),
            dir.path().join("invoice-2024-03-05_143000_2.pdf")
        );
    }

    #[test]
    fn test_adjusted_mtime() {
        // UTC+2: the stored mtime is two hours earlier than the raw epoch value
        assert_eq!(adjusted_mtime_millis(1_709_649_000_000, 7200), 1_709_641_800_000);
        // West of UTC the shift goes the other way
        assert_eq!(adjusted_mtime_millis(1_709_649_000_000, -3600), 1_709_652_600_000);
        assert_eq!(adjusted_mtime_millis(1_000, 0), 1_000);
    }

    #[test]
    fn test_write_with_times_sets_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        write_with_times(&path, b"payload", 1_709_649_000_000, 0).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
        let mtime = std::fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(mtime, millis_to_system_time(1_709_649_000_000));
    }
}
