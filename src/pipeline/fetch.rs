//! Batched message-detail fetch.
//!
//! The API enforces a per-time-window rate limit; an unbounded concurrency
//! flood trips it. Requests are therefore issued in fixed-size windows,
//! each fully drained before the next starts, with a cooldown sleep in
//! between. Latency is traded for reliability.

use std::time::Duration;

use futures::future;
use tracing::debug;

use crate::api::{MailApi, Message};
use crate::config::BatchingConfig;
use crate::error::Result;
use crate::model::MessageRef;

use super::Progress;

/// Fetch full detail for every message ref, in windows of
/// `message_batch_size` concurrent requests.
///
/// Results concatenate across windows in window order; within a window
/// they land in input order (the join preserves positions). A failure in
/// any single fetch aborts the remaining windows. The cooldown runs
/// between windows, never after the last one.
pub async fn fetch_messages(
    api: &dyn MailApi,
    refs: &[MessageRef],
    batching: &BatchingConfig,
    progress: &dyn Fn(Progress),
) -> Result<Vec<Message>> {
    let batch_size = batching.message_batch_size.max(1);
    let window_count = refs.len().div_ceil(batch_size);
    let mut results = Vec::with_capacity(refs.len());

    for (i, window) in refs.chunks(batch_size).enumerate() {
        let mails = future::try_join_all(window.iter().map(|r| api.get_message(&r.id))).await?;
        results.extend(mails);

        debug!(
            window = i + 1,
            of = window_count,
            fetched = results.len(),
            "Message window drained"
        );
        progress(Progress::MailsFetched {
            fetched: results.len(),
            total: refs.len(),
        });

        if i + 1 < window_count {
            progress(Progress::Cooldown {
                ms: batching.cooldown_ms,
            });
            tokio::time::sleep(Duration::from_millis(batching.cooldown_ms)).await;
        }
    }

    Ok(results)
}
