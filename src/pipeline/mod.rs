//! The attachment download pipeline.
//!
//! Four sequential stages: paginated id listing, batched detail fetch,
//! attachment extraction, and batched fetch + persist. Stages communicate
//! through plain values; the only concurrency lives inside a fetch window.

pub mod extract;
pub mod fetch;
pub mod list;
pub mod save;

use std::path::Path;

use tracing::info;

use crate::api::MailApi;
use crate::config::Config;
use crate::error::Result;
use crate::model::{Filter, SavedAttachment};

/// Progress events emitted by the pipeline stages.
///
/// The binary maps these onto the spinner; tests collect them to assert
/// window and cooldown behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// One listing page was read.
    PageRead { page: usize },
    /// A message-detail window drained; `fetched` is the running total.
    MailsFetched { fetched: usize, total: usize },
    /// Sleeping between message-detail windows.
    Cooldown { ms: u64 },
    /// An attachment window drained; `saved` is the running total.
    AttachmentsSaved { saved: usize, total: usize },
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct Summary {
    /// Messages matched by the filter.
    pub messages: usize,
    /// Attachments written to disk.
    pub saved: Vec<SavedAttachment>,
}

impl Summary {
    /// Total decoded bytes written.
    pub fn total_bytes(&self) -> u64 {
        self.saved.iter().map(|s| s.size).sum()
    }
}

/// Run the whole pipeline for one filter.
///
/// The progress callback receives events from every stage.
pub async fn run(
    api: &dyn MailApi,
    filter: &Filter,
    config: &Config,
    output_dir: &Path,
    progress: &dyn Fn(Progress),
) -> Result<Summary> {
    let page_size = config.listing.page_size_for(filter);
    let refs = list::list_all_messages(api, filter, page_size, progress).await?;
    info!(messages = refs.len(), filter = %filter.describe(), "Listing complete");

    let mails = fetch::fetch_messages(api, &refs, &config.batching, progress).await?;

    let attachments = extract::extract_attachments(&mails);
    let timestamps = extract::timestamp_index(&mails);
    info!(attachments = attachments.len(), "Extraction complete");

    let saved = save::fetch_and_save_attachments(
        api,
        &attachments,
        &timestamps,
        output_dir,
        config.batching.attachment_batch_size,
        progress,
    )
    .await?;

    Ok(Summary {
        messages: mails.len(),
        saved,
    })
}
