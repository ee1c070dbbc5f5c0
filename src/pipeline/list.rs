//! Paginated message-id listing.

use tracing::debug;

use crate::api::MailApi;
use crate::error::Result;
use crate::model::{Filter, MessageRef};

use super::Progress;

/// Accumulate every message id matching `filter`, following the page
/// cursor until the server stops returning one.
///
/// Pages are concatenated in fetch order into a fresh `Vec`; an empty
/// final page is tolerated. Any list-call error aborts the chain and
/// propagates — there is no partial-result fallback and no retry.
pub async fn list_all_messages(
    api: &dyn MailApi,
    filter: &Filter,
    page_size: u32,
    progress: &dyn Fn(Progress),
) -> Result<Vec<MessageRef>> {
    let mut all = Vec::new();
    let mut page_token: Option<String> = None;
    let mut page = 0usize;

    loop {
        let response = api
            .list_messages(filter, page_size, page_token.as_deref())
            .await?;

        page += 1;
        debug!(page, ids = response.messages.len(), "Read listing page");
        all.extend(response.messages);
        progress(Progress::PageRead { page });

        match response.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(all)
}
