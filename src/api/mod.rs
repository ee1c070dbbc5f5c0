//! Gmail REST API access.
//!
//! [`MailApi`] is the seam between the pipeline and the network: the
//! pipeline stages only ever see the trait, so tests drive them with an
//! in-memory stub while the binary wires in [`GmailClient`].

pub mod gmail;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Filter, Label};

pub use gmail::GmailClient;
pub use types::{AttachmentBody, Message, MessagePage, MessagePart, PartBody};

/// The four remote operations the pipeline consumes.
#[async_trait]
pub trait MailApi: Send + Sync {
    /// List all labels in the account.
    async fn list_labels(&self) -> Result<Vec<Label>>;

    /// List one page of message ids matching `filter`.
    ///
    /// `page_token` is the cursor from the previous page's
    /// [`MessagePage::next_page_token`], or `None` for the first page.
    async fn list_messages(
        &self,
        filter: &Filter,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<MessagePage>;

    /// Fetch full message detail (payload tree plus `internalDate`).
    async fn get_message(&self, id: &str) -> Result<Message>;

    /// Fetch one attachment body. Returns the raw URL-safe base64 string;
    /// decoding is the caller's job.
    async fn get_attachment(&self, mail_id: &str, attachment_id: &str) -> Result<String>;
}
