//! Domain types shared across the pipeline stages.

pub mod attachment;
pub mod filter;
pub mod message;

pub use attachment::{AttachmentRef, SavedAttachment};
pub use filter::Filter;
pub use message::{Label, MessageRef};
