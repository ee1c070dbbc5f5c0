//! `gmailgrab` — bulk-download Gmail attachments from the terminal.
//!
//! This crate provides the core library: the Gmail REST client, filter
//! resolution, and the four-stage download pipeline (list ids, fetch
//! details, extract attachment refs, fetch + persist).

pub mod api;
pub mod auth;
pub mod config;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod prompt;
