//! Message filter modes.

use super::message::Label;

/// Exactly one filter mode is selected per run, either from the command
/// line (`--label`) or interactively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Messages carrying a specific label, resolved to its remote id.
    Label(Label),

    /// Messages from a specific sender address.
    From(String),

    /// No constraint; every message in the account.
    All,
}

impl Filter {
    /// Short human-readable description for logging and the spinner.
    pub fn describe(&self) -> String {
        match self {
            Filter::Label(label) => format!("label '{}'", label.name),
            Filter::From(addr) => format!("from '{addr}'"),
            Filter::All => "all messages".to_string(),
        }
    }
}
