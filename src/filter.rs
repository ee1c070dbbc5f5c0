//! Filter selection: resolve `--label` names against the live label list,
//! or build a filter from interactive answers.

use tracing::info;

use crate::api::MailApi;
use crate::error::{GrabError, Result};
use crate::model::Filter;
use crate::prompt;

/// Resolve a label name (from `--label`) to a filter.
///
/// Fails with [`GrabError::LabelNotFound`] when the account has no label of
/// that name; no message listing is attempted in that case.
pub async fn from_label_name(api: &dyn MailApi, name: &str) -> Result<Filter> {
    let labels = api.list_labels().await?;
    let label = labels
        .into_iter()
        .find(|l| l.name == name)
        .ok_or_else(|| GrabError::LabelNotFound(name.to_string()))?;

    info!(label = %label.name, id = %label.id, "Resolved label");
    Ok(Filter::Label(label))
}

/// Choose a filter interactively: mode menu, then either a label menu
/// (populated from the live label list) or a sender prompt.
pub async fn choose_interactively(api: &dyn MailApi) -> Result<Filter> {
    const MODES: [&str; 3] = ["Using from email id", "Using label", "All messages"];

    match prompt::select("How would you like to filter?", &MODES)? {
        0 => {
            let addr = prompt::input("Enter from email id:")?;
            Ok(Filter::From(addr))
        }
        1 => {
            let mut labels = api.list_labels().await?;
            if labels.is_empty() {
                return Err(GrabError::LabelNotFound("<no labels in account>".to_string()));
            }
            let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
            let index = prompt::select("Choose label for filtering mails:", &names)?;
            Ok(Filter::Label(labels.remove(index)))
        }
        _ => Ok(Filter::All),
    }
}
