//! `MailApi` implementation over the Gmail REST endpoint.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{GrabError, Result};
use crate::model::{Filter, Label};

use super::types::{AttachmentBody, ListLabelsResponse, Message, MessagePage};
use super::MailApi;

/// Default API endpoint. Overridable through the config for testing.
pub const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// HTTP client for the Gmail REST API, bound to one bearer token.
///
/// All calls target the authenticated user (`users/me`).
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GmailClient {
    /// Create a client from a bearer token and base URL.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gmailgrab/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Issue a GET and decode the JSON body, mapping non-success statuses
    /// to [`GrabError::Api`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GrabError::Api {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MailApi for GmailClient {
    async fn list_labels(&self) -> Result<Vec<Label>> {
        let response: ListLabelsResponse = self.get_json("users/me/labels", &[]).await?;
        Ok(response.labels)
    }

    async fn list_messages(
        &self,
        filter: &Filter,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<MessagePage> {
        let mut query: Vec<(&str, String)> = vec![("maxResults", page_size.to_string())];
        match filter {
            Filter::Label(label) => query.push(("labelIds", label.id.clone())),
            Filter::From(addr) => query.push(("q", format!("from:{addr}"))),
            Filter::All => {}
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        self.get_json("users/me/messages", &query).await
    }

    async fn get_message(&self, id: &str) -> Result<Message> {
        let path = format!("users/me/messages/{id}");
        self.get_json(&path, &[("format", "full".to_string())]).await
    }

    async fn get_attachment(&self, mail_id: &str, attachment_id: &str) -> Result<String> {
        let path = format!("users/me/messages/{mail_id}/attachments/{attachment_id}");
        let body: AttachmentBody = self.get_json(&path, &[]).await?;
        body.data.ok_or_else(|| GrabError::Api {
            status: 200,
            message: format!("attachment '{attachment_id}' response carried no data"),
        })
    }
}

/// Pull the human-readable message out of a Gmail error body, falling back
/// to the HTTP status text.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_gmail_body() {
        let body = r#"{"error":{"code":429,"message":"Rate limit exceeded"}}"#;
        let status = reqwest::StatusCode::TOO_MANY_REQUESTS;
        assert_eq!(error_message(body, status), "Rate limit exceeded");
    }

    #[test]
    fn test_error_message_fallback_to_status() {
        let status = reqwest::StatusCode::FORBIDDEN;
        assert_eq!(error_message("not json", status), "Forbidden");
    }
}
