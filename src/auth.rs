//! Credential loading.
//!
//! gmailgrab does not run an OAuth flow itself. It expects an already
//! authorized bearer token, supplied either through the `GMAILGRAB_TOKEN`
//! environment variable or a token file. Obtaining and refreshing the token
//! is the job of an external tool (e.g. `gcloud auth print-access-token`).

use std::path::PathBuf;

use tracing::info;

use crate::error::{GrabError, Result};

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "GMAILGRAB_TOKEN";

/// An authorized API credential.
#[derive(Clone)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Load a bearer token, checking in order:
    /// 1. `$GMAILGRAB_TOKEN`
    /// 2. `<config-dir>/gmailgrab/token` (single line, trimmed)
    pub fn load() -> Result<Self> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                info!("Using token from ${TOKEN_ENV}");
                return Ok(Self { token });
            }
        }

        if let Some(path) = token_file_path() {
            if path.exists() {
                let contents =
                    std::fs::read_to_string(&path).map_err(|e| GrabError::io(&path, e))?;
                let token = contents.trim().to_string();
                if !token.is_empty() {
                    info!(path = %path.display(), "Using token file");
                    return Ok(Self { token });
                }
            }
        }

        Err(GrabError::Auth(format!(
            "set ${TOKEN_ENV} or write a token to {}",
            token_file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<config-dir>/gmailgrab/token".to_string())
        )))
    }

    /// The raw bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Credentials {
    // Never print the token itself.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("token", &"***").finish()
    }
}

/// Standard location of the token file.
pub fn token_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gmailgrab").join("token"))
}
