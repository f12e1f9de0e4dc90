use thiserror::Error;

use crate::http_client;

#[derive(Debug, Error)]
pub enum RevocationError {
    /// The status list could not be retrieved.
    #[error("Status list fetch failed for `{url}`: {reason}")]
    Fetch { url: String, reason: String },
    /// The status list was retrieved but is not a readable list.
    #[error("Invalid status list `{url}`: {reason}")]
    Format { url: String, reason: String },
}

impl RevocationError {
    pub(crate) fn fetch(url: &str, error: http_client::Error) -> Self {
        Self::Fetch {
            url: url.to_owned(),
            reason: error.to_string(),
        }
    }

    pub(crate) fn format(url: &str, reason: impl ToString) -> Self {
        Self::Format {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }
}
