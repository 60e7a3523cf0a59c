//! Message files read from disk.

use anyhow::{Context, Result};
use mailsmith_mime::{Message, html};
use serde::Deserialize;
use std::path::Path;

/// JSON form of a message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Draft {
    #[serde(default)]
    from: Option<String>,
    to: Vec<String>,
    #[serde(default)]
    cc: Vec<String>,
    #[serde(default)]
    bcc: Vec<String>,
    subject: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    html: String,
    /// Wraps `html` in a complete document with this title.
    #[serde(default)]
    html_title: Option<String>,
}

impl Draft {
    /// Parses a message file.
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("invalid message file")
    }

    /// Reads a message file from disk.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Builds the message to encode.
    pub fn into_message(self) -> Message {
        let html_body = match &self.html_title {
            Some(title) if !self.html.is_empty() => html::document(title, self.html.as_bytes()),
            _ => self.html.into_bytes(),
        };

        Message {
            from: self.from,
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            subject: self.subject,
            text_body: self.text,
            html_body,
        }
    }
}
