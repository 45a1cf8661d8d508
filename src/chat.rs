//! Thin client for the chat platform's Web API.
//!
//! Every call is a bearer-authenticated POST to `{api_base}/{method}`. The raw
//! response body is handed back untouched; the platform's own `ok` field is
//! not inspected here.

use crate::errors::ChatError;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

pub const POST_MESSAGE: &str = "chat.postMessage";
pub const UPDATE_MESSAGE: &str = "chat.update";
pub const DELETE_MESSAGE: &str = "chat.delete";
pub const OPEN_VIEW: &str = "views.open";
pub const UPLOAD_FILE: &str = "files.upload";

#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

/// A local file to share in a channel.
#[derive(Debug, Clone)]
pub struct Upload<'a> {
    pub channel: &'a str,
    pub file_name: &'a str,
    pub file_type: &'a str,
    pub path: &'a Path,
    /// Sent as `initial_comment` when non-empty.
    pub comment: &'a str,
}

impl ChatClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), api_base, token)
    }

    pub fn with_http(
        http: reqwest::Client,
        api_base: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    pub async fn post_json(&self, method: &str, body: &Value) -> Result<Bytes, ChatError> {
        debug!(method, "posting to chat api");
        let response = self
            .http
            .post(self.url(method))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Ok(response.bytes().await?)
    }

    pub async fn post_multipart(&self, method: &str, form: Form) -> Result<Bytes, ChatError> {
        debug!(method, "posting multipart to chat api");
        let response = self
            .http
            .post(self.url(method))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;
        Ok(response.bytes().await?)
    }

    pub async fn post_message(&self, body: &Value) -> Result<Bytes, ChatError> {
        self.post_json(POST_MESSAGE, body).await
    }

    pub async fn update_message(&self, body: &Value) -> Result<Bytes, ChatError> {
        self.post_json(UPDATE_MESSAGE, body).await
    }

    pub async fn delete_message(&self, body: &Value) -> Result<Bytes, ChatError> {
        self.post_json(DELETE_MESSAGE, body).await
    }

    pub async fn open_view(&self, body: &Value) -> Result<Bytes, ChatError> {
        self.post_json(OPEN_VIEW, body).await
    }

    pub async fn upload_file(&self, upload: &Upload<'_>) -> Result<Bytes, ChatError> {
        let content = tokio::fs::read(upload.path)
            .await
            .map_err(|source| ChatError::File {
                path: upload.path.to_path_buf(),
                source,
            })?;
        self.post_multipart(UPLOAD_FILE, self.upload_form(upload, content))
            .await
    }

    fn upload_form(&self, upload: &Upload<'_>, content: Vec<u8>) -> Form {
        let file = Part::bytes(content).file_name(upload.path.display().to_string());
        let form = Form::new()
            .text("token", self.token.clone())
            .text("channels", upload.channel.to_string())
            .text("filename", upload.file_name.to_string())
            .text("filetype", upload.file_type.to_string())
            .part("file", file);

        if upload.comment.is_empty() {
            form
        } else {
            form.text("initial_comment", upload.comment.to_string())
        }
    }
}
