//! HTTP side of the remote adapter.
//!
//! Each operation is one request against the configured base URL. There is no
//! retry and no backoff: a transport failure or a non-2xx status is logged at
//! `error` and handed back as a [`RemoteError`]. Response bodies are parsed as
//! JSON when they look like JSON; an empty body becomes `null` and anything
//! else is returned as a JSON string.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::chat::{ChatChannel, ChatMessage};
use crate::config::RemoteConfig;
use crate::error::RemoteError;

/// Client for the upload, key/value, image-save and chat endpoints.
pub struct RemoteClient {
    config: RemoteConfig,
    http: reqwest::Client,
    chat: ChatChannel,
}

impl RemoteClient {
    /// # Errors
    ///
    /// Returns [`RemoteError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| RemoteError::HttpClientBuild(e.to_string()))?;
        let chat = ChatChannel::new(config.ws_base());
        Ok(Self { config, http, chat })
    }

    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    // =========================================================================
    // HTTP
    // =========================================================================

    /// `POST /upload` with the bytes as multipart field `file`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] or [`RemoteError::Status`].
    pub async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<Value, RemoteError> {
        let size = bytes.len();
        let part = Part::bytes(bytes).file_name(file_name.to_owned());
        let form = Form::new().part("file", part);
        let request = self.http.post(self.config.url("/upload")).multipart(form);
        let value = send("upload", request).await?;
        debug!(file_name, size, "file uploaded");
        Ok(value)
    }

    /// Read `path` and upload it under its file name.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Io`] if the file cannot be read, otherwise as
    /// [`RemoteClient::upload_file`].
    pub async fn upload_path(&self, path: &Path) -> Result<Value, RemoteError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
        self.upload_file(&file_name, bytes).await
    }

    /// `POST /save` with `{key, value}`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] or [`RemoteError::Status`].
    pub async fn save(&self, key: &str, value: &Value) -> Result<Value, RemoteError> {
        let request = self
            .http
            .post(self.config.url("/save"))
            .json(&json!({ "key": key, "value": value }));
        send("save", request).await
    }

    /// `GET /get?key=...`, returning the response JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] or [`RemoteError::Status`].
    pub async fn get(&self, key: &str) -> Result<Value, RemoteError> {
        let request = self.http.get(self.config.url("/get")).query(&[("key", key)]);
        send("get", request).await
    }

    /// `DELETE /delete` with `{key}`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] or [`RemoteError::Status`].
    pub async fn delete(&self, key: &str) -> Result<Value, RemoteError> {
        let request = self
            .http
            .delete(self.config.url("/delete"))
            .json(&json!({ "key": key }));
        send("delete", request).await
    }

    /// `POST {image: data_url}` to `endpoint`.
    ///
    /// An absolute `http(s)` endpoint is used as given; anything else is taken
    /// as a path under the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] or [`RemoteError::Status`].
    pub async fn save_image(&self, endpoint: &str, data_url: &str) -> Result<Value, RemoteError> {
        let url = self.endpoint_url(endpoint);
        let request = self.http.post(url).json(&json!({ "image": data_url }));
        send("save_image", request).await
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_owned();
        }
        self.config.url(&format!("/{}", endpoint.trim_start_matches('/')))
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Open the chat channel for `room_id`, closing any previous one.
    ///
    /// Incoming messages arrive on the returned receiver. If the connection
    /// fails the error is logged and the receiver yields nothing.
    pub async fn connect_chat(&mut self, room_id: &str) -> mpsc::Receiver<ChatMessage> {
        self.chat.connect(room_id).await
    }

    /// Send `text` on the open channel. Returns `false` when nothing was sent.
    pub async fn send_chat(&mut self, text: &str) -> bool {
        self.chat.send(text).await
    }

    /// Close the channel, if open.
    pub async fn close_chat(&mut self) {
        self.chat.close().await;
    }

    #[must_use]
    pub fn chat_connected(&self) -> bool {
        self.chat.is_connected()
    }
}

async fn send(operation: &'static str, request: reqwest::RequestBuilder) -> Result<Value, RemoteError> {
    let response = request.send().await.map_err(|e| {
        error!(operation, error = %e, "request failed");
        RemoteError::Http(e)
    })?;
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        error!(operation, error = %e, "reading response failed");
        RemoteError::Http(e)
    })?;

    if !status.is_success() {
        error!(operation, status = status.as_u16(), body = %body, "server returned error");
        return Err(RemoteError::Status { status: status.as_u16(), body });
    }
    debug!(operation, status = status.as_u16(), "request ok");
    Ok(parse_body(&body))
}

fn parse_body(body: &str) -> Value {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(body.to_owned()))
}
