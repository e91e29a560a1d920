//! Thin wrapper around `reqwest` for talking to the REST backend.
//! Joins relative paths against a configured base URL, attaches the bearer
//! session token when one is present, decodes JSON bodies and maps non-2xx
//! statuses onto the unified error model.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Process-wide bearer token slot. Written at sign-in/session-restore,
/// cleared atomically at sign-out, read by every outgoing protected request.
pub type TokenSlot = Arc<RwLock<Option<String>>>;

pub fn new_token_slot() -> TokenSlot {
    Arc::new(RwLock::new(None))
}

#[derive(Clone)]
pub struct RestClient {
    base: Url,
    client: reqwest::Client,
    token: TokenSlot,
}

impl RestClient {
    pub fn new(base: &str, token: TokenSlot) -> AppResult<Self> {
        let base = Url::parse(base)
            .map_err(|e| AppError::internal("bad_base_url".into(), e.to_string()))?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(AppError::from)?;
        Ok(Self { base, client, token })
    }

    /// Join a relative path (optionally with a query string) against the base.
    pub fn url(&self, path: &str) -> AppResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::internal("bad_url".into(), format!("{}: {}", path, e)))
    }

    /// Underlying reqwest client, for requests that need special bodies
    /// (multipart image upload).
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.token.read().clone()
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> AppResult<T> {
        let url = self.url(path)?;
        debug!(target: "pawhaven", "{} {}", method, url);
        let mut req = self.client.request(method, url);
        if let Some(token) = self.token.read().as_deref() {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await.map_err(AppError::from)?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::from_status(status.as_u16(), text));
        }
        resp.json::<T>().await.map_err(AppError::from)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> AppResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| AppError::internal("encode_error".into(), e.to_string()))?;
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> AppResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| AppError::internal("encode_error".into(), e.to_string()))?;
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.request(Method::DELETE, path, None).await
    }
}
