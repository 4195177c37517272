//! HTTP transport for the inference backend.
//!
//! Uses browser `fetch()` via gloo-net. Every request races a
//! gloo-timers timeout; losing the race is a `ChatError::Timeout`.

use async_trait::async_trait;
use futures::future::{self, Either};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use log::debug;
use serde_json::Value;

use convo_core::ports::{BackendPort, HttpReply};
use convo_types::{config::ClientConfig, ChatError, Result};

use crate::timer::timer_millis;

pub struct HttpBackend {
    base_url: String,
    /// Zero disables the timeout
    timeout_ms: u64,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout_ms,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone(), config.request_timeout_ms)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn with_timeout<F>(&self, request: F) -> Result<Response>
    where
        F: std::future::Future<Output = std::result::Result<Response, gloo_net::Error>>,
    {
        if self.timeout_ms == 0 {
            return request.await.map_err(network_error);
        }

        let millis = timer_millis(self.timeout_ms);
        let request = Box::pin(request);
        let timer = Box::pin(TimeoutFuture::new(millis));

        match future::select(request, timer).await {
            Either::Left((response, _)) => response.map_err(network_error),
            Either::Right(_) => Err(ChatError::Timeout(self.timeout_ms)),
        }
    }
}

#[async_trait(?Send)]
impl BackendPort for HttpBackend {
    async fn post_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<HttpReply> {
        let url = self.url_for(path);
        debug!("POST {}", url);

        let request = Request::post(&url)
            .query(query.iter().copied())
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| ChatError::Serialization(e.to_string()))?;

        let response = self.with_timeout(request.send()).await?;
        into_reply(response).await
    }

    async fn get(&self, path: &str) -> Result<HttpReply> {
        let url = self.url_for(path);
        let response = self.with_timeout(Request::get(&url).send()).await?;
        into_reply(response).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

async fn into_reply(response: Response) -> Result<HttpReply> {
    let status = response.status();
    let status_text = response.status_text();
    let body = response.text().await.map_err(network_error)?;
    Ok(HttpReply {
        status,
        status_text,
        body,
    })
}

fn network_error(e: gloo_net::Error) -> ChatError {
    ChatError::Network(e.to_string())
}

/// Join a base URL and an absolute-or-relative path with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}
