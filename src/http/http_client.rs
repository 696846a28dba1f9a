// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::time::{Duration, Instant};

use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use url::Url;

use super::error::HttpError;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

const WIRE_TARGET: &str = "fabric_client::http::wire";

/// Transport settings fixed at construction.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub max_retries: u32,
    pub timeout: Duration,
    /// Log request and response bodies under the wire target.
    pub verbose: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verbose: false,
        }
    }
}

pub(crate) struct HttpClient {
    base_url: Url,
    /// Used for GET only; wraps the retry middleware.
    idempotent: reqwest_middleware::ClientWithMiddleware,
    /// POST and DELETE are never retried by this layer.
    single_shot: reqwest::Client,
    verbose: bool,
    last_latency: RwLock<Option<(Duration, Instant)>>,
}

impl HttpClient {
    pub fn new(base_url: Url, options: TransportOptions) -> Result<Self, HttpError> {
        let retry_policy =
            reqwest_retry::policies::ExponentialBackoff::builder().build_with_max_retries(options.max_retries);

        let inner_client = reqwest::Client::builder().timeout(options.timeout).build()?;

        let idempotent = reqwest_middleware::ClientBuilder::new(inner_client.clone())
            .with(reqwest_retry::RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            base_url,
            idempotent,
            single_shot: inner_client,
            verbose: options.verbose,
            last_latency: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn send_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, HttpError> {
        let start = Instant::now();
        let url = self.base_url.join(path)?;

        if self.verbose {
            let body_text = body.as_ref().map(|b| b.to_string()).unwrap_or_default();
            debug!(
                target: WIRE_TARGET,
                method = method.as_str(),
                url = url.as_str(),
                body = &*body_text;
                "--> request"
            );
        }

        let resp = match method {
            Method::GET => self.idempotent.get(url).send().await?,
            Method::POST => {
                let req = self.single_shot.post(url);
                let req = if let Some(body) = body {
                    req.body(serde_json::to_string(&body)?)
                        .header("Content-Type", "application/json")
                } else {
                    req
                };
                req.send().await?
            },
            Method::DELETE => self.single_shot.delete(url).send().await?,
            _ => return Err(HttpError::UnsupportedMethod),
        };

        let latency = start.elapsed();
        self.update_latency(latency).await;

        let status = resp.status();
        let text = resp.text().await?;

        if self.verbose {
            debug!(
                target: WIRE_TARGET,
                status = status.as_u16(),
                latency_ms = latency.as_millis() as u64,
                body = &*text;
                "<-- response"
            );
        }

        if !status.is_success() {
            return Err(HttpError::ServerError { status, body: text });
        }

        serde_json::from_str(&text).map_err(|source| HttpError::InvalidResponse { body: text, source })
    }

    async fn update_latency(&self, duration: Duration) {
        *self.last_latency.write().await = Some((duration, Instant::now()));
    }

    pub async fn get_latency(&self) -> Option<Duration> {
        self.last_latency.read().await.map(|(d, _)| d)
    }
}
