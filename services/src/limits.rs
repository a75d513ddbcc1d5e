//! Client for the Salesforce REST `limits` resource.
//!
//! One authenticated GET per call, no internal retries. The poller decides
//! what to do with failures.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use db::models::rate_limit::NewRateLimit;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use util::config;

/// Errors from a single upstream fetch.
#[derive(Debug, thiserror::Error)]
pub enum LimitsError {
    /// Upstream answered with a non-2xx status.
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("'{0}' not found in the API response")]
    MissingField(String),
}

impl LimitsError {
    /// True for failures caused by the payload shape rather than the transport.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::MissingField(_))
    }
}

/// Counts for one limit plus the derived usage figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitUsage {
    pub maximum: i64,
    pub remaining: i64,
    pub in_use: i64,
    pub in_use_percent: f64,
}

impl LimitUsage {
    /// Derives `in_use` and `in_use_percent` from upstream counts.
    ///
    /// When nothing is in use the percentage is `(maximum + remaining) / maximum`,
    /// which reads 200% for an untouched limit. A zero maximum yields 0%.
    pub fn from_counts(maximum: i64, remaining: i64) -> Self {
        let in_use = maximum - remaining;
        let in_use_percent = if maximum == 0 {
            0.0
        } else if in_use > 0 {
            in_use as f64 / maximum as f64 * 100.0
        } else {
            (maximum + remaining) as f64 / maximum as f64 * 100.0
        };

        Self {
            maximum,
            remaining,
            in_use,
            in_use_percent,
        }
    }
}

/// A freshly fetched observation, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitSnapshot {
    pub timestamp: DateTime<Utc>,
    pub limit_name: String,
    #[serde(flatten)]
    pub usage: LimitUsage,
}

impl LimitSnapshot {
    pub fn to_new_row(&self) -> NewRateLimit {
        NewRateLimit {
            timestamp: self.timestamp,
            limit_name: self.limit_name.clone(),
            maximum: self.usage.maximum,
            remaining: self.usage.remaining,
            in_use: self.usage.in_use,
            in_use_percent: self.usage.in_use_percent,
        }
    }
}

/// Extracts `<limit_name>.Max` and `<limit_name>.Remaining` from a limits payload.
pub fn parse_limit(body: &str, limit_name: &str) -> Result<LimitUsage, LimitsError> {
    let payload: Value = serde_json::from_str(body)?;

    let limit = payload
        .get(limit_name)
        .filter(|v| v.is_object())
        .ok_or_else(|| LimitsError::MissingField(limit_name.to_string()))?;

    let field = |key: &str| {
        limit
            .get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| LimitsError::MissingField(format!("{limit_name}.{key}")))
    };

    Ok(LimitUsage::from_counts(field("Max")?, field("Remaining")?))
}

/// Anything that can produce a usage snapshot on demand.
#[async_trait]
pub trait LimitsSource: Send + Sync {
    async fn fetch(&self) -> Result<LimitSnapshot, LimitsError>;
}

/// reqwest-backed [`LimitsSource`] for a Salesforce org.
#[derive(Clone)]
pub struct LimitsClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    limit_name: String,
}

impl LimitsClient {
    pub fn new(
        instance_url: &str,
        api_version: &str,
        token: impl Into<String>,
        limit_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LimitsError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = format!(
            "{}/services/data/{}/limits",
            instance_url.trim_end_matches('/'),
            api_version
        );

        Ok(Self {
            http,
            endpoint,
            token: token.into(),
            limit_name: limit_name.into(),
        })
    }

    /// Builds a client from the global [`config`].
    pub fn from_config() -> Result<Self, LimitsError> {
        Self::new(
            &config::salesforce_instance_url(),
            &config::salesforce_api_version(),
            config::access_token(),
            config::limit_name(),
            Duration::from_secs(config::upstream_timeout_seconds()),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LimitsSource for LimitsClient {
    async fn fetch(&self) -> Result<LimitSnapshot, LimitsError> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(LimitsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let usage = parse_limit(&body, &self.limit_name)?;
        Ok(LimitSnapshot {
            timestamp: Utc::now(),
            limit_name: self.limit_name.clone(),
            usage,
        })
    }
}
