//! Single-token HTTP facade over [`aegis_cache::Cache`] and
//! [`aegis_budget::RateBudget`].
//!
//! Every call flows through cache, then a budget check, then the burst
//! gate, then the HTTP request itself, then header reconciliation and
//! error classification, then a cache write. Every outcome is logged to
//! the event log as a `RequestLogEntry`, win or lose.

mod error;
mod token;

pub use error::GatewayError;
pub use token::{bearer_token, TOKEN_ENV_VAR};

use std::time::Duration;

use aegis_budget::{BurstOutcome, RateBudget, UpstreamSnapshot};
use aegis_cache::Cache;
use aegis_eventlog::{Event, EventLog, Severity};
use chrono::Utc;
use reqwest::Method;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    CacheHit,
    CacheOnlyStale,
    CacheOnlyMiss,
    UpstreamSuccess,
    RateLimited,
    Upstream5xx,
}

#[derive(Serialize)]
struct RequestLogEntry<'a> {
    consumer: &'a str,
    category: &'a str,
    path: &'a str,
    outcome: &'static str,
}

impl RequestOutcome {
    fn as_str(self) -> &'static str {
        match self {
            RequestOutcome::CacheHit => "cache_hit",
            RequestOutcome::CacheOnlyStale => "cache_only_stale",
            RequestOutcome::CacheOnlyMiss => "cache_only_miss",
            RequestOutcome::UpstreamSuccess => "upstream_success",
            RequestOutcome::RateLimited => "rate_limited",
            RequestOutcome::Upstream5xx => "upstream_5xx",
        }
    }
}

pub struct Gateway {
    http: reqwest::Client,
    cache: Cache,
    budget: RateBudget,
    event_log: EventLog,
    base_url: String,
}

pub struct GatewayResponse {
    pub data: serde_json::Value,
    pub outcome: RequestOutcome,
}

impl Gateway {
    pub fn new(http: reqwest::Client, cache: Cache, budget: RateBudget, event_log: EventLog, base_url: impl Into<String>) -> Self {
        Self {
            http,
            cache,
            budget,
            event_log,
            base_url: base_url.into(),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        consumer: &str,
        category: &str,
        body: Option<&serde_json::Value>,
        force_refresh: bool,
    ) -> Result<GatewayResponse, GatewayError> {
        let body_str = body.map(|b| b.to_string());

        if !force_refresh {
            if let Some(data) = self.cache.get(category, path, body_str.as_deref()) {
                self.log(consumer, category, path, RequestOutcome::CacheHit);
                return Ok(GatewayResponse { data, outcome: RequestOutcome::CacheHit });
            }
        }

        let check = self.budget.check_budget(consumer, path)?;
        if !check.allowed {
            if check.cache_only {
                if let Some(data) = self.cache.get_stale(category, path, body_str.as_deref()) {
                    self.log(consumer, category, path, RequestOutcome::CacheOnlyStale);
                    return Ok(GatewayResponse { data, outcome: RequestOutcome::CacheOnlyStale });
                }
                tracing::warn!(consumer, category, path, "cache-only degraded mode and cache miss");
                self.log(consumer, category, path, RequestOutcome::CacheOnlyMiss);
            }
            let reason = check.reason.unwrap_or_else(|| "rate-limited".to_string());
            return Err(GatewayError::RateLimited { reason });
        }
        if check.cache_only {
            if let Some(data) = self.cache.get_stale(category, path, body_str.as_deref()) {
                self.log(consumer, category, path, RequestOutcome::CacheOnlyStale);
                return Ok(GatewayResponse { data, outcome: RequestOutcome::CacheOnlyStale });
            }
            tracing::warn!(consumer, category, path, "cache-only degraded mode and cache miss, falling through");
        }

        match self.budget.burst_gate()? {
            BurstOutcome::Ready => {}
            BurstOutcome::Wait(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            BurstOutcome::Deny(wait_ms) => {
                return Err(GatewayError::RateLimited {
                    reason: format!("burst wait of {wait_ms}ms exceeds the 5s cap"),
                })
            }
        }

        self.send_and_reconcile(method, path, consumer, category, body, body_str.as_deref()).await
    }

    async fn send_and_reconcile(
        &self,
        method: Method,
        path: &str,
        consumer: &str,
        category: &str,
        body: Option<&serde_json::Value>,
        body_str: Option<&str>,
    ) -> Result<GatewayResponse, GatewayError> {
        let token = token::bearer_token()?;
        let url = format!("{}{}", self.base_url, path);

        let mut req = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let snapshot = upstream_snapshot_from_headers(response.headers());

        if status.as_u16() == 429 {
            self.budget.record_error()?;
            if let Some(snapshot) = snapshot {
                self.budget.record_snapshot(snapshot)?;
            }
            self.log(consumer, category, path, RequestOutcome::RateLimited);
            return Err(GatewayError::RateLimited { reason: "upstream 429".to_string() });
        }

        if status.is_server_error() {
            self.budget.record_error()?;
            self.log(consumer, category, path, RequestOutcome::Upstream5xx);
            return Err(GatewayError::Upstream { status: status.as_u16() });
        }

        let data: serde_json::Value = response.json().await?;
        self.budget.record_request(consumer, path, snapshot)?;
        self.cache.set(category, path, data.clone(), body_str).ok();
        self.log(consumer, category, path, RequestOutcome::UpstreamSuccess);

        Ok(GatewayResponse { data, outcome: RequestOutcome::UpstreamSuccess })
    }

    fn log(&self, consumer: &str, category: &str, path: &str, outcome: RequestOutcome) {
        let severity = match outcome {
            RequestOutcome::RateLimited | RequestOutcome::Upstream5xx => Severity::Warn,
            _ => Severity::Info,
        };
        let entry = RequestLogEntry { consumer, category, path, outcome: outcome.as_str() };
        let event = Event::new("gateway-request", severity, format!("{consumer} {path} {}", outcome.as_str()))
            .with_field("entry", serde_json::to_value(&entry).unwrap_or_default());
        self.event_log.emit(&event);
    }
}

fn upstream_snapshot_from_headers(headers: &reqwest::header::HeaderMap) -> Option<UpstreamSnapshot> {
    let count = header_u64(headers, "x-ratelimit-count")?;
    let limit = header_u64(headers, "x-ratelimit-limit")?;
    let reset = header_u64(headers, "x-ratelimit-reset").map(|epoch| epoch as i64);
    Some(UpstreamSnapshot { count, limit, reset, observed_at: Some(Utc::now()) })
}

fn header_u64(headers: &reqwest::header::HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}
