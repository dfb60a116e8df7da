//! Blocking HTTP client for the Jamendo-shaped catalog API.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::CatalogSettings;

use super::model::{Order, Track, TrackRecord};

const USER_AGENT: &str = concat!("aria/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no catalog client id configured (set catalog.client_id)")]
    MissingClientId,
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog returned HTTP {0}")]
    Status(u16),
    #[error("catalog error: {0}")]
    Api(String),
}

/// Parameters for one `/tracks/` fetch. `page` is 1-based.
#[derive(Debug, Clone)]
pub struct TrackQuery {
    pub search: Option<String>,
    /// Genre tag filter.
    pub tags: Option<String>,
    /// Mood filter, matched fuzzily by the API.
    pub fuzzytags: Option<String>,
    pub order: Order,
    pub page: usize,
    pub page_size: usize,
}

impl TrackQuery {
    pub fn new(order: Order, page: usize, page_size: usize) -> Self {
        Self {
            search: None,
            tags: None,
            fuzzytags: None,
            order,
            page,
            page_size,
        }
    }
}

/// Catalog API client. Cheap to clone; clones share the connection pool,
/// so fetch workers can take one each.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    base_url: String,
    client_id: String,
    audio_format: String,
}

impl CatalogClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client_id: settings.client_id.trim().to_string(),
            audio_format: settings.audio_format.clone(),
        })
    }

    pub fn has_client_id(&self) -> bool {
        !self.client_id.is_empty()
    }

    /// Fetch one page of tracks. An envelope with `status != "success"` is
    /// an API error even when the HTTP status was 200.
    pub fn fetch(&self, query: &TrackQuery) -> Result<Vec<Track>, ClientError> {
        if self.client_id.is_empty() {
            return Err(ClientError::MissingClientId);
        }

        let url = format!("{}/tracks/", self.base_url);
        let params = self.query_params(query);
        let resp = self.http.get(&url).query(&params).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let envelope: TrackEnvelope = resp.json()?;
        if envelope.headers.status != "success" {
            let message = if envelope.headers.error_message.trim().is_empty() {
                format!("status {:?}", envelope.headers.status)
            } else {
                envelope.headers.error_message
            };
            return Err(ClientError::Api(message));
        }

        Ok(envelope.results.into_iter().map(Track::from).collect())
    }

    pub(super) fn query_params(&self, query: &TrackQuery) -> Vec<(String, String)> {
        let page = query.page.max(1);
        let offset = (page - 1) * query.page_size;

        let mut params: Vec<(String, String)> = vec![
            ("client_id".into(), self.client_id.clone()),
            ("format".into(), "json".into()),
            ("limit".into(), query.page_size.to_string()),
            ("offset".into(), offset.to_string()),
            ("audioformat".into(), self.audio_format.clone()),
            ("include".into(), "musicinfo".into()),
        ];

        if let Some(s) = trimmed(&query.search) {
            params.push(("search".into(), s));
        }
        if let Some(t) = trimmed(&query.tags) {
            params.push(("tags".into(), t));
        }
        if let Some(m) = trimmed(&query.fuzzytags) {
            params.push(("fuzzytags".into(), m));
        }
        if let Some(order) = query.order.api_value() {
            params.push(("order".into(), order.into()));
        }

        params
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
pub(super) struct TrackEnvelope {
    pub(super) headers: EnvelopeHeaders,
    #[serde(default)]
    pub(super) results: Vec<TrackRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct EnvelopeHeaders {
    #[serde(default)]
    pub(super) status: String,
    #[serde(default)]
    pub(super) error_message: String,
}
