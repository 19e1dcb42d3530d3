//! Stateless HTTP request builder and response parser for the PastUs API.
//!
//! # Design
//! `PastusClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the round-trip (or answers it from a fixture), keeping
//! the core deterministic and free of I/O dependencies. Bearer credentials
//! are attached by the executor, not here.
//!
//! Endpoints are grouped per domain in submodules, each adding an `impl`
//! block to `PastusClient`.

mod archive;
mod auth;
mod notifications;
mod posts;
mod tokens;
mod users;

pub use archive::ARCHIVE_PAGE_SIZE;
pub use auth::{LOGIN_ID_TAKEN_MESSAGE, PHONE_TAKEN_MESSAGE};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::{Ack, Envelope, ErrorBody};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const OK: &[u16] = &[200];
const CREATED: &[u16] = &[200, 201];
const NO_CONTENT: &[u16] = &[204];

/// Synchronous, stateless client for the PastUs API.
#[derive(Debug, Clone)]
pub struct PastusClient {
    base_url: String,
}

impl PastusClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn url_with_query(&self, path: &str, pairs: &[(&str, String)]) -> String {
        if pairs.is_empty() {
            return self.url(path);
        }
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            query.append_pair(key, value);
        }
        format!("{}{path}?{}", self.base_url, query.finish())
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            path: url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: self.url(path),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-accepted status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    let message = error_message(&response.body);
    Err(match response.status {
        401 => ApiError::Unauthorized { message },
        404 => ApiError::NotFound { message },
        status => ApiError::Server { status, message },
    })
}

/// The `message` field of an error body, if the body is JSON and has one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse, accepted: &[u16]) -> Result<T, ApiError> {
    check_status(response, accepted)?;
    decode(&response.body)
}

fn parse_envelope<T: DeserializeOwned>(
    response: &HttpResponse,
    accepted: &[u16],
) -> Result<Envelope<T>, ApiError> {
    parse_json(response, accepted)
}

fn parse_ack(response: &HttpResponse, accepted: &[u16]) -> Result<Envelope<()>, ApiError> {
    parse_json::<Ack>(response, accepted).map(Envelope::from)
}
