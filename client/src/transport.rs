//! Executes `HttpRequest` values over the network.
//!
//! The bearer token is read from `Credentials` right before each request, so
//! sign-in and sign-out take effect without rebuilding the transport.

use pastus_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};
use tracing::{debug, warn};

use crate::storage::Credentials;

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(credentials: Credentials) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Perform the round-trip. Non-2xx statuses are returned, not raised.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let token = self
            .credentials
            .token()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let request = match token {
            Some(token) => request.with_bearer(&token),
            None => request,
        };

        let mut builder = self.client.request(method(request.method), &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(method = request.method.as_str(), path = %request.path, error = %e, "request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(method = request.method.as_str(), path = %request.path, status, "response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
