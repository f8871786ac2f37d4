//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent string
//! - GET requests returning the raw body bytes
//! - Error classification for diagnostics
//!
//! There is no retry and, for page fetches, no request timeout. The crawl
//! deadline is the only thing that cuts a slow request short.

use crate::config::UserAgentConfig;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered 200 OK
    Success {
        /// Page body content
        body: Vec<u8>,
    },

    /// The server answered with any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if a body was retrieved
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Consumes the result, returning the body or a short failure reason
    ///
    /// The reason names the status where one is available, e.g. `HTTP 404 Not Found`.
    pub fn into_body(self) -> Result<Vec<u8>, String> {
        match self {
            Self::Success { body } => Ok(body),
            Self::HttpError { status_code } => Err(describe_status(status_code)),
            Self::NetworkError { error } => Err(error),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_sweep::config::UserAgentConfig;
/// use sumi_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a plain GET
///
/// Only `200 OK` counts as success; every other status is an `HttpError`.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    send(url, client.get(url)).await
}

/// Fetches a URL with a plain GET bounded by a request timeout
pub async fn fetch_url_with_timeout(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    send(url, client.get(url).timeout(timeout)).await
}

async fn send(url: &str, request: RequestBuilder) -> FetchResult {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    if response.url().as_str() != url {
        tracing::debug!("{} redirected to {}", url, response.url());
    }

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            body: body.to_vec(),
        },
        Err(e) => FetchResult::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}

fn describe_status(status_code: u16) -> String {
    match StatusCode::from_u16(status_code)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("HTTP {} {}", status_code, reason),
        None => format!("HTTP {}", status_code),
    }
}
