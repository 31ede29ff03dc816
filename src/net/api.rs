//! HTTP transport for the transaction API.
//!
//! Client-side (hydrate): real requests via `gloo-net`.
//! Everywhere else callers inject their own [`Transport`], which is how the
//! submission flow is tested natively.
//!
//! ERROR HANDLING
//! ==============
//! A [`Transport`] only fails when no response arrived. Non-success statuses
//! come back as ordinary [`ApiResponse`]s; interpreting them is the
//! caller's job.

use async_trait::async_trait;

use super::types::{ApiRequest, ApiResponse};
use crate::config::UiConfig;
use crate::dom::Page;
use crate::error::TransportError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Sends one JSON POST and returns whatever the server answered.
///
/// No timeout or cancellation; the underlying transport's defaults apply.
#[async_trait(?Send)]
pub trait Transport {
    async fn post_json(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Anti-forgery header for state-changing requests.
///
/// Both meta tags must be present and non-empty, otherwise no header is
/// sent and the server decides.
pub fn csrf_header(page: &(impl Page + ?Sized), config: &UiConfig) -> Option<(String, String)> {
    let token = page.meta_content(&config.csrf_token_meta).filter(|t| !t.is_empty())?;
    let header = page.meta_content(&config.csrf_header_meta).filter(|h| !h.is_empty())?;
    Some((header, token))
}

/// [`Transport`] over the browser's `fetch`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn post_json(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder =
            gloo_net::http::Request::post(&request.path).header("Content-Type", JSON_CONTENT_TYPE);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let resp = builder
            .body(request.body)
            .map_err(|e| TransportError(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| TransportError(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
