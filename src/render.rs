//! Rendering mode for the website's mobile and desktop component trees.
//!
//! Handlers receive the mode as an explicit extractor argument and return
//! it to the website, which picks its component tree from the response
//! instead of sniffing the user agent on its own.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::USER_AGENT, request::Parts, HeaderMap},
};
use serde::Serialize;
use std::convert::Infallible;

/// Client hint sent by Chromium browsers: `?1` on mobile devices
const CH_UA_MOBILE: &str = "sec-ch-ua-mobile";

const MOBILE_MARKERS: [&str; 6] = ["Mobi", "Android", "iPhone", "iPad", "iPod", "Opera Mini"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Mobile,
    #[default]
    Desktop,
}

impl RenderMode {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if MOBILE_MARKERS.iter().any(|m| user_agent.contains(m)) {
            RenderMode::Mobile
        } else {
            RenderMode::Desktop
        }
    }

    /// Client hints take precedence over the user agent string.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if let Some(hint) = headers.get(CH_UA_MOBILE).and_then(|v| v.to_str().ok()) {
            return if hint.trim() == "?1" {
                RenderMode::Mobile
            } else {
                RenderMode::Desktop
            };
        }
        headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_user_agent)
            .unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RenderMode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RenderMode::from_headers(&parts.headers))
    }
}
