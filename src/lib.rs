//! Client for the recommendation server's recommendlet endpoint: builds the
//! request url, runs the GET and hands the raw snippet to the caller.

pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod http;
pub mod recommendlet;

pub use crate::config::Config;
pub use crate::dispatch::{dispatch, dispatch_into, fetch, Dispatch, Recommendation};
pub use crate::dom::{Container, RenderMode, TextContainer, WriterContainer};
pub use crate::error::{ConfigError, FetchError};
pub use crate::http::ReadyState;
pub use crate::recommendlet::builder::{
    build_url, json_recommendlet_url, rating_urls, recommendlet_url,
};
pub use crate::recommendlet::{Endpoint, RecommendletParams};

/// Fetches a recommendlet and renders it, blocking the caller.
pub fn load(
    params: &RecommendletParams,
    endpoint: Endpoint,
    mode: RenderMode,
) -> Result<String, FetchError> {
    params.validate()?;
    let recommendation = fetch(&build_url(endpoint, params))?;
    let text = dom::show(&recommendation.body, mode).into_owned();
    Ok(text)
}
