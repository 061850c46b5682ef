pub mod builder;

use std::net::Ipv6Addr;

use url::Host;

use crate::error::FetchError;

/// Usual port of the recommendation server.
pub const DEFAULT_PORT: u16 = 10151;

/// Maximum number of items a recommendlet lists unless told otherwise.
pub const MAX_RECOMMEND: u32 = 10;

/// Which recommendlet path the request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    #[default]
    Plain,
    /// Asks the server for a JSON formatted snippet.
    Json,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Plain => "/recommendlet",
            Endpoint::Json => "/json/recommendlet",
        }
    }
}

/// Parameters of a single recommendlet request.
///
/// The external ids belong to the caller's own system, not to the
/// recommendation server.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendletParams {
    pub host: String,
    pub port: u16,
    pub reg_name: String,
    pub external_user_id: String,
    pub external_item_id: Option<String>,
    pub max_recommend: u32,
    pub rating: Option<f64>,
}

impl RecommendletParams {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        reg_name: impl Into<String>,
        external_user_id: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            reg_name: reg_name.into(),
            external_user_id: external_user_id.into(),
            external_item_id: None,
            max_recommend: MAX_RECOMMEND,
            rating: None,
        }
    }

    pub fn with_max_recommend(mut self, max_recommend: u32) -> Self {
        self.max_recommend = max_recommend;
        self
    }

    pub fn with_external_item_id(mut self, external_item_id: impl Into<String>) -> Self {
        self.external_item_id = Some(external_item_id.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Item id, only when it is set and non-empty.
    pub fn item_id(&self) -> Option<&str> {
        self.external_item_id
            .as_deref()
            .filter(|item_id| !item_id.is_empty())
    }

    /// Rating, only when it is set, non-zero and finite.
    pub fn effective_rating(&self) -> Option<f64> {
        self.rating
            .filter(|rating| *rating != 0.0 && rating.is_finite())
    }

    /// Host as it goes into the url authority. Bare IPv6 literals are
    /// accepted and come out bracketed.
    pub fn authority_host(&self) -> Result<Host<String>, url::ParseError> {
        match self.host.parse::<Ipv6Addr>() {
            Ok(addr) => Ok(Host::Ipv6(addr)),
            Err(_) => Host::parse(&self.host),
        }
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.host.is_empty() {
            return Err(FetchError::InvalidParams("empty host".to_string()));
        }
        if let Err(e) = self.authority_host() {
            return Err(FetchError::InvalidParams(format!(
                "host {:?}: {e}",
                self.host
            )));
        }
        if self.port == 0 {
            return Err(FetchError::InvalidParams("port 0".to_string()));
        }
        if self.reg_name.is_empty() {
            return Err(FetchError::InvalidParams("empty registration name".to_string()));
        }
        if self.external_user_id.is_empty() {
            return Err(FetchError::InvalidParams("empty external user id".to_string()));
        }
        Ok(())
    }
}
