use http::StatusCode;
use std::{
    sync::{Arc, Mutex, PoisonError},
    thread::{self, JoinHandle},
};
use tracing::{info, warn};

use crate::{
    dom::Container,
    error::FetchError,
    http::request::get,
    recommendlet::{builder::build_url, Endpoint, RecommendletParams},
};

/// Successful recommendlet response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub url: String,
    pub status: StatusCode,
    /// Raw snippet text, no parsing applied even for the JSON endpoint.
    pub body: String,
}

/// Handle on an in-flight request.
#[derive(Debug)]
pub struct Dispatch {
    url: String,
    handle: JoinHandle<()>,
}

impl Dispatch {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the handler has run.
    pub fn wait(self) -> Result<(), FetchError> {
        self.handle.join().map_err(|_| FetchError::WorkerPanicked)
    }
}

/// Fetches a recommendlet on the calling thread.
pub fn fetch(url: &str) -> Result<Recommendation, FetchError> {
    let resp = get(url)?.error_for_status()?;
    let body = resp.body_to_string()?.into_owned();
    Ok(Recommendation {
        url: url.to_string(),
        status: resp.status,
        body,
    })
}

/// Sends the request on a worker thread and returns right away.
///
/// `handler` runs exactly once, on the worker, when the transport is done or
/// has failed. Invalid parameters are reported here and the handler is never
/// called.
pub fn dispatch<H>(
    params: &RecommendletParams,
    endpoint: Endpoint,
    handler: H,
) -> Result<Dispatch, FetchError>
where
    H: FnOnce(Result<Recommendation, FetchError>) + Send + 'static,
{
    params.validate()?;
    let url = build_url(endpoint, params);
    info!(%url, "Dispatching recommendlet request");

    let worker_url = url.clone();
    let handle = thread::Builder::new()
        .name("recommendlet".to_string())
        .spawn(move || {
            let result = fetch(&worker_url);
            match &result {
                Ok(recommendation) => info!(
                    url = %worker_url,
                    status = %recommendation.status,
                    bytes = recommendation.body.len(),
                    "Recommendlet done"
                ),
                Err(e) => warn!(url = %worker_url, "Recommendlet failed: {e}"),
            }
            handler(result);
        })?;

    Ok(Dispatch { url, handle })
}

/// Renders the outcome into `container`: a loading placeholder first, then
/// the body, or the error message if the request failed. Errors returned
/// before the worker starts are written too, so the placeholder never stays.
pub fn dispatch_into<C>(
    params: &RecommendletParams,
    endpoint: Endpoint,
    container: Arc<Mutex<C>>,
) -> Result<Dispatch, FetchError>
where
    C: Container + Send + 'static,
{
    container
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .set_loading();

    let worker_container = Arc::clone(&container);
    dispatch(params, endpoint, move |result| {
        let mut container = worker_container
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(recommendation) => container.set_content(&recommendation.body),
            Err(e) => container.set_content(&e.to_string()),
        }
    })
    .map_err(|e| {
        container
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_content(&e.to_string());
        e
    })
}
