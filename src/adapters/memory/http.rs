//! A canned site served from memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::http::{FetchFuture, FetchRequest, FetchResponse, HttpError, HttpFetcher};

#[derive(Clone)]
enum Route {
    Respond(Result<FetchResponse, HttpError>),
    Stall,
}

#[derive(Default)]
struct Site {
    routes: HashMap<String, Route>,
    requests: Vec<FetchRequest>,
}

/// Serves fixed responses by exact URL and records every request.
///
/// Unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    site: Arc<Mutex<Site>>,
}

impl StaticFetcher {
    /// Creates an empty site where every URL is a 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn route(self, url: &str, route: Route) -> Self {
        self.site
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .routes
            .insert(url.to_string(), route);
        self
    }

    /// Serves `body` with status 200 at `url`.
    #[must_use]
    pub fn with_page(self, url: &str, body: &str) -> Self {
        let len = u64::try_from(body.len()).unwrap_or(u64::MAX);
        self.with_status(url, 200, body).with_length(url, len)
    }

    /// Serves `body` with the given status at `url`.
    #[must_use]
    pub fn with_status(self, url: &str, status: u16, body: &str) -> Self {
        let response = FetchResponse { status, content_length: None, body: body.to_string() };
        self.route(url, Route::Respond(Ok(response)))
    }

    /// Fails requests to `url` with `error`.
    #[must_use]
    pub fn with_error(self, url: &str, error: HttpError) -> Self {
        self.route(url, Route::Respond(Err(error)))
    }

    /// Never answers requests to `url`.
    #[must_use]
    pub fn with_stall(self, url: &str) -> Self {
        self.route(url, Route::Stall)
    }

    fn with_length(self, url: &str, len: u64) -> Self {
        if let Some(Route::Respond(Ok(response))) =
            self.site.lock().unwrap_or_else(PoisonError::into_inner).routes.get_mut(url)
        {
            response.content_length = Some(len);
        }
        self
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.site.lock().unwrap_or_else(PoisonError::into_inner).requests.clone()
    }

    /// Number of requests made for `url`.
    #[must_use]
    pub fn hits(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.url == url).count()
    }
}

impl HttpFetcher for StaticFetcher {
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let route = {
            let mut site = self.site.lock().unwrap_or_else(PoisonError::into_inner);
            site.requests.push(request.clone());
            site.routes.get(&request.url).cloned()
        };
        let request = request.clone();

        Box::pin(async move {
            match route {
                None => Ok(FetchResponse { status: 404, content_length: None, body: String::new() }),
                Some(Route::Stall) => std::future::pending().await,
                Some(Route::Respond(Err(err))) => Err(err),
                Some(Route::Respond(Ok(mut response))) => {
                    if let Some(limit) = request.max_body_bytes {
                        if u64::try_from(response.body.len()).unwrap_or(u64::MAX) > limit {
                            return Err(HttpError::TooLarge { limit });
                        }
                    }
                    if !request.read_body {
                        response.body.clear();
                    }
                    Ok(response)
                }
            }
        })
    }
}
