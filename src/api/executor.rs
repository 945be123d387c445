//! Request execution: resolve a route against the configured base URL and
//! token, hand it to the transport, and return the raw JSON result.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use super::error::{ApiError, Result};
use super::routes::Route;
use super::transport::{Transport, TransportRequest};
use crate::config::Config;

/// Turns routes into transport calls.
#[derive(Debug, Clone)]
pub struct Executor<T> {
    transport: T,
    config: Arc<Config>,
}

impl<T: Transport> Executor<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the transport request for a route.
    ///
    /// The URL is the base URL with the route's segments appended
    /// (percent-encoded), with `token=<api token>` appended to the query.
    pub fn request_for(&self, route: &dyn Route) -> Result<TransportRequest> {
        let mut url = self.config.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl("base URL cannot take path segments".to_string()))?
            .pop_if_empty()
            .extend(route.segments());
        url.query_pairs_mut()
            .append_pair("token", self.config.api_token());

        Ok(TransportRequest {
            method: route.method(),
            url,
            body: route.body().cloned().map(Value::Object),
        })
    }

    /// Execute a route and return the JSON payload.
    ///
    /// Transport failures are returned unchanged.
    #[instrument(skip(self, route), fields(path = %route.path()))]
    pub async fn execute(&self, route: &dyn Route) -> Result<Value> {
        let request = self.request_for(route)?;
        debug!(method = %request.method, has_body = request.body.is_some(), "Executing request");
        self.transport.send(request).await
    }
}
