use std::sync::Arc;

use cadenza_client::UpstreamApi;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Client for the upstream school API.
    pub upstream: UpstreamApi,
    /// Server configuration (accessed by extractors and handlers).
    pub config: Arc<ServerConfig>,
    /// Cancelled when the server starts shutting down.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// An upstream handle scoped to one request.
    ///
    /// Its calls are abandoned when the returned token or the server-wide
    /// shutdown token fires.
    pub fn request_upstream(&self) -> (UpstreamApi, CancellationToken) {
        let cancel = self.shutdown.child_token();
        (self.upstream.with_cancellation(cancel.clone()), cancel)
    }
}
