//! Local HTTP listener that receives the OAuth2 redirect.
//!
//! The listener answers every path with `200 OK` and body `OK`. Requests
//! carrying both `code` and `state` are forwarded through a channel that
//! holds a single pending response; anything else is ignored.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::OAuthFlow;
use crate::error::{DriveError, Result};

/// Upper bound on graceful listener shutdown.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// The `code`/`state` pair delivered to the redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    pub code: String,
    pub state: String,
}

/// A running callback listener bound to localhost.
pub struct CallbackListener {
    local_addr: SocketAddr,
    receiver: mpsc::Receiver<AuthorizationResponse>,
    shutdown: CancellationToken,
    handle: JoinHandle<std::io::Result<()>>,
}

async fn handle_callback(
    State(sender): State<mpsc::Sender<AuthorizationResponse>>,
    Query(params): Query<HashMap<String, String>>,
) -> &'static str {
    match (params.get("code"), params.get("state")) {
        (Some(code), Some(state)) if !code.is_empty() && !state.is_empty() => {
            let response = AuthorizationResponse {
                code: code.clone(),
                state: state.clone(),
            };
            if sender.try_send(response).is_err() {
                debug!("authorization response already pending, dropping callback");
            }
        }
        _ => debug!("ignoring callback without code and state"),
    }
    "OK"
}

impl CallbackListener {
    /// Bind `127.0.0.1:<port>` and start serving. Port 0 picks a free port.
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port)).await?;
        let local_addr = listener.local_addr()?;

        let (sender, receiver) = mpsc::channel(1);
        // The redirect URL may carry any path, so every request is the callback.
        let app = Router::new()
            .fallback(handle_callback)
            .with_state(sender);

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await
        });

        info!(%local_addr, "callback listener started");

        Ok(Self {
            local_addr,
            receiver,
            shutdown,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the next forwarded response until `deadline`.
    pub async fn next_response(&mut self, deadline: Instant) -> Option<AuthorizationResponse> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        timeout(remaining, self.receiver.recv()).await.ok().flatten()
    }

    /// Wait for a callback whose `state` verifies, returning its code.
    ///
    /// Callbacks with a foreign state are reported and skipped.
    pub async fn wait_for_code(
        &mut self,
        flow: &OAuthFlow,
        expected_state: &str,
        wait: Duration,
    ) -> Result<String> {
        let deadline = Instant::now() + wait;
        loop {
            let Some(response) = self.next_response(deadline).await else {
                return Err(DriveError::AuthTimeout(wait.as_secs()));
            };
            match flow.verify_state(expected_state, &response.state) {
                Ok(()) => return Ok(response.code),
                Err(_) => {
                    debug!("authorization callback with mismatched state");
                    println!("mismatch state. please retry");
                }
            }
        }
    }

    /// Stop accepting connections and wait, bounded, for the server to exit.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        let mut handle = self.handle;
        match timeout(SHUTDOWN_TIMEOUT, &mut handle).await {
            Ok(Ok(Ok(()))) => debug!("callback listener stopped"),
            Ok(Ok(Err(e))) => warn!(error = %e, "callback listener failed"),
            Ok(Err(e)) => warn!(error = %e, "callback listener task panicked"),
            Err(_) => {
                warn!("callback listener did not stop in time, aborting");
                handle.abort();
            }
        }
    }
}
