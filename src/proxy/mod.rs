//! The server half of the game: it holds the OAuth client secret and the
//! leaderboard token so the game client never has to.

use std::net::SocketAddr;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::any,
    Router,
};
use reqwest::Url;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument};

mod error;
pub use error::ProxyError;

mod leaderboard;
pub use leaderboard::LeaderboardUpdate;

mod token;

use crate::sync::{GistStore, GithubClient};

pub const ROUTE: &str = "/api/token";
pub const LEADERBOARD_ROUTE: &str = "/api/update-leaderboard";
pub const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

#[derive(Debug, Clone)]
pub struct ProxyState {
    /// Anonymous; callers' tokens are checked against it.
    github: GithubClient,
    token_url: Url,
    client_secret: String,
    /// Writes with the server's own token.
    leaderboard: Option<GistStore>,
}

impl ProxyState {
    pub fn new(github: GithubClient, token_url: Url, client_secret: impl Into<String>) -> Self {
        Self {
            github,
            token_url,
            client_secret: client_secret.into(),
            leaderboard: None,
        }
    }

    pub fn with_leaderboard(mut self, gist_id: impl Into<String>, token: impl Into<String>) -> Self {
        let client = self.github.clone().with_token(token);
        self.leaderboard = Some(GistStore::new(client, Some(gist_id.into())));
        self
    }
}

pub fn router(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .route(ROUTE, any(token::exchange))
        .route(LEADERBOARD_ROUTE, any(leaderboard::update))
        .layer(cors)
        .with_state(state)
}

/// Serves the proxy until ctrl-c or SIGTERM.
#[instrument(skip(state))]
pub async fn serve(bind: SocketAddr, state: ProxyState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "proxy listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("proxy stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "couldn't listen for ctrl-c");
            std::future::pending::<()>().await;
        }

        info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(%err, "couldn't listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
