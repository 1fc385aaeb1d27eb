mod config;
mod http;
mod session;

use std::future::Future;
use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;

use crate::flow::{ALBUMS_PATH, CALLBACK_PATH, LOGIN_PATH, LOGOUT_PATH};
use crate::{
    FlickrError, FlickrProvider, OAuthClient, OAuthClientConfig, OAuthProvider, ReqwestTransport,
};

pub use config::ServerConfig;
pub use http::AppState;
pub use session::{SESSION_COOKIE, SessionStore};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(LOGIN_PATH, get(http::login))
        .route(LOGOUT_PATH, get(http::logout))
        .route(CALLBACK_PATH, get(http::oauth_authorized))
        .route(ALBUMS_PATH, get(http::albums))
        .with_state(state)
}

/// The Flickr routes bound to a TCP listener.
#[derive(Clone)]
pub struct FlickrServer {
    config: ServerConfig,
    state: AppState,
}

impl FlickrServer {
    /// Wires the production OAuth client and REST transport.
    pub fn new(config: ServerConfig, oauth: OAuthClientConfig) -> Result<Self, FlickrError> {
        Self::with_provider(config, oauth, FlickrProvider::new())
    }

    /// Like [`FlickrServer::new`], but both the OAuth handshake and album
    /// calls go to `provider`'s endpoints.
    pub fn with_provider(
        config: ServerConfig,
        oauth: OAuthClientConfig,
        provider: FlickrProvider,
    ) -> Result<Self, FlickrError> {
        let mut oauth = oauth.with_callback_base_url(config.public_url.clone());
        if let Some(timeout) = config.timeout {
            oauth = oauth.with_timeout(timeout);
        }
        let rest_url = provider.rest_url().to_string();
        let authorizer = OAuthClient::new(provider, oauth)?;
        let transport = ReqwestTransport::new(config.timeout)?;

        let state = AppState::new(
            config.api_key.clone(),
            Arc::new(authorizer),
            Arc::new(transport),
        )
        .with_rest_url(rest_url)
        .with_secure_cookies(config.secure_cookies);

        Ok(Self { config, state })
    }

    pub fn from_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    pub async fn bind(&self) -> Result<TcpListener, FlickrError> {
        TcpListener::bind(self.config.bind_addr())
            .await
            .map_err(FlickrError::from)
    }

    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), FlickrError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, public_url = %self.config.public_url, "serving flickr routes");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
