use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::transport::HttpTransport;
use crate::{
    Authorizer, CallbackParams, ClientLogger, FlickrClient, FlickrError, FlickrProvider,
    FlickrSession, TracingLogger, flow,
};

use super::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub authorizer: Arc<dyn Authorizer>,
    pub transport: Arc<dyn HttpTransport>,
    pub logger: Arc<dyn ClientLogger>,
    pub api_key: String,
    pub rest_url: String,
    pub sessions: SessionStore,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        api_key: impl Into<String>,
        authorizer: Arc<dyn Authorizer>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            authorizer,
            transport,
            logger: Arc::new(TracingLogger),
            api_key: api_key.into(),
            rest_url: FlickrProvider::default_rest_url().to_string(),
            sessions: SessionStore::new(),
            secure_cookies: false,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_rest_url(mut self, rest_url: impl Into<String>) -> Self {
        self.rest_url = rest_url.into();
        self
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    pub fn album_client(&self) -> FlickrClient {
        FlickrClient::with_transport(
            self.api_key.clone(),
            self.transport.clone(),
            self.logger.clone(),
        )
        .with_rest_url(self.rest_url.clone())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CallbackQuery {
    next: Option<String>,
    oauth_token: Option<String>,
    oauth_verifier: Option<String>,
}

pub(super) async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, FlickrError> {
    let (jar, id, mut session) = state.sessions.load_or_create(jar, state.secure_cookies)?;
    let before = session.clone();
    let location = flow::login(state.authorizer.as_ref(), &mut session).await?;
    if !state.sessions.save_if_unchanged(&id, &before, session) {
        tracing::warn!("session changed while requesting a token; pending token dropped");
    }
    Ok((jar, found(&location)))
}

pub(super) async fn logout(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    jar: CookieJar,
) -> impl IntoResponse {
    let location = match state.sessions.current(&jar) {
        Some((id, mut session)) => {
            let location = flow::logout(&mut session, query.next.as_deref());
            if session == FlickrSession::default() {
                state.sessions.remove(&id);
            } else {
                state.sessions.save(&id, session);
            }
            location
        }
        None => flow::redirect_target(query.next.as_deref()),
    };
    found(&location)
}

/// Without a stored session there is no pending request token, so the
/// callback cannot succeed and no session is created for it.
pub(super) async fn oauth_authorized(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> impl IntoResponse {
    let params = CallbackParams {
        oauth_token: query.oauth_token,
        oauth_verifier: query.oauth_verifier,
    };
    let next = query.next.as_deref();

    let Some((id, mut session)) = state.sessions.current(&jar) else {
        let mut session = FlickrSession::default();
        let location =
            flow::oauth_callback(state.authorizer.as_ref(), &mut session, &params, next).await;
        return found(&location);
    };

    let before = session.clone();
    let location =
        flow::oauth_callback(state.authorizer.as_ref(), &mut session, &params, next).await;
    if !state.sessions.save_if_unchanged(&id, &before, session) {
        tracing::warn!("session changed during authorization; callback result dropped");
    }
    found(&location)
}

pub(super) async fn albums(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let session = state
        .sessions
        .current(&jar)
        .map(|(_, session)| session)
        .unwrap_or_default();
    let albums = state.album_client().get_user_albums(&session).await;
    Json(albums)
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

impl IntoResponse for FlickrError {
    fn into_response(self) -> Response {
        let status = match &self {
            FlickrError::Http(_)
            | FlickrError::HttpStatus { .. }
            | FlickrError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(error = %self, status = status.as_u16(), "flickr request failed");
        (status, self.to_string()).into_response()
    }
}
