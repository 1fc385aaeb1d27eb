use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use moka::sync::Cache;

use crate::signature::generate_nonce;
use crate::{FlickrError, FlickrSession};

pub const SESSION_COOKIE: &str = "flickr_session";

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);
const DEFAULT_MAX_SESSIONS: u64 = 100_000;

/// In-memory sessions keyed by the opaque id stored in the session cookie.
///
/// Sessions expire after sitting idle and the store is capped in size, so
/// abandoned logins do not accumulate.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, FlickrSession>,
    // Serializes writers so `save_if_unchanged` can compare and store as one step.
    writes: Arc<Mutex<()>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_SESSIONS, DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_sessions: u64, idle_timeout: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle_timeout)
            .build();
        Self {
            sessions,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Stores `session` under a fresh id and returns the id.
    pub fn insert(&self, session: FlickrSession) -> Result<String, FlickrError> {
        let id = generate_nonce()?;
        self.save(&id, session);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<FlickrSession> {
        self.sessions.get(id)
    }

    pub fn save(&self, id: &str, session: FlickrSession) {
        if let Ok(_writes) = self.writes.lock() {
            self.sessions.insert(id.to_string(), session);
        }
    }

    /// Stores `session` only if the stored copy still equals `before`.
    ///
    /// Handlers that await between loading and saving use this so a logout
    /// that landed in the meantime is not overwritten. Returns whether the
    /// session was stored.
    pub fn save_if_unchanged(
        &self,
        id: &str,
        before: &FlickrSession,
        session: FlickrSession,
    ) -> bool {
        let Ok(_writes) = self.writes.lock() else {
            return false;
        };
        if self.sessions.get(id).as_ref() != Some(before) {
            return false;
        }
        self.sessions.insert(id.to_string(), session);
        true
    }

    pub fn remove(&self, id: &str) {
        if let Ok(_writes) = self.writes.lock() {
            self.sessions.invalidate(id);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.run_pending_tasks();
        usize::try_from(self.sessions.entry_count()).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The session named by the request cookie, if it exists.
    pub(crate) fn current(&self, jar: &CookieJar) -> Option<(String, FlickrSession)> {
        let id = jar.get(SESSION_COOKIE)?.value().to_string();
        let session = self.get(&id)?;
        Some((id, session))
    }

    /// The request's session, creating one (and its cookie) when the request
    /// has none.
    pub(crate) fn load_or_create(
        &self,
        jar: CookieJar,
        secure: bool,
    ) -> Result<(CookieJar, String, FlickrSession), FlickrError> {
        if let Some((id, session)) = self.current(&jar) {
            return Ok((jar, id, session));
        }

        let id = self.insert(FlickrSession::default())?;
        let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
            .path("/")
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax);
        Ok((jar.add(cookie), id, FlickrSession::default()))
    }
}
