//! Session-level login, callback and logout operations.
//!
//! These functions only touch the [`FlickrSession`] they are handed and return
//! the location the browser should be sent to next; the web layer turns that
//! into a redirect.

use async_trait::async_trait;

use crate::{AuthorizedResponse, CallbackParams, FlickrError, FlickrSession, RequestToken};

pub const LOGIN_PATH: &str = "/flickr/";
pub const LOGOUT_PATH: &str = "/flickr/revoke-access";
pub const CALLBACK_PATH: &str = "/flickr/oauth-authorized";
pub const ALBUMS_PATH: &str = "/flickr/albums";

pub const READ_PERMS: &str = "read";
pub const DEFAULT_NEXT: &str = "/";

/// A started authorization: where to send the user and the request token to
/// keep until the callback arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub authorization_url: String,
    pub request_token: RequestToken,
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, callback: &str, perms: &str) -> Result<Authorization, FlickrError>;

    /// Completes the handshake, or `None` when the user did not authorize.
    async fn authorized_response(
        &self,
        pending: Option<&RequestToken>,
        params: &CallbackParams,
    ) -> Option<AuthorizedResponse>;
}

/// Starts authorization with read-only permission and returns the provider
/// URL to redirect to.
pub async fn login<A>(authorizer: &A, session: &mut FlickrSession) -> Result<String, FlickrError>
where
    A: Authorizer + ?Sized,
{
    let authorization = authorizer.authorize(CALLBACK_PATH, READ_PERMS).await?;
    session.request_token = Some(authorization.request_token);
    Ok(authorization.authorization_url)
}

pub fn logout(session: &mut FlickrSession, next: Option<&str>) -> String {
    session.flickr_token = None;
    session.flickr_user = None;
    redirect_target(next)
}

/// Stores the token and user from a successful authorization. The session's
/// token and user are left alone when the user declined.
pub async fn oauth_callback<A>(
    authorizer: &A,
    session: &mut FlickrSession,
    params: &CallbackParams,
    next: Option<&str>,
) -> String
where
    A: Authorizer + ?Sized,
{
    let pending = session.request_token.take();
    match authorizer.authorized_response(pending.as_ref(), params).await {
        Some(response) => {
            let (token, user) = response.into_session_parts();
            tracing::info!(user_nsid = %user.user_nsid, "flickr authorization stored");
            session.flickr_token = Some(token);
            session.flickr_user = Some(user);
        }
        None => tracing::debug!("flickr authorization declined or incomplete"),
    }
    redirect_target(next)
}

pub fn redirect_target(next: Option<&str>) -> String {
    match next {
        Some(next) if !next.is_empty() => next.to_string(),
        _ => DEFAULT_NEXT.to_string(),
    }
}
