//! Flickr sign-in over OAuth 1.0a and a read-only album client.
//!
//! The [`flow`] functions run the login/callback/logout handshake against a
//! per-request [`FlickrSession`]; [`FlickrClient`] reads that session and
//! lists the user's photosets as [`AlbumRecord`]s. With the `server` feature
//! the same operations are exposed as an axum router.

mod album;
mod client;
mod error;
pub mod flow;
mod logger;
mod oauth;
mod providers;
#[cfg(feature = "server")]
mod server;
pub mod signature;
mod transport;
mod types;

pub use album::{AlbumRecord, PhotoCount, PhotosetListResponse, RawPhotoset};
pub use client::{FlickrClient, normalize_albums};
pub use error::FlickrError;
pub use flow::{Authorization, Authorizer};
pub use logger::{ClientLogger, TracingLogger};
pub use oauth::{OAuthClient, OAuthClientConfig};
#[cfg(feature = "server")]
pub use server::{AppState, FlickrServer, SESSION_COOKIE, ServerConfig, SessionStore, router};
pub use providers::{FlickrProvider, OAuthProvider};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    AuthorizedResponse, CallbackParams, FlickrSession, FlickrToken, FlickrUser, RequestToken,
};
