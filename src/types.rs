use serde::{Deserialize, Serialize};

use crate::FlickrError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlickrToken {
    pub oauth_token_secret: String,
    pub oauth_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlickrUser {
    pub username: String,
    pub user_nsid: String,
}

/// Temporary OAuth 1.0a credentials held between login and callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    pub oauth_token: String,
    pub oauth_token_secret: String,
}

impl RequestToken {
    pub fn from_form(body: &str) -> Result<Self, FlickrError> {
        let mut oauth_token = None;
        let mut oauth_token_secret = None;

        for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
            match key.as_ref() {
                "oauth_token" => oauth_token = Some(value.into_owned()),
                "oauth_token_secret" => oauth_token_secret = Some(value.into_owned()),
                _ => {}
            }
        }

        match (oauth_token, oauth_token_secret) {
            (Some(oauth_token), Some(oauth_token_secret)) => Ok(Self {
                oauth_token,
                oauth_token_secret,
            }),
            _ => Err(FlickrError::InvalidResponse {
                message: "request token reply is missing oauth_token or oauth_token_secret"
                    .to_string(),
                body: body.to_string(),
            }),
        }
    }
}

/// Per-request session state for one browser.
///
/// Handlers load this from the session store, pass it by reference into the
/// flow functions and the album client, then save it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlickrSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flickr_token: Option<FlickrToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flickr_user: Option<FlickrUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_token: Option<RequestToken>,
}

impl FlickrSession {
    pub fn signed_in(token: FlickrToken, user: FlickrUser) -> Self {
        Self {
            flickr_token: Some(token),
            flickr_user: Some(user),
            request_token: None,
        }
    }

    pub fn user_nsid(&self) -> Option<&str> {
        self.flickr_user.as_ref().map(|user| user.user_nsid.as_str())
    }
}

/// The provider's reply to a successful access-token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedResponse {
    pub oauth_token_secret: String,
    pub oauth_token: String,
    pub username: String,
    pub user_nsid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
}

impl AuthorizedResponse {
    pub fn from_form(body: &str) -> Result<Self, FlickrError> {
        let mut oauth_token_secret = None;
        let mut oauth_token = None;
        let mut username = None;
        let mut user_nsid = None;
        let mut fullname = None;

        for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
            match key.as_ref() {
                "oauth_token_secret" => oauth_token_secret = Some(value.into_owned()),
                "oauth_token" => oauth_token = Some(value.into_owned()),
                "username" => username = Some(value.into_owned()),
                "user_nsid" => user_nsid = Some(value.into_owned()),
                "fullname" => fullname = Some(value.into_owned()),
                _ => {}
            }
        }

        match (oauth_token_secret, oauth_token, username, user_nsid) {
            (Some(oauth_token_secret), Some(oauth_token), Some(username), Some(user_nsid)) => {
                Ok(Self {
                    oauth_token_secret,
                    oauth_token,
                    username,
                    user_nsid,
                    fullname,
                })
            }
            _ => Err(FlickrError::InvalidResponse {
                message: "access token reply is missing token or user fields".to_string(),
                body: body.to_string(),
            }),
        }
    }

    /// Splits the reply into the two values kept in the session.
    pub fn into_session_parts(self) -> (FlickrToken, FlickrUser) {
        (
            FlickrToken {
                oauth_token_secret: self.oauth_token_secret,
                oauth_token: self.oauth_token,
            },
            FlickrUser {
                username: self.username,
                user_nsid: self.user_nsid,
            },
        )
    }
}

/// Query parameters Flickr appends to the callback URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
}
