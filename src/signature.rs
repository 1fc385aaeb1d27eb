//! OAuth 1.0a request signing (HMAC-SHA1, RFC 5849 section 3.4).

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use hmac::{Hmac, Mac};
use rand::{TryRngCore, rngs::OsRng};
use sha1::Sha1;
use url::Url;

use crate::FlickrError;

type HmacSha1 = Hmac<Sha1>;

const NONCE_BYTES: usize = 32;
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Consumer credentials plus the token (if any) a request is signed with.
#[derive(Debug, Clone)]
pub struct Credentials<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub token: Option<&'a str>,
    pub token_secret: Option<&'a str>,
}

pub fn generate_nonce() -> Result<String, FlickrError> {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| FlickrError::OsRng {
            message: err.to_string(),
        })?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
        .to_string()
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Builds the full parameter list for a signed request: the caller's
/// parameters, the `oauth_*` protocol parameters and `oauth_signature`.
pub fn signed_params(
    method: &str,
    url: &str,
    credentials: &Credentials<'_>,
    params: Vec<(String, String)>,
) -> Result<Vec<(String, String)>, FlickrError> {
    let nonce = generate_nonce()?;
    signed_params_with(method, url, credentials, params, &nonce, &timestamp())
}

fn signed_params_with(
    method: &str,
    url: &str,
    credentials: &Credentials<'_>,
    mut params: Vec<(String, String)>,
    nonce: &str,
    timestamp: &str,
) -> Result<Vec<(String, String)>, FlickrError> {
    params.push((
        "oauth_consumer_key".to_string(),
        credentials.consumer_key.to_string(),
    ));
    params.push(("oauth_nonce".to_string(), nonce.to_string()));
    params.push((
        "oauth_signature_method".to_string(),
        SIGNATURE_METHOD.to_string(),
    ));
    params.push(("oauth_timestamp".to_string(), timestamp.to_string()));
    params.push(("oauth_version".to_string(), OAUTH_VERSION.to_string()));
    if let Some(token) = credentials.token {
        params.push(("oauth_token".to_string(), token.to_string()));
    }

    let signature = sign(
        method,
        url,
        &params,
        credentials.consumer_secret,
        credentials.token_secret,
    )?;
    params.push(("oauth_signature".to_string(), signature));
    Ok(params)
}

pub fn sign(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> Result<String, FlickrError> {
    let base = base_string(method, url, params)?;
    let key = format!(
        "{}&{}",
        encode(consumer_secret),
        encode(token_secret.unwrap_or_default())
    );

    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| FlickrError::InvalidSigningKey)?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

pub fn base_string(
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String, FlickrError> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (encode(key), encode(value)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(&base_url(url)?),
        encode(&normalized)
    ))
}

fn base_url(url: &str) -> Result<String, FlickrError> {
    let url = Url::parse(url)?;
    let host = url.host_str().unwrap_or_default();
    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    })
}
