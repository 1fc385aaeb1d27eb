use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlickrError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("os rng error: {message}")]
    OsRng { message: String },

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid signing key")]
    InvalidSigningKey,

    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("invalid response: {message}")]
    InvalidResponse { message: String, body: String },

    #[error("session has no flickr user")]
    MissingUser,
}
