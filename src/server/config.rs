use std::time::Duration;

use url::Url;

use crate::FlickrError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally visible origin, used to build the OAuth callback URL.
    pub public_url: String,
    pub api_key: String,
    pub secure_cookies: bool,
    pub timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn new(api_key: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            public_url: format!("http://{host}:{port}"),
            host,
            port,
            api_key: api_key.into(),
            secure_cookies: false,
            timeout: None,
        }
    }

    /// Derives the bind address from the public URL.
    pub fn from_public_url(
        api_key: impl Into<String>,
        public_url: &str,
    ) -> Result<Self, FlickrError> {
        let url = Url::parse(public_url)?;
        let host = url
            .host_str()
            .ok_or_else(|| FlickrError::InvalidConfig("public url is missing host".to_string()))?
            .to_string();
        let port = url.port_or_known_default().unwrap_or(DEFAULT_PORT);

        Ok(Self {
            host,
            port,
            public_url: public_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            secure_cookies: url.scheme() == "https",
            timeout: None,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_HOST, DEFAULT_PORT)
    }
}
