use crate::OAuthProvider;

const OAUTH_BASE_URL: &str = "https://www.flickr.com/services/oauth";
const REST_URL: &str = "https://api.flickr.com/services/rest/";

#[derive(Debug, Clone)]
pub struct FlickrProvider {
    request_token_url: String,
    authorize_url: String,
    access_token_url: String,
    rest_url: String,
}

impl Default for FlickrProvider {
    fn default() -> Self {
        Self::with_base_urls(OAUTH_BASE_URL, REST_URL)
    }
}

impl OAuthProvider for FlickrProvider {
    fn id(&self) -> &str {
        "flickr"
    }

    fn request_token_url(&self) -> &str {
        &self.request_token_url
    }

    fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    fn access_token_url(&self) -> &str {
        &self.access_token_url
    }

    fn rest_url(&self) -> &str {
        &self.rest_url
    }
}

impl FlickrProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the provider at another host, e.g. a local mock of Flickr.
    pub fn with_base_urls(oauth_base_url: &str, rest_url: impl Into<String>) -> Self {
        let oauth_base_url = oauth_base_url.trim_end_matches('/');
        Self {
            request_token_url: format!("{oauth_base_url}/request_token"),
            authorize_url: format!("{oauth_base_url}/authorize"),
            access_token_url: format!("{oauth_base_url}/access_token"),
            rest_url: rest_url.into(),
        }
    }

    pub fn default_rest_url() -> &'static str {
        REST_URL
    }
}
