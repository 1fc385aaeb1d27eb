/// Endpoints of an OAuth 1.0a provider that also serves a REST API.
pub trait OAuthProvider: Send + Sync {
    fn id(&self) -> &str;
    fn request_token_url(&self) -> &str;
    fn authorize_url(&self) -> &str;
    fn access_token_url(&self) -> &str;
    fn rest_url(&self) -> &str;
}
