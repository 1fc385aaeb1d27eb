use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::signature::{self, Credentials};
use crate::transport::{HttpTransport, ReqwestTransport, with_query};
use crate::{
    Authorization, Authorizer, AuthorizedResponse, CallbackParams, FlickrError, OAuthProvider,
    RequestToken,
};

#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    /// Base that relative callback paths are resolved against.
    pub callback_base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl OAuthClientConfig {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            callback_base_url: None,
            timeout: None,
        }
    }

    pub fn with_callback_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.callback_base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Clone)]
pub struct OAuthClient<P: OAuthProvider> {
    provider: P,
    config: OAuthClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl<P: OAuthProvider> OAuthClient<P> {
    pub fn new(provider: P, config: OAuthClientConfig) -> Result<Self, FlickrError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self {
            provider,
            config,
            transport: Arc::new(transport),
        })
    }

    pub fn with_transport(
        provider: P,
        config: OAuthClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            provider,
            config,
            transport,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &OAuthClientConfig {
        &self.config
    }

    pub fn callback_url(&self, callback: &str) -> Result<String, FlickrError> {
        match &self.config.callback_base_url {
            Some(base) => Ok(Url::parse(base)?.join(callback)?.to_string()),
            None => Ok(callback.to_string()),
        }
    }

    pub async fn request_token(&self, callback: &str) -> Result<RequestToken, FlickrError> {
        let callback = self.callback_url(callback)?;
        let credentials = Credentials {
            consumer_key: &self.config.consumer_key,
            consumer_secret: &self.config.consumer_secret,
            token: None,
            token_secret: None,
        };
        let body = self
            .signed_get(
                self.provider.request_token_url(),
                &credentials,
                vec![("oauth_callback".to_string(), callback)],
            )
            .await?;
        RequestToken::from_form(&body)
    }

    pub fn authorization_url(
        &self,
        request_token: &RequestToken,
        perms: &str,
    ) -> Result<String, FlickrError> {
        let params = [
            ("oauth_token".to_string(), request_token.oauth_token.clone()),
            ("perms".to_string(), perms.to_string()),
        ];

        let url = with_query(self.provider.authorize_url(), &params)?;
        Ok(url.to_string())
    }

    pub async fn exchange_verifier(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<AuthorizedResponse, FlickrError> {
        let credentials = Credentials {
            consumer_key: &self.config.consumer_key,
            consumer_secret: &self.config.consumer_secret,
            token: Some(request_token.oauth_token.as_str()),
            token_secret: Some(request_token.oauth_token_secret.as_str()),
        };
        let body = self
            .signed_get(
                self.provider.access_token_url(),
                &credentials,
                vec![("oauth_verifier".to_string(), verifier.to_string())],
            )
            .await?;
        AuthorizedResponse::from_form(&body)
    }

    async fn signed_get(
        &self,
        url: &str,
        credentials: &Credentials<'_>,
        params: Vec<(String, String)>,
    ) -> Result<String, FlickrError> {
        let params = signature::signed_params("GET", url, credentials, params)?;
        let response = self.transport.get(url, &params).await?;

        if !response.is_success() {
            return Err(FlickrError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body)
    }
}

#[async_trait]
impl<P: OAuthProvider> Authorizer for OAuthClient<P> {
    async fn authorize(&self, callback: &str, perms: &str) -> Result<Authorization, FlickrError> {
        let request_token = self.request_token(callback).await?;
        let authorization_url = self.authorization_url(&request_token, perms)?;
        Ok(Authorization {
            authorization_url,
            request_token,
        })
    }

    async fn authorized_response(
        &self,
        pending: Option<&RequestToken>,
        params: &CallbackParams,
    ) -> Option<AuthorizedResponse> {
        let pending = pending?;
        let verifier = params.oauth_verifier.as_deref()?;

        if let Some(returned) = params.oauth_token.as_deref() {
            if returned != pending.oauth_token {
                tracing::warn!(
                    provider = self.provider.id(),
                    "callback token does not match pending request token"
                );
                return None;
            }
        }

        match self.exchange_verifier(pending, verifier).await {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.id(),
                    error = %err,
                    "access token exchange failed"
                );
                None
            }
        }
    }
}
