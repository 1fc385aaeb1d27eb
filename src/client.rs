use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::album::{AlbumRecord, PhotosetListResponse};
use crate::logger::{ClientLogger, TracingLogger};
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport};
use crate::{FlickrError, FlickrProvider, FlickrSession};

const PHOTOSETS_METHOD: &str = "flickr.photosets.getList";

/// Read-only client for the Flickr REST API.
///
/// Every public operation fails soft: errors are reported through the
/// configured [`ClientLogger`] and an empty result is returned.
#[derive(Clone)]
pub struct FlickrClient {
    api_key: String,
    rest_url: String,
    transport: Arc<dyn HttpTransport>,
    logger: Arc<dyn ClientLogger>,
}

impl FlickrClient {
    pub fn new(api_key: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FlickrError> {
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::with_transport(
            api_key,
            Arc::new(transport),
            Arc::new(TracingLogger),
        ))
    }

    pub fn with_transport(
        api_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        logger: Arc<dyn ClientLogger>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            rest_url: FlickrProvider::default_rest_url().to_string(),
            transport,
            logger,
        }
    }

    pub fn with_rest_url(mut self, rest_url: impl Into<String>) -> Self {
        self.rest_url = rest_url.into();
        self
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    /// Query parameters for `flickr.photosets.getList`. The request carries
    /// only the API key and the public nsid; it is not OAuth-signed.
    pub fn album_request_params(&self, user_nsid: &str) -> Vec<(String, String)> {
        vec![
            ("method".to_string(), PHOTOSETS_METHOD.to_string()),
            ("api_key".to_string(), self.api_key.clone()),
            ("user_id".to_string(), user_nsid.to_string()),
            ("format".to_string(), "json".to_string()),
            ("primary_photo_extras".to_string(), "url_q".to_string()),
            ("nojsoncallback".to_string(), "1".to_string()),
        ]
    }

    pub async fn get_user_albums(&self, session: &FlickrSession) -> Vec<AlbumRecord> {
        match self.try_get_user_albums(session).await {
            Ok(albums) => albums,
            Err(err) => {
                self.logger.error(&failure_message(&err));
                Vec::new()
            }
        }
    }

    async fn try_get_user_albums(
        &self,
        session: &FlickrSession,
    ) -> Result<Vec<AlbumRecord>, FlickrError> {
        let user_nsid = session.user_nsid().ok_or(FlickrError::MissingUser)?;
        let params = self.album_request_params(user_nsid);
        let response = self.transport.get(&self.rest_url, &params).await?;
        normalize_albums(&response)
    }
}

#[derive(Deserialize)]
struct Envelope {
    stat: Option<String>,
}

/// Turns a `flickr.photosets.getList` reply into album records. Anything
/// other than a 200 carrying `stat: "ok"` and the expected shape is an error.
///
/// `stat` is checked before the payload shape so a failed call is always
/// reported with its status.
pub fn normalize_albums(response: &HttpResponse) -> Result<Vec<AlbumRecord>, FlickrError> {
    let content = response.json();
    let bad_response = || FlickrError::HttpStatus {
        status: response.status,
        body: content.to_string(),
    };

    if response.status != 200 {
        return Err(bad_response());
    }

    let envelope: Envelope = serde_json::from_value(content.clone()).map_err(|_| bad_response())?;
    if envelope.stat.as_deref() != Some("ok") {
        return Err(bad_response());
    }

    let parsed: PhotosetListResponse =
        serde_json::from_value(content.clone()).map_err(|err| FlickrError::InvalidResponse {
            message: err.to_string(),
            body: content.to_string(),
        })?;

    parsed
        .into_albums()
        .ok_or_else(|| FlickrError::InvalidResponse {
            message: "missing photosets".to_string(),
            body: content.to_string(),
        })
}

fn failure_message(err: &FlickrError) -> String {
    match err {
        FlickrError::HttpStatus { status, body } => {
            format!("Bad response from Flickr:\nStatus: {status}, Content: {body}")
        }
        FlickrError::InvalidResponse { message, body } => {
            format!("Unexpected response from Flickr: {message}\nContent: {body}")
        }
        other => format!("Could not fetch albums from Flickr: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::album::PhotoCount;
    use crate::{FlickrToken, FlickrUser};

    struct FakeTransport {
        response: HttpResponse,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeTransport {
        fn new(status: u16, body: serde_json::Value) -> Arc<Self> {
            let body = match body {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };
            Arc::new(Self {
                response: HttpResponse::new(status, body),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn get(
            &self,
            url: &str,
            params: &[(String, String)],
        ) -> Result<HttpResponse, FlickrError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), params.to_vec()));
            Ok(self.response.clone())
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        errors: Mutex<Vec<String>>,
    }

    impl ClientLogger for RecordingLogger {
        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    fn session() -> FlickrSession {
        FlickrSession::signed_in(
            FlickrToken {
                oauth_token_secret: "secret".to_string(),
                oauth_token: "token".to_string(),
            },
            FlickrUser {
                username: "palotespaco".to_string(),
                user_nsid: "user".to_string(),
            },
        )
    }

    fn client(transport: Arc<FakeTransport>, logger: Arc<RecordingLogger>) -> FlickrClient {
        FlickrClient::with_transport("key", transport, logger)
    }

    #[tokio::test]
    async fn calls_flickr_rest_endpoint_with_fixed_payload() {
        let transport = FakeTransport::new(200, json!({"stat": "ok", "photosets": {"photoset": []}}));
        let logger = Arc::new(RecordingLogger::default());
        let flickr = client(transport.clone(), logger);

        flickr.get_user_albums(&session()).await;

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (url, params) = &calls[0];
        assert_eq!(url, "https://api.flickr.com/services/rest/");

        let mut params = params.clone();
        params.sort();
        let mut expected: Vec<(String, String)> = [
            ("method", "flickr.photosets.getList"),
            ("api_key", "key"),
            ("user_id", "user"),
            ("format", "json"),
            ("primary_photo_extras", "url_q"),
            ("nojsoncallback", "1"),
        ]
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();
        expected.sort();
        assert_eq!(params, expected);
    }

    #[tokio::test]
    async fn returns_empty_list_on_request_error() {
        let transport = FakeTransport::new(404, json!("not found"));
        let logger = Arc::new(RecordingLogger::default());
        let flickr = client(transport, logger.clone());

        let albums = flickr.get_user_albums(&session()).await;

        assert!(albums.is_empty());
        let errors = logger.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("404"));
    }

    #[tokio::test]
    async fn returns_empty_list_and_logs_on_request_fail() {
        let data = json!({"stat": "fail", "code": 1, "message": "User not found"});
        let transport = FakeTransport::new(200, data.clone());
        let logger = Arc::new(RecordingLogger::default());
        let flickr = client(transport, logger.clone());

        let albums = flickr.get_user_albums(&session()).await;

        assert!(albums.is_empty());
        let expected = format!("Bad response from Flickr:\nStatus: 200, Content: {data}");
        assert_eq!(*logger.errors.lock().unwrap(), vec![expected]);
    }

    #[tokio::test]
    async fn failed_stat_is_reported_with_status_whatever_the_payload() {
        for body in [
            json!({"stat": "fail", "photosets": "x"}),
            json!({"code": 1}),
            json!("<html>oops</html>"),
        ] {
            let transport = FakeTransport::new(200, body);
            let logger = Arc::new(RecordingLogger::default());
            let flickr = client(transport, logger.clone());

            let albums = flickr.get_user_albums(&session()).await;

            assert!(albums.is_empty());
            let errors = logger.errors.lock().unwrap();
            assert_eq!(errors.len(), 1);
            assert!(
                errors[0].starts_with("Bad response from Flickr:\nStatus: 200, Content: "),
                "{}",
                errors[0]
            );
        }
    }

    #[test]
    fn stat_fail_with_odd_photosets_maps_to_status_error() {
        let response = HttpResponse::new(200, r#"{"stat":"fail","photosets":"x"}"#);
        assert!(matches!(
            normalize_albums(&response),
            Err(FlickrError::HttpStatus { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn returns_album_info_for_each_photoset() {
        let data = json!({
            "stat": "ok",
            "photosets": {
                "total": 2,
                "perpage": 2,
                "photoset": [{
                    "date_update": "1421313791",
                    "visibility_can_see_set": 1,
                    "description": {"_content": "mis mejores vacaciones"},
                    "videos": 0,
                    "title": {"_content": "vacaciones"},
                    "farm": 9,
                    "needs_interstitial": 0,
                    "primary": "16284868505",
                    "primary_photo_extras": {
                        "height_t": "63",
                        "width_t": "100",
                        "url_q": "https://farm9.staticflickr.com/8597/16284868505_c4a032a62e_t.jpg"
                    },
                    "server": "8597",
                    "date_create": "1421313790",
                    "photos": "3",
                    "secret": "c4a032a62e",
                    "count_comments": "0",
                    "count_views": "1",
                    "can_comment": 0,
                    "id": "72157649886540037"
                }],
                "page": 1,
                "pages": 1
            }
        });
        let transport = FakeTransport::new(200, data);
        let logger = Arc::new(RecordingLogger::default());
        let flickr = client(transport, logger.clone());

        let albums = flickr.get_user_albums(&session()).await;

        assert_eq!(
            albums,
            vec![AlbumRecord {
                photos: PhotoCount::Text("3".to_string()),
                thumbnail_url: "https://farm9.staticflickr.com/8597/16284868505_c4a032a62e_t.jpg"
                    .to_string(),
                id: "72157649886540037".to_string(),
                title: "vacaciones".to_string(),
            }]
        );
        assert!(logger.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_photoset_yields_no_partial_result() {
        let data = json!({
            "stat": "ok",
            "photosets": {"photoset": [
                {"id": "1", "photos": "2", "title": {"_content": "fine"}, "primary_photo_extras": {"url_q": "https://example.com/q.jpg"}},
                {"id": "2", "photos": "5", "title": {"_content": "no thumbnail"}}
            ]}
        });
        let transport = FakeTransport::new(200, data);
        let logger = Arc::new(RecordingLogger::default());
        let flickr = client(transport, logger.clone());

        let albums = flickr.get_user_albums(&session()).await;

        assert!(albums.is_empty());
        let errors = logger.errors.lock().unwrap();
        assert!(errors[0].starts_with("Unexpected response from Flickr"));
    }

    #[tokio::test]
    async fn session_without_user_sends_nothing() {
        let transport = FakeTransport::new(200, json!({"stat": "ok"}));
        let logger = Arc::new(RecordingLogger::default());
        let flickr = client(transport.clone(), logger.clone());

        let albums = flickr.get_user_albums(&FlickrSession::default()).await;

        assert!(albums.is_empty());
        assert!(transport.calls.lock().unwrap().is_empty());
        assert_eq!(logger.errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn request_params_ignore_other_session_contents() {
        let flickr = FlickrClient::with_transport(
            "key",
            FakeTransport::new(200, json!({})),
            Arc::new(RecordingLogger::default()),
        );
        let params = flickr.album_request_params("user");
        assert!(!params.iter().any(|(key, _)| key.starts_with("oauth")));
        assert_eq!(params.len(), 6);
    }
}
