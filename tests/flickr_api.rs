use flickr_connect::{
    AlbumRecord, Authorizer, CallbackParams, FlickrClient, FlickrProvider, FlickrSession,
    FlickrToken, FlickrUser, OAuthClient, OAuthClientConfig, PhotoCount,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

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

fn album_client(server: &MockServer) -> FlickrClient {
    FlickrClient::new("key", None)
        .unwrap()
        .with_rest_url(format!("{}/services/rest/", server.uri()))
}

#[tokio::test]
async fn fetches_albums_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/rest/"))
        .and(query_param("method", "flickr.photosets.getList"))
        .and(query_param("api_key", "key"))
        .and(query_param("user_id", "user"))
        .and(query_param("format", "json"))
        .and(query_param("primary_photo_extras", "url_q"))
        .and(query_param("nojsoncallback", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stat": "ok",
            "photosets": {"photoset": [{
                "id": "72157649886540037",
                "photos": "3",
                "title": {"_content": "vacaciones"},
                "primary_photo_extras": {"url_q": "https://farm9.staticflickr.com/q.jpg"}
            }]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let albums = album_client(&server).get_user_albums(&session()).await;

    assert_eq!(
        albums,
        vec![AlbumRecord {
            photos: PhotoCount::Text("3".to_string()),
            thumbnail_url: "https://farm9.staticflickr.com/q.jpg".to_string(),
            id: "72157649886540037".to_string(),
            title: "vacaciones".to_string(),
        }]
    );
}

#[tokio::test]
async fn server_errors_yield_no_albums() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/rest/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let albums = album_client(&server).get_user_albums(&session()).await;

    assert!(albums.is_empty());
}

#[tokio::test]
async fn oauth_handshake_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/oauth/request_token"))
        .and(query_param(
            "oauth_callback",
            "http://localhost:5000/flickr/oauth-authorized",
        ))
        .and(query_param("oauth_consumer_key", "consumer-key"))
        .and(query_param("oauth_signature_method", "HMAC-SHA1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_callback_confirmed=true&oauth_token=req&oauth_token_secret=req-secret",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/oauth/access_token"))
        .and(query_param("oauth_token", "req"))
        .and(query_param("oauth_verifier", "verifier"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "fullname=paco%20palotes&oauth_token=token&oauth_token_secret=secret&user_nsid=user&username=palotespaco",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let provider = FlickrProvider::with_base_urls(
        &format!("{}/services/oauth", server.uri()),
        format!("{}/services/rest/", server.uri()),
    );
    let config = OAuthClientConfig::new("consumer-key", "consumer-secret")
        .with_callback_base_url("http://localhost:5000");
    let client = OAuthClient::new(provider, config).unwrap();

    let authorization = client
        .authorize("/flickr/oauth-authorized", "read")
        .await
        .unwrap();
    assert!(
        authorization
            .authorization_url
            .starts_with(&format!("{}/services/oauth/authorize?", server.uri()))
    );
    assert!(authorization.authorization_url.contains("perms=read"));

    let params = CallbackParams {
        oauth_token: Some("req".to_string()),
        oauth_verifier: Some("verifier".to_string()),
    };
    let response = client
        .authorized_response(Some(&authorization.request_token), &params)
        .await
        .unwrap();

    let (token, user) = response.into_session_parts();
    assert_eq!(token.oauth_token, "token");
    assert_eq!(token.oauth_token_secret, "secret");
    assert_eq!(user.username, "palotespaco");
    assert_eq!(user.user_nsid, "user");
}

#[tokio::test]
async fn rejected_verifier_is_not_an_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/oauth/access_token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("oauth_problem=token_rejected"))
        .mount(&server)
        .await;

    let provider = FlickrProvider::with_base_urls(
        &format!("{}/services/oauth", server.uri()),
        format!("{}/services/rest/", server.uri()),
    );
    let client = OAuthClient::new(
        provider,
        OAuthClientConfig::new("consumer-key", "consumer-secret"),
    )
    .unwrap();
    let pending = flickr_connect::RequestToken {
        oauth_token: "req".to_string(),
        oauth_token_secret: "req-secret".to_string(),
    };
    let params = CallbackParams {
        oauth_token: Some("req".to_string()),
        oauth_verifier: Some("verifier".to_string()),
    };

    assert!(client.authorized_response(Some(&pending), &params).await.is_none());
}
