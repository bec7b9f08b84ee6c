//! End-to-end integration tests

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::config::ServerConfig;
use crate::http::create_router;
use crate::state::AppState;

/// Router plus the state behind it
pub fn test_app(config: ServerConfig) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Send one request through the router
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: Vec<u8>,
) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    if !content_type.is_empty() {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    app.clone()
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// Response body as bytes
pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Upload a subtitle and return the JSON reply
pub async fn upload(app: &Router, bytes: Vec<u8>, content_type: &str) -> serde_json::Value {
    let response = send(app, Method::POST, "/tracks", content_type, bytes).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use crate::decoder::Utf8Mode;
    use crate::integration::fixtures::SubtitleFixture;
    use crate::integration::validation::validate_webvtt;
    use crate::registry::ResourceRegistry;

    #[tokio::test]
    async fn test_track_lifecycle_all_fixtures() {
        let (app, state) = test_app(ServerConfig::default());

        for fixture in SubtitleFixture::all() {
            let reply = upload(&app, fixture.bytes.clone(), fixture.content_type).await;
            let id = reply["id"].as_str().unwrap().to_string();
            let url = reply["url"].as_str().unwrap();
            assert_eq!(url, format!("http://0.0.0.0:3000/tracks/{}", id));
            assert_eq!(reply["size"].as_u64(), Some(fixture.expected.len() as u64));

            let uri = format!("/tracks/{}", id);
            let response = send(&app, Method::GET, &uri, "", Vec::new()).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", fixture.name);
            assert_eq!(
                response.headers().get(header::CONTENT_TYPE).unwrap(),
                "text/vtt"
            );

            let document = String::from_utf8(body_bytes(response).await).unwrap();
            assert_eq!(document, fixture.expected, "{}", fixture.description);
            let result = validate_webvtt(&document);
            assert!(result.is_valid, "{}: {:?}", fixture.name, result.errors);

            let response = send(&app, Method::DELETE, &uri, "", Vec::new()).await;
            assert_eq!(response.status(), StatusCode::NO_CONTENT);

            let response = send(&app, Method::GET, &uri, "", Vec::new()).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);

            let response = send(&app, Method::DELETE, &uri, "", Vec::new()).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        assert_eq!(state.track_count(), 0);
        assert!(state.registry.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let (app, _) = test_app(ServerConfig::default());

        let uri = format!("/tracks/{}", uuid::Uuid::new_v4());
        let response = send(&app, Method::GET, &uri, "", Vec::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/tracks/not-a-uuid", "", Vec::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_latin1() {
        let mut config = ServerConfig::default();
        config.converter.utf8_mode = Utf8Mode::Strict;
        let (app, state) = test_app(config);

        let fixture = SubtitleFixture::latin1();
        let response =
            send(&app, Method::POST, "/tracks", fixture.content_type, fixture.bytes).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.track_count(), 0);
        assert!(state.registry.is_empty());
    }

    #[tokio::test]
    async fn test_track_limit() {
        let config = ServerConfig {
            limits: LimitsConfig {
                max_tracks: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let (app, _) = test_app(config);

        upload(&app, b"{i}one{/i}".to_vec(), "text/plain").await;
        let response = send(&app, Method::POST, "/tracks", "text/plain", b"two".to_vec()).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_strict_mode_accepts_declared_charset() {
        let mut config = ServerConfig::default();
        config.converter.utf8_mode = Utf8Mode::Strict;
        let (app, _) = test_app(config);

        let fixture = SubtitleFixture::windows1252();
        let reply = upload(&app, fixture.bytes, fixture.content_type).await;

        let uri = format!("/tracks/{}", reply["id"].as_str().unwrap());
        let response = send(&app, Method::GET, &uri, "", Vec::new()).await;
        let document = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(document, fixture.expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_track_limit_under_concurrent_uploads() {
        let config = ServerConfig {
            limits: LimitsConfig {
                max_tracks: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let (app, state) = test_app(config);

        let uploads: Vec<_> = (0..32)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    let body = format!("00:00:0{},000 {{i}}track {}{{/i}}", i % 10, i);
                    send(&app, Method::POST, "/tracks", "text/plain", body.into_bytes())
                        .await
                        .status()
                })
            })
            .collect();

        let mut created = 0;
        for upload in uploads {
            let status = upload.await.unwrap();
            if status == StatusCode::CREATED {
                created += 1;
            } else {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            }
        }

        assert_eq!(created, 1);
        assert_eq!(state.track_count(), 1);
        assert_eq!(state.registry.len(), 1);
        assert_eq!(state.reserved_slots(), 1);
    }

    #[tokio::test]
    async fn test_failed_upload_frees_slot() {
        let mut config = ServerConfig::default();
        config.converter.utf8_mode = Utf8Mode::Strict;
        config.limits.max_tracks = 1;
        let (app, state) = test_app(config);

        let fixture = SubtitleFixture::latin1();
        let response =
            send(&app, Method::POST, "/tracks", fixture.content_type, fixture.bytes).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.reserved_slots(), 0);

        let reply = upload(&app, b"{b}x{/b}".to_vec(), "text/plain").await;
        let uri = format!("/tracks/{}", reply["id"].as_str().unwrap());
        let response = send(&app, Method::DELETE, &uri, "", Vec::new()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.reserved_slots(), 0);

        upload(&app, b"{u}y{/u}".to_vec(), "text/plain").await;
    }

    #[tokio::test]
    async fn test_upload_limit() {
        let config = ServerConfig {
            limits: LimitsConfig {
                max_upload_mb: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let (app, state) = test_app(config);

        let oversized = vec![b'a'; 1024 * 1024 + 1];
        let response = send(&app, Method::POST, "/tracks", "text/plain", oversized).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(state.track_count(), 0);
    }

    #[tokio::test]
    async fn test_debug_tracks_listing() {
        let (app, _) = test_app(ServerConfig::default());

        let reply = upload(&app, b"00:00:01,000 {b}x{/b}".to_vec(), "text/plain").await;

        let response = send(&app, Method::GET, "/debug/tracks", "", Vec::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let listing: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();

        assert_eq!(listing["count"].as_u64(), Some(1));
        assert_eq!(listing["tracks"][0]["url"], reply["url"]);
        assert_eq!(listing["tracks"][0]["size"], reply["size"]);
    }

    #[tokio::test]
    async fn test_public_url_in_handles() {
        let config = ServerConfig {
            public_url: Some("https://subs.example.com/tracks".to_string()),
            ..Default::default()
        };
        let (app, _) = test_app(config);

        let reply = upload(&app, b"{u}x{/u}".to_vec(), "text/plain").await;
        assert!(reply["url"]
            .as_str()
            .unwrap()
            .starts_with("https://subs.example.com/tracks/"));
    }
}
