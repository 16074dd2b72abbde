mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

#[tokio::test]
async fn proxy_endpoints_require_credentials() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(test_config(&upstream));

    for route in [
        "/api/user",
        "/api/top-tracks",
        "/api/top-artists",
        "/api/recommended",
        "/top-songs",
    ] {
        let response = app.get(route, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{route}");
        assert_eq!(response.body, json!({ "error": "Unauthorized" }), "{route}");
    }

    let unknown_session = app.get("/api/user", Some("sessionId=not-a-session")).await;
    assert_eq!(unknown_session.status, StatusCode::UNAUTHORIZED);

    assert_eq!(requests_received(&upstream).await, 0);
}

#[tokio::test]
async fn token_lookup_without_session_is_not_found() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(test_config(&upstream));

    let response = app.get("/get-access-token", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let stale = app.get("/get-access-token", Some("sessionId=expired")).await;
    assert_eq!(stale.status, StatusCode::NOT_FOUND);

    assert_eq!(requests_received(&upstream).await, 0);
}

#[tokio::test]
async fn token_lookup_returns_session_token() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(test_config(&upstream));
    let cookie = app.session_cookie(TOKEN).await;

    let response = app.get("/get-access-token", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "access_token": TOKEN }));
    assert_eq!(requests_received(&upstream).await, 0);
}

#[tokio::test]
async fn user_details_are_narrowed() {
    let upstream = MockServer::start().await;
    mount_profile(&upstream).await;
    let app = TestApp::new(test_config(&upstream));
    let cookie = app.session_cookie(TOKEN).await;

    let response = app.get("/api/user", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "display_name": "Listener One", "email": "listener@example.test" })
    );
    assert_eq!(requests_received(&upstream).await, 1);
}

#[tokio::test]
async fn raw_access_token_cookie_is_accepted() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer cookie-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u", "display_name": "Cookie User", "email": null
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    let app = TestApp::new(test_config(&upstream));

    let response = app
        .get("/api/user", Some("theme=dark; access_token=cookie-token"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["display_name"], "Cookie User");
}

#[tokio::test]
async fn upstream_failure_is_a_generic_server_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "The access token expired" }
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    let app = TestApp::new(test_config(&upstream));
    let cookie = app.session_cookie(TOKEN).await;

    let response = app.get("/api/user", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({ "error": "Error fetching user details" }));
}

#[tokio::test]
async fn top_tracks_are_relayed_verbatim() {
    let upstream = MockServer::start().await;
    let payload = page_json(vec![track_json("t1"), track_json("t2")]);
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .and(query_param("limit", "5"))
        .and(query_param("time_range", "short_term"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&upstream)
        .await;
    let app = TestApp::new(test_config(&upstream));
    let cookie = app.session_cookie(TOKEN).await;

    let response = app
        .get("/api/top-tracks?limit=5&time_range=short_term", Some(&cookie))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, payload);
}

#[tokio::test]
async fn top_artists_use_default_paging_and_clamp_limits() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/artists"))
        .and(query_param("limit", "20"))
        .and(query_param("time_range", "medium_term"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![artist_json("a1")])))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/artists"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
        .expect(1)
        .mount(&upstream)
        .await;
    let app = TestApp::new(test_config(&upstream));
    let cookie = app.session_cookie(TOKEN).await;

    let default = app.get("/api/top-artists", Some(&cookie)).await;
    assert_eq!(default.status, StatusCode::OK);
    assert_eq!(default.body["items"][0]["id"], "a1");

    let clamped = app.get("/api/top-artists?limit=500", Some(&cookie)).await;
    assert_eq!(clamped.status, StatusCode::OK);
}

#[tokio::test]
async fn top_artist_failure_is_reported() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me/top/artists"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;
    let app = TestApp::new(test_config(&upstream));
    let cookie = app.session_cookie(TOKEN).await;

    let response = app.get("/api/top-artists", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({ "error": "Error fetching top artists" }));
}

#[tokio::test]
async fn top_songs_are_reshaped() {
    let upstream = MockServer::start().await;
    mount_top_tracks(&upstream, &["t1", "t2"]).await;
    let app = TestApp::new(test_config(&upstream));
    let cookie = app.session_cookie(TOKEN).await;

    let response = app.get("/top-songs", Some(&cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "songs": [
                { "id": "t1", "name": "Track t1", "uri": "spotify:track:t1", "artists": ["Artist of t1"] },
                { "id": "t2", "name": "Track t2", "uri": "spotify:track:t2", "artists": ["Artist of t2"] }
            ]
        })
    );
    assert_eq!(requests_received(&upstream).await, 1);
}

#[tokio::test]
async fn health_reports_session_count() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(test_config(&upstream));
    app.session_cookie(TOKEN).await;

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["sessions"], 1);
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let upstream = MockServer::start().await;
    let app = TestApp::new(test_config(&upstream));

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("origin", FRONTEND)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        FRONTEND
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("origin", "http://evil.example.test")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
