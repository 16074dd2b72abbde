#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header::SET_COOKIE},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use tunerelay::{
    config::{CallbackMode, Config, CookieSettings},
    server::{AppState, router},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const REDIRECT_URI: &str = "http://localhost:3000/callback";
pub const FRONTEND: &str = "http://localhost:4200";
pub const TOKEN: &str = "upstream-token";

pub fn test_config(upstream: &MockServer) -> Config {
    Config {
        server_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        scope: "user-read-private user-top-read playlist-modify-private".to_string(),
        auth_url: "https://accounts.example.test/authorize".to_string(),
        token_url: format!("{}/api/token", upstream.uri()),
        api_url: format!("{}/v1", upstream.uri()),
        frontend_origins: vec![FRONTEND.to_string()],
        frontend_redirect_url: FRONTEND.to_string(),
        callback_mode: CallbackMode::Redirect,
        cookies: CookieSettings::default(),
        validate_state: true,
        session_ttl: Duration::from_secs(3600),
        session_max_entries: 100,
        session_sweep_interval: Duration::from_secs(60),
        upstream_timeout: Duration::from_secs(5),
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new(config: Config) -> Self {
        let state = AppState::new(config).expect("app state");
        let router = router(state.clone());
        TestApp { state, router }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let request = builder.body(Body::empty()).expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Creates a session directly in the store and returns its cookie.
    pub async fn session_cookie(&self, token: &str) -> String {
        let session = self.state.sessions.create(token.to_string()).await;
        format!("sessionId={}", session.id)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get("location").and_then(|v| v.to_str().ok())
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// Value of the cookie `name` among the `Set-Cookie` headers.
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.set_cookies().into_iter().find_map(|cookie| {
            let pair = cookie.split(';').next()?.trim().to_string();
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}

pub fn track_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Track {id}"),
        "uri": format!("spotify:track:{id}"),
        "artists": [{ "id": format!("artist-of-{id}"), "name": format!("Artist of {id}") }],
        "popularity": 70
    })
}

pub fn artist_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Artist {id}"),
        "genres": ["indie"]
    })
}

pub fn page_json(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({ "items": items, "total": total, "next": null, "limit": 20, "offset": 0 })
}

pub async fn mount_top_tracks(server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(ids.iter().map(|id| track_json(id)).collect())),
        )
        .mount(server)
        .await;
}

pub async fn mount_top_artists(server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/v1/me/top/artists"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(ids.iter().map(|id| artist_json(id)).collect())),
        )
        .mount(server)
        .await;
}

pub async fn mount_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "listener-1",
            "display_name": "Listener One",
            "email": "listener@example.test",
            "country": "DE",
            "product": "premium"
        })))
        .mount(server)
        .await;
}

pub async fn requests_received(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
