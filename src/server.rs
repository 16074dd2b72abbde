use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    Res, api,
    config::Config,
    management::{SessionStore, spawn_sweeper},
    spotify::SpotifyClient,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub spotify: SpotifyClient,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config) -> Res<Self> {
        let spotify = SpotifyClient::new(&config)?;
        let sessions = Arc::new(SessionStore::new(
            config.session_ttl,
            config.session_max_entries,
        ));
        Ok(AppState {
            config: Arc::new(config),
            spotify,
            sessions,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_origins);

    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/api/user", get(api::user))
        .route("/api/top-tracks", get(api::top_tracks))
        .route("/api/top-artists", get(api::top_artists))
        .route("/api/recommended", get(api::recommended))
        .route("/top-songs", get(api::top_songs))
        .route("/get-access-token", get(api::get_access_token))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured front-end origins, with credentials so
/// the browser sends the session cookie along.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_credentials(true)
}

/// Binds the listener and serves until Ctrl-C.
pub async fn serve(config: Config) -> Res<()> {
    let addr = config.server_addr;
    let sweep_every = config.session_sweep_interval;
    let state = AppState::new(config)?;

    let sweeper = spawn_sweeper(Arc::clone(&state.sessions), sweep_every);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
