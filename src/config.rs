//! Configuration management for the relay.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Everything the relay needs at runtime is collected
//! once into a [`Config`] at startup so handlers never read the environment.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (applied by the binary on top of [`Config`])
//! 2. Environment variables
//! 3. `.env` in the working directory, then `.env` in the local data directory
//! 4. Application defaults (where applicable; never for credentials)

use std::{
    env,
    fmt::{self, Display},
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::{Error, Res};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email user-top-read playlist-modify-public playlist-modify-private";
pub const DEFAULT_FRONTEND: &str = "http://localhost:4200";
pub const DEFAULT_PORT: u16 = 3000;

/// Loads environment variables from `.env` files.
///
/// When `explicit` is given only that file is read. Otherwise `.env` in the
/// working directory is read first and `tunerelay/.env` in the platform's
/// local data directory second:
/// - Linux: `~/.local/share/tunerelay/.env`
/// - macOS: `~/Library/Application Support/tunerelay/.env`
/// - Windows: `%LOCALAPPDATA%/tunerelay/.env`
///
/// Variables already present in the process environment are never
/// overwritten. Missing files are not an error; the relay can be configured
/// from the environment alone.
///
/// # Returns
///
/// The files that were actually loaded, so the caller can log them once
/// logging is up.
pub fn load_env(explicit: Option<&Path>) -> Vec<PathBuf> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => {
            let mut data_env = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            data_env.push("tunerelay/.env");
            vec![PathBuf::from(".env"), data_env]
        }
    };

    candidates
        .into_iter()
        .filter(|path| path.is_file() && dotenv::from_path(path).is_ok())
        .collect()
}

/// What `/callback` does after a successful code exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackMode {
    /// Set the `sessionId` cookie and redirect to the front end.
    Redirect,
    /// Set the bearer token itself as the `access_token` cookie.
    Token,
    /// Set the `sessionId` cookie and build the top-songs playlist right away.
    Playlist,
}

impl FromStr for CallbackMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" => Ok(CallbackMode::Redirect),
            "token" => Ok(CallbackMode::Token),
            "playlist" => Ok(CallbackMode::Playlist),
            other => Err(Error::invalid_config(
                "CALLBACK_MODE",
                format!("expected redirect, token or playlist, got {other:?}"),
            )),
        }
    }
}

/// Flags applied to every cookie the relay sets.
#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    pub secure: bool,
    pub domain: Option<String>,
}

/// Runtime configuration of the relay.
#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub frontend_origins: Vec<String>,
    pub frontend_redirect_url: String,
    pub callback_mode: CallbackMode,
    pub cookies: CookieSettings,
    pub validate_state: bool,
    pub session_ttl: Duration,
    pub session_max_entries: usize,
    pub session_sweep_interval: Duration,
    pub upstream_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_addr", &self.server_addr)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("frontend_origins", &self.frontend_origins)
            .field("frontend_redirect_url", &self.frontend_redirect_url)
            .field("callback_mode", &self.callback_mode)
            .field("cookies", &self.cookies)
            .field("validate_state", &self.validate_state)
            .field("session_ttl", &self.session_ttl)
            .field("session_max_entries", &self.session_max_entries)
            .field("session_sweep_interval", &self.session_sweep_interval)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] when one of
    /// `SPOTIFY_API_AUTH_CLIENT_ID`, `SPOTIFY_API_AUTH_CLIENT_SECRET` or
    /// `SPOTIFY_API_REDIRECT_URI` is unset or empty, and
    /// [`Error::InvalidConfig`] when a value cannot be parsed.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_addr = match get("SERVER_ADDRESS") {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .map_err(|e| Error::invalid_config("SERVER_ADDRESS", e.to_string()))?,
            None => {
                let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
                SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
            }
        };

        let frontend_origins: Vec<String> = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND.to_string())
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let callback_mode = match get("CALLBACK_MODE") {
            Some(mode) => mode.parse()?,
            None => CallbackMode::Redirect,
        };

        Ok(Config {
            server_addr,
            client_id: required(get("SPOTIFY_API_AUTH_CLIENT_ID"), "SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required(
                get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
                "SPOTIFY_API_AUTH_CLIENT_SECRET",
            )?,
            redirect_uri: required(get("SPOTIFY_API_REDIRECT_URI"), "SPOTIFY_API_REDIRECT_URI")?,
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            frontend_origins,
            frontend_redirect_url: get("FRONTEND_REDIRECT_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND.to_string()),
            callback_mode,
            cookies: CookieSettings {
                secure: parse_bool(get("COOKIE_SECURE"), "COOKIE_SECURE", false)?,
                domain: get("COOKIE_DOMAIN"),
            },
            validate_state: parse_bool(get("OAUTH_VALIDATE_STATE"), "OAUTH_VALIDATE_STATE", true)?,
            session_ttl: Duration::from_secs(parse_or(
                get("SESSION_TTL_SECS"),
                "SESSION_TTL_SECS",
                3600,
            )?),
            session_max_entries: parse_or(
                get("SESSION_MAX_ENTRIES"),
                "SESSION_MAX_ENTRIES",
                10_000usize,
            )?
            .max(1),
            session_sweep_interval: Duration::from_secs(
                parse_or(get("SESSION_SWEEP_SECS"), "SESSION_SWEEP_SECS", 60u64)?.max(1),
            ),
            upstream_timeout: Duration::from_secs(
                parse_or(get("UPSTREAM_TIMEOUT_SECS"), "UPSTREAM_TIMEOUT_SECS", 10u64)?.max(1),
            ),
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Res<String> {
    value.ok_or(Error::MissingConfig(name))
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Res<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| Error::invalid_config(name, e.to_string())),
        None => Ok(default),
    }
}

fn parse_bool(value: Option<String>, name: &'static str, default: bool) -> Res<bool> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(Error::invalid_config(
            name,
            format!("expected a boolean, got {other:?}"),
        )),
    }
}
