//! Spotify Relay Library
//!
//! This library provides a small backend relay for the Spotify Web API. It
//! drives the OAuth 2.0 authorization code flow for browser sessions, keeps
//! the resulting bearer tokens in an in-memory session store and proxies a
//! handful of read/write calls on behalf of those sessions.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the browser-facing routes
//! - `config` - Configuration management and environment variables
//! - `error` - Library error type
//! - `management` - Session bookkeeping
//! - `pipeline` - The multi-step recommendation/playlist pipeline
//! - `server` - Router assembly and the listener loop
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Random identifiers and cookie helpers
//!
//! # Example
//!
//! ```
//! use tunerelay::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> tunerelay::Res<()> {
//!     config::load_env(None);
//!     let config = config::Config::from_env()?;
//!     server::serve(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible library operation returns the crate-wide [`Error`]. The
/// HTTP layer converts it into a response through [`api::ApiError`].
///
/// # Example
///
/// ```
/// use tunerelay::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;
