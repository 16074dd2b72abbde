use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::AUTHORIZATION;
use url::Url;

use super::{SpotifyClient, send_json};
use crate::{Error, Res, types::Token};

impl SpotifyClient {
    /// Builds the URL the browser is sent to in order to grant access.
    ///
    /// The query carries `response_type=code`, the client id, the requested
    /// scopes, the registered redirect URI and the anti-forgery `state`.
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("scope", &self.scope)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state);
        url
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// Completes the authorization code flow with a single form-encoded POST to
    /// the token endpoint, authenticating the application with HTTP Basic
    /// credentials built from the client id and secret.
    ///
    /// # Errors
    ///
    /// - [`Error::Upstream`] for network failures and non-2xx answers, which
    ///   covers expired, reused or forged codes
    /// - [`Error::Payload`] when the answer carries no usable access token
    pub async fn exchange_code(&self, code: &str) -> Res<Token> {
        let request = self
            .http
            .post(self.token_url.clone())
            .header(
                AUTHORIZATION,
                basic_credentials(&self.client_id, &self.client_secret),
            )
            .form(&[
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ]);

        let token: Token = send_json(request).await?;
        if token.access_token.is_empty() {
            return Err(Error::Payload(
                "token response without access_token".to_string(),
            ));
        }

        Ok(token)
    }
}

/// `Authorization` header value for client authentication at the token endpoint.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}
