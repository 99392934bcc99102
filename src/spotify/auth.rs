use chrono::Utc;
use reqwest::Client;

use super::ApiError;
use crate::{
    config::SpotifySettings,
    types::{Token, TokenResponse},
    utils,
};

/// Builds the authorization URL the browser is redirected to.
///
/// # Arguments
///
/// * `settings` - Client id, redirect URI, scope and the authorization endpoint
/// * `state` - One-time anti-forgery value; Spotify echoes it on the callback
///
/// # Example
///
/// ```
/// let url = authorize_url(&settings.spotify, &pending.state);
/// // https://accounts.spotify.com/authorize?client_id=..&response_type=code&..&state=..
/// ```
pub fn authorize_url(settings: &SpotifySettings, state: &str) -> String {
    let mut url = settings.auth_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &settings.redirect_uri)
        .append_pair("scope", &settings.scope)
        .append_pair("state", state);
    url.into()
}

/// Exchanges an authorization code for a credential.
///
/// Completes the authorization-code flow on the server side. The client
/// authenticates with its id and secret, so the resulting access token is
/// never exposed to the browser.
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `settings` - Client credentials and token endpoint
/// * `code` - Authorization code received on the callback
///
/// # Returns
///
/// - `Ok(Token)` - Access token with its metadata and the time it was obtained
/// - `Err(ApiError)` - The code was rejected or the accounts service failed
///
/// # Security Note
///
/// Authorization codes are single-use and short-lived, so the exchange has to
/// happen right after the callback arrives.
pub async fn exchange_code(
    http: &Client,
    settings: &SpotifySettings,
    code: &str,
) -> Result<Token, ApiError> {
    let request = http
        .post(settings.token_url.clone())
        .basic_auth(&settings.client_id, Some(&settings.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ]);

    let response = utils::send_with_retry(request).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }

    let body = response.json::<TokenResponse>().await?;
    Ok(Token {
        access_token: body.access_token,
        token_type: body.token_type,
        scope: body.scope,
        expires_in: body.expires_in,
        refresh_token: body.refresh_token,
        obtained_at: Utc::now().timestamp().max(0) as u64,
    })
}
