use std::time::Duration;

use rand::{Rng, distr::Alphanumeric};
use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

/// Length of session ids, login attempt ids and anti-forgery states.
///
/// 43 alphanumeric characters carry a little over 256 bits of entropy.
pub const TOKEN_LENGTH: usize = 43;

/// Total attempts for an outbound call that keeps answering 502.
pub const UPSTREAM_ATTEMPTS: u32 = 2;

const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Generates an unguessable alphanumeric token of `len` characters.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates a token of the default [`TOKEN_LENGTH`].
pub fn generate_id() -> String {
    random_token(TOKEN_LENGTH)
}

/// Folds an artist or title into the form used as a cache key.
///
/// Trims the ends, collapses inner whitespace runs and lowercases, so
/// `" Daft  Punk"` and `"daft punk"` refer to the same entry.
pub fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Escapes text for inclusion in HTML element content or attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Sends a request, retrying once after a short pause on 502 Bad Gateway.
///
/// The retry budget is deliberately small so that an upstream outage is not
/// amplified by the request path. Requests whose body cannot be cloned are
/// sent exactly once.
pub async fn send_with_retry(request: RequestBuilder) -> Result<Response, reqwest::Error> {
    let mut attempt = 1;

    loop {
        let Some(current) = request.try_clone() else {
            return request.send().await;
        };

        let response = current.send().await?;
        if response.status() == StatusCode::BAD_GATEWAY && attempt < UPSTREAM_ATTEMPTS {
            attempt += 1;
            sleep(RETRY_DELAY).await;
            continue; // retry
        }

        return Ok(response);
    }
}
