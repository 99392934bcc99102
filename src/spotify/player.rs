use reqwest::{Client, Response, StatusCode, Url, header::CONTENT_LENGTH};

use super::ApiError;
use crate::{
    types::{CurrentlyPlayingResponse, NowPlaying, PlayerAction, PlayerStateResponse, Token},
    utils,
};

/// Fetches the track currently playing for the token's user.
///
/// Returns `Ok(None)` when nothing is playing (204) or the playing item is
/// not a track.
pub async fn currently_playing(
    http: &Client,
    url: Url,
    token: &Token,
) -> Result<Option<NowPlaying>, ApiError> {
    let request = http.get(url).bearer_auth(&token.access_token);
    let response = check(utils::send_with_retry(request).await?)?;

    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let body = response.json::<CurrentlyPlayingResponse>().await?;
    Ok(NowPlaying::from_response(body))
}

/// Forwards a player control.
///
/// `endpoint` maps a path below the Web API root to its URL. Play and pause
/// are `PUT`, next and previous are `POST`, and shuffle reads the player
/// state first through [`toggle_shuffle`].
pub async fn control(
    http: &Client,
    endpoint: impl Fn(&str) -> Url,
    token: &Token,
    action: PlayerAction,
) -> Result<(), ApiError> {
    let url = endpoint(&format!("me/player/{}", action.as_str()));
    let request = match action {
        PlayerAction::Play | PlayerAction::Pause => http.put(url),
        PlayerAction::Next | PlayerAction::Previous => http.post(url),
        PlayerAction::Shuffle => {
            return toggle_shuffle(http, endpoint("me/player"), url, token).await;
        }
    }
    .bearer_auth(&token.access_token)
    .header(CONTENT_LENGTH, 0);

    check(utils::send_with_retry(request).await?)?;
    Ok(())
}

/// Reads the shuffle state from `state_url` (`/me/player`) and sets the
/// opposite through `shuffle_url` (`/me/player/shuffle`).
///
/// A 204 from the state endpoint means no active device; shuffle is then
/// treated as off, so the toggle turns it on.
pub async fn toggle_shuffle(
    http: &Client,
    state_url: Url,
    shuffle_url: Url,
    token: &Token,
) -> Result<(), ApiError> {
    let request = http.get(state_url).bearer_auth(&token.access_token);
    let response = check(utils::send_with_retry(request).await?)?;

    let current = if response.status() == StatusCode::NO_CONTENT {
        false
    } else {
        response.json::<PlayerStateResponse>().await?.shuffle_state
    };

    let request = http
        .put(shuffle_url)
        .query(&[("state", (!current).to_string())])
        .bearer_auth(&token.access_token)
        .header(CONTENT_LENGTH, 0);

    check(utils::send_with_retry(request).await?)?;
    Ok(())
}

fn check(response: Response) -> Result<Response, ApiError> {
    match response.status() {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        status if status.is_success() => Ok(response),
        status => Err(ApiError::Status(status)),
    }
}
