use axum::{
    Extension,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{
    error::GatewayError,
    middleware::{Authenticated, end_session},
    state::AppState,
};
use crate::{
    info,
    spotify::ApiError,
    types::{Lyrics, NowPlaying, PlayerAction},
    utils::escape_html,
};

/// Now playing, with lyrics.
pub async fn index(
    State(state): State<AppState>,
    Extension(auth): Extension<Authenticated>,
) -> Result<Response, GatewayError> {
    let playing = match state.provider.currently_playing(&auth.token).await {
        Ok(playing) => playing,
        Err(ApiError::Unauthorized) => return Ok(end_session(&state, &auth).await),
        Err(e) => return Err(e.into()),
    };

    let Some(track) = playing else {
        return Ok(Html(render_page(None, None)).into_response());
    };

    let lyrics = state.lyrics.lookup(&track.artist, &track.title).await?;
    Ok(Html(render_page(Some(&track), Some(&lyrics))).into_response())
}

/// Forwards a player control and goes back to the page.
///
/// Mounted for `POST` only. The session cookie is `SameSite=Lax`, so a
/// cross-site form cannot carry it here.
pub async fn player(
    State(state): State<AppState>,
    Extension(auth): Extension<Authenticated>,
    Path(action): Path<String>,
) -> Result<Response, GatewayError> {
    let action: PlayerAction = action
        .parse()
        .map_err(|_| GatewayError::UnknownAction(action.clone()))?;

    match state.provider.control(&auth.token, action).await {
        Ok(()) => {
            info!("Player {} for session {:?}", action, auth.session_id);
            Ok(Redirect::to("/").into_response())
        }
        Err(ApiError::Unauthorized) => Ok(end_session(&state, &auth).await),
        Err(e) => Err(e.into()),
    }
}

fn render_page(track: Option<&NowPlaying>, lyrics: Option<&Lyrics>) -> String {
    let body = match (track, lyrics) {
        (Some(track), lyrics) => {
            let album = track
                .album
                .as_deref()
                .map(|album| format!("<p class=\"album\">{}</p>", escape_html(album)))
                .unwrap_or_default();
            let text = match lyrics {
                Some(Lyrics::Found(text)) => format!("<pre>{}</pre>", escape_html(text)),
                Some(Lyrics::Instrumental) => {
                    "<p class=\"instrumental\">Instrumental track.</p>".to_string()
                }
                _ => "<p class=\"missing\">No lyrics found for this track.</p>".to_string(),
            };
            format!(
                "<h1>{}</h1><h2>{}</h2>{}{}{}",
                escape_html(&track.title),
                escape_html(&track.artists.join(", ")),
                album,
                controls(track.is_playing),
                text
            )
        }
        (None, _) => format!("<p>Nothing is playing right now.</p>{}", controls(false)),
    };

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Lyricist</title></head>\
         <body>{body}<p><a href=\"/logout\">Log out</a></p></body></html>"
    )
}

fn controls(is_playing: bool) -> String {
    let toggle = if is_playing {
        button(PlayerAction::Pause, "Pause")
    } else {
        button(PlayerAction::Play, "Play")
    };
    format!(
        "<nav>{}{toggle}{}{}</nav>",
        button(PlayerAction::Previous, "Previous"),
        button(PlayerAction::Next, "Next"),
        button(PlayerAction::Shuffle, "Shuffle"),
    )
}

fn button(action: PlayerAction, label: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/player/{action}\" style=\"display:inline\">\
         <button type=\"submit\">{label}</button></form>"
    )
}
