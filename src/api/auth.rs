use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::{
    cookies::{self, ATTEMPT_COOKIE, SESSION_COOKIE},
    error::GatewayError,
    state::AppState,
};
use crate::{
    crypto,
    management::{SessionError, SessionId},
    success, warning,
};

/// Starts a login: records a pending attempt and sends the browser to the
/// provider.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), GatewayError> {
    let pending = state.states.begin().await?;
    let url = state.provider.authorize_url(&pending.state);

    let cookie = cookies::attempt_cookie(
        &pending.attempt_id,
        state.sessions.ttl(),
        state.secure_cookies,
    );
    Ok((jar.add(cookie), Redirect::temporary(&url)))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Completes a login started by [`authenticate`].
///
/// The attempt cookie is read before it is cleared, and it is cleared on every
/// outcome. No session exists unless the presented state matched.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    let attempt_id = jar.get(ATTEMPT_COOKIE).map(|c| c.value().to_string());
    let jar = jar.add(cookies::clear_attempt_cookie(state.secure_cookies));

    match complete_login(&state, attempt_id, params).await {
        Ok(id) => {
            let cookie = cookies::session_cookie(&id, state.sessions.ttl(), state.secure_cookies);
            (jar.add(cookie), Redirect::to("/")).into_response()
        }
        Err(e) => (jar, e).into_response(),
    }
}

async fn complete_login(
    state: &AppState,
    attempt_id: Option<String>,
    params: CallbackParams,
) -> Result<SessionId, GatewayError> {
    let attempt_id = attempt_id.ok_or(GatewayError::InvalidState)?;
    let presented = params.state.unwrap_or_default();
    state.states.complete(&attempt_id, &presented).await?;

    if let Some(reason) = params.error {
        return Err(GatewayError::LoginDenied(reason));
    }
    let code = params
        .code
        .ok_or_else(|| GatewayError::LoginDenied("no authorization code".to_string()))?;

    let token = state.provider.exchange_code(&code).await?;
    let credential = crypto::seal(&state.key, &token)?;
    let id = state.sessions.create(credential).await?;

    success!("Login completed, session {:?}", id);
    Ok(id)
}

/// Ends the caller's session, if any. Idempotent.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, &'static str), GatewayError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = SessionId::from(cookie.value());
        match state.sessions.delete(&id).await {
            Ok(()) => success!("Logged out session {:?}", id),
            Err(SessionError::NotFound) => warning!("Logout for unknown session {:?}", id),
            Err(e) => return Err(e.into()),
        }
    }

    Ok((jar.add(cookies::clear_session_cookie(state.secure_cookies)), "Successfully logged out"))
}
