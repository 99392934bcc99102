use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use super::{
    cookies::{self, SESSION_COOKIE},
    error::GatewayError,
    state::AppState,
};
use crate::{
    crypto,
    management::{SessionError, SessionId},
    types::Token,
    warning,
};

/// Where unauthenticated browsers are sent.
pub const LOGIN_PATH: &str = "/authenticate";

/// The caller's session, attached to the request by [`require_session`].
#[derive(Clone)]
pub struct Authenticated {
    pub session_id: SessionId,
    pub token: Token,
}

/// Response marker set by handlers that ended the session themselves, so the
/// guard does not hand the dead id back to the browser.
#[derive(Clone, Copy)]
pub struct SessionEnded;

/// Guard for protected routes.
///
/// A missing, unknown, expired, corrupt or undecryptable session all end in
/// the same redirect to [`LOGIN_PATH`]. Only an unreachable store is an error.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(id) = jar.get(SESSION_COOKIE).map(|c| SessionId::from(c.value())) else {
        return to_login(&state, jar);
    };

    let session = match state.sessions.get(&id).await {
        Ok(session) => session,
        Err(SessionError::Store(e)) => return GatewayError::from(e).into_response(),
        Err(_) => return to_login(&state, jar),
    };

    let token: Token = match crypto::open(&state.key, &session.credential) {
        Ok(token) => token,
        Err(e) => {
            warning!("Dropping session {:?}: {}", id, e);
            return to_login(&state, jar);
        }
    };

    match state.sessions.touch(&id).await {
        Ok(()) => {}
        Err(SessionError::Store(e)) => return GatewayError::from(e).into_response(),
        Err(_) => return to_login(&state, jar),
    }

    request.extensions_mut().insert(Authenticated {
        session_id: id.clone(),
        token,
    });

    let response = next.run(request).await;
    if response.extensions().get::<SessionEnded>().is_some() {
        return response;
    }

    let cookie = cookies::session_cookie(&id, state.sessions.ttl(), state.secure_cookies);
    (jar.add(cookie), response).into_response()
}

/// Deletes the session and sends the browser back to login.
///
/// Used when the provider stops accepting the stored credential.
pub async fn end_session(state: &AppState, auth: &Authenticated) -> Response {
    match state.sessions.delete(&auth.session_id).await {
        Ok(()) | Err(SessionError::NotFound) => {}
        Err(e) => warning!("Cannot delete session {:?}: {}", auth.session_id, e),
    }

    let mut response = to_login(state, CookieJar::new());
    response.extensions_mut().insert(SessionEnded);
    response
}

fn to_login(state: &AppState, jar: CookieJar) -> Response {
    let cookie = cookies::clear_session_cookie(state.secure_cookies);
    (jar.add(cookie), Redirect::to(LOGIN_PATH)).into_response()
}
