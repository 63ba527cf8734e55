//! HTTP handlers for auth routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use newsdesk_core::auth::{new_session, validate_return_to, validate_username, SessionId};
use newsdesk_core::news::{NewUser, User};
use newsdesk_core::storage::RepositoryError;
use serde::Deserialize;

use crate::error::AuthError;
use crate::templates::login_page;
use crate::AuthState;

/// Where sign-in and sign-out land when no `next` target is given.
const DEFAULT_LANDING: &str = "/news";

const SUPERUSER_REFUSED: &str = "This account cannot sign in with a username";

/// Query parameters for the sign-in page.
#[derive(Deserialize, Default)]
pub struct LoginQuery {
    /// URL to redirect to after successful authentication.
    pub next: Option<String>,
}

/// Sign-in form submission.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Creates the auth router with all authentication routes.
///
/// Routes:
/// - `GET /accounts/login` - Sign-in form
/// - `POST /accounts/login` - Sign in by username, creating the account on first use
/// - `POST /accounts/logout` - End current session
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/accounts/login", get(login_form).post(login))
        .route("/accounts/logout", axum::routing::post(logout))
}

fn landing(next: Option<&str>) -> String {
    next.and_then(validate_return_to)
        .unwrap_or(DEFAULT_LANDING)
        .to_string()
}

async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    let next = query.next.as_deref().and_then(validate_return_to);
    Html(login_page(next, None))
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AuthError> {
    let next = form.next.as_deref().and_then(validate_return_to);

    let username = match validate_username(&form.username) {
        Ok(username) => username,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected sign-in");
            let page = login_page(next, Some(&err.to_string()));
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    let user = find_or_create_user(&state, &username).await?;

    // A username alone never grants superuser rights
    if user.is_superuser {
        tracing::warn!(
            user_id = user.id,
            username = %user.username,
            "Refused superuser sign-in"
        );
        let page = login_page(next, Some(SUPERUSER_REFUSED));
        return Ok((StatusCode::FORBIDDEN, Html(page)).into_response());
    }

    let session = new_session(user.id, Utc::now(), state.config.session_ttl_chrono());
    state.sessions.create_session(&session).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User signed in");

    let cookie = Cookie::build((state.config.cookie_name.clone(), session.id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.session_ttl.as_secs() as i64
        ))
        .build();

    Ok((jar.add(cookie), Redirect::to(&landing(next))).into_response())
}

async fn find_or_create_user(state: &AuthState, username: &str) -> Result<User, AuthError> {
    if let Some(user) = state.users.get_user_by_username(username).await? {
        return Ok(user);
    }

    match state.users.create_user(&NewUser::new(username)).await {
        Ok(user) => {
            tracing::info!(
                user_id = user.id,
                username = %user.username,
                "Created user on first sign-in"
            );
            Ok(user)
        }
        // Lost a race with a concurrent first sign-in.
        Err(RepositoryError::AlreadyExists { .. }) => state
            .users
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| newsdesk_core::auth::AuthError::UserNotFound.into()),
        Err(err) => Err(err.into()),
    }
}

async fn logout(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    if let Some(cookie) = jar.get(&state.config.cookie_name) {
        let session_id = SessionId::new(cookie.value().to_string());
        state.sessions.delete_session(&session_id).await?;
    }

    let jar = jar.remove(Cookie::build(state.config.cookie_name.clone()).path("/"));
    Ok((jar, Redirect::to(DEFAULT_LANDING)))
}
