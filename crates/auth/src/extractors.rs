//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use newsdesk_core::auth::{is_session_expired, login_url, AuthError as CoreError, SessionId};
use newsdesk_core::news::User;

use crate::{AuthError, AuthState};

/// Why a request could not be attributed to a signed-in user.
#[derive(Debug)]
pub enum AuthRejection {
    /// No valid session; the caller is sent to the sign-in page and brought back to
    /// `next` afterwards.
    LoginRequired { next: String },
    /// Session or user storage failed.
    LookupFailed,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRequired { next } => {
                Redirect::to(&login_url(&next)).into_response()
            }
            AuthRejection::LookupFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Session lookup failed").into_response()
            }
        }
    }
}

/// Reads the session id from the Authorization header (API clients) or the session
/// cookie (browsers).
fn session_id_from_parts(parts: &Parts, cookie_name: &str) -> Option<SessionId> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        return header
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(|token| SessionId::new(token.trim().to_string()));
    }

    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(cookie_name)
        .map(|cookie| SessionId::new(cookie.value().to_string()))
}

/// Resolves the signed-in user, if any.
async fn resolve_user(parts: &Parts, state: &AuthState) -> Result<Option<User>, AuthError> {
    let Some(session_id) = session_id_from_parts(parts, &state.config.cookie_name) else {
        return Ok(None);
    };

    let Some(session) = state.sessions.get_session(&session_id).await? else {
        tracing::debug!("Unknown session presented");
        return Ok(None);
    };

    if is_session_expired(&session, Utc::now()) {
        tracing::debug!(user_id = session.user_id, "Expired session presented");
        return Ok(None);
    }

    let user = state.users.get_user(session.user_id).await?;
    if user.is_none() {
        tracing::warn!(user_id = session.user_id, "Session refers to a missing user");
        return Err(CoreError::UserNotFound.into());
    }
    Ok(user)
}

fn requested_path(parts: &Parts) -> String {
    parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string())
}

/// Extractor for authenticated user. Redirects to the sign-in page if not authenticated.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        match resolve_user(parts, &auth_state).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) | Err(AuthError::Core(CoreError::UserNotFound)) => {
                Err(AuthRejection::LoginRequired {
                    next: requested_path(parts),
                })
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to resolve current user");
                Err(AuthRejection::LookupFailed)
            }
        }
    }
}

/// Extractor for optionally authenticated user. Returns None if not authenticated.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        match resolve_user(parts, &auth_state).await {
            Ok(user) => Ok(OptionalUser(user)),
            Err(err) => {
                tracing::warn!(error = %err, "Treating request as anonymous");
                Ok(OptionalUser(None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{body::Body, http::Request, routing::get, Router};
    use chrono::Duration;
    use newsdesk_core::auth::{new_session, SessionRepository};
    use newsdesk_core::news::User;
    use tower::ServiceExt;

    use crate::sessions::MemorySessionStore;
    use crate::AuthConfig;
    use crate::handlers::tests::StubUsers;

    async fn whoami(CurrentUser(user): CurrentUser) -> String {
        user.username
    }

    async fn maybe(OptionalUser(user): OptionalUser) -> String {
        user.map(|u| u.username).unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(state: AuthState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/maybe", get(maybe))
            .with_state(state)
    }

    async fn state_with_user() -> (AuthState, User, Arc<MemorySessionStore>) {
        let users = Arc::new(StubUsers::default());
        let user = users.insert("alice").await;
        let sessions = Arc::new(MemorySessionStore::new());
        let state = AuthState::new(sessions.clone(), users, AuthConfig::default());
        (state, user, sessions)
    }

    #[tokio::test]
    async fn anonymous_request_redirects_to_login_with_next() {
        let (state, _, _) = state_with_user().await;

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/whoami?x=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(location, "/accounts/login?next=%2Fwhoami%3Fx%3D1");
    }

    #[tokio::test]
    async fn session_cookie_resolves_user() {
        let (state, user, sessions) = state_with_user().await;
        let session = new_session(user.id, Utc::now(), Duration::hours(1));
        sessions.create_session(&session).await.unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("cookie", format!("session={}", session.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"alice");
    }

    #[tokio::test]
    async fn bearer_header_resolves_user() {
        let (state, user, sessions) = state_with_user().await;
        let session = new_session(user.id, Utc::now(), Duration::hours(1));
        sessions.create_session(&session).await.unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("authorization", format!("Bearer {}", session.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn expired_session_is_rejected() {
        let (state, user, sessions) = state_with_user().await;
        let session = new_session(user.id, Utc::now() - Duration::hours(2), Duration::hours(1));
        sessions.create_session(&session).await.unwrap();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("cookie", format!("session={}", session.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn optional_user_falls_back_to_anonymous() {
        let (state, _, _) = state_with_user().await;

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/maybe")
                    .header("cookie", "session=unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"anonymous");
    }
}
