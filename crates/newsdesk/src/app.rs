use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use newsdesk_auth::auth_routes;

use crate::{
    handlers::{
        categories::{category_news, list_categories, subscribe, unsubscribe},
        health::{healthz, livez},
        news::{list_news, news_detail, search_news},
        pages::index,
        upgrade::upgrade_me,
        write::{
            create, create_form, delete, delete_form, edit, edit_form, ArticleEntry, EntryPoint,
            NewsEntry,
        },
    },
    state::AppState,
};

/// Create, edit and delete routes under `/{prefix}` for one entry point.
fn write_routes<E: EntryPoint>(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{prefix}/create"),
            get(create_form::<E>).post(create::<E>),
        )
        .route(
            &format!("{prefix}/{{id}}/edit"),
            get(edit_form::<E>).post(edit::<E>),
        )
        .route(
            &format!("{prefix}/{{id}}/delete"),
            get(delete_form::<E>).post(delete::<E>),
        )
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Sign-in and sign-out run on the auth sub-state
    let auth: Router<AppState> = auth_routes().with_state(state.auth.clone());

    Router::new()
        .route("/", get(index))
        // News
        .route("/news", get(list_news))
        .route("/news/search", get(search_news))
        .route("/news/{id}", get(news_detail))
        .merge(write_routes::<NewsEntry>("/news"))
        .merge(write_routes::<ArticleEntry>("/article"))
        // Categories and subscriptions
        .route("/categories", get(list_categories))
        .route("/category/{id}", get(category_news))
        .route("/category/{id}/subscribe", get(subscribe))
        .route("/category/{id}/unsubscribe", get(unsubscribe))
        // Group elevation
        .route("/upgrade", get(upgrade_me))
        // Health checks
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .merge(auth)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
