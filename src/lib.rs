use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod client;
pub mod config;
pub mod cors;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

pub fn build_router(state: AppState) -> Router {
    let auth_routes = cors::AUTH.apply(Router::new().route(
        "/auth",
        with_fallbacks(post(handlers::auth::authenticate)),
    ));

    let entries_routes = cors::ENTRIES.apply(
        Router::new().route(
            "/entries",
            with_fallbacks(
                get(handlers::entries::list_entries)
                    .post(handlers::entries::upsert_entry)
                    .delete(handlers::entries::delete_entry),
            ),
        ),
    );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(auth_routes)
        .merge(entries_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn with_fallbacks(router: MethodRouter<AppState>) -> MethodRouter<AppState> {
    router
        .options(handlers::acknowledge_options)
        .fallback(handlers::unsupported_method)
}
