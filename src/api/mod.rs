mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::session::SessionStore;

pub fn create_router(store: SessionStore) -> Router {
    let api = Router::new()
        // Catalog
        .route("/destinations", get(handlers::list_destinations))
        .route("/destinations/{id}", get(handlers::get_destination))
        .route("/tasks", get(handlers::list_tasks))
        // Session
        .route("/session", get(handlers::get_session))
        .route("/session/filter", put(handlers::set_filter))
        .route(
            "/session/destination",
            put(handlers::select_destination).delete(handlers::clear_selection),
        )
        .route("/session/tasks/{id}/complete", post(handlers::complete_task))
        .route("/session/reset", post(handlers::reset_session))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(store)
}
