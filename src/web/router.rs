//! Route definitions for the built-in screens.

use axum::{
    routing::get,
    Router,
};

use super::handlers::{self, AppState};

/// Create the app router over shared broker state.
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register_submit),
        )
        .route(
            "/login",
            get(handlers::login_form).post(handlers::login_submit),
        )
        .route("/loggedin", get(handlers::logged_in))
        .route(
            "/sendmessage",
            get(handlers::send_form).post(handlers::send_submit),
        )
        .route("/readmessage", get(handlers::read_message))
        .route("/logout", get(handlers::logout))
        .route("/health", get(handlers::health))
        .with_state(state)
}
