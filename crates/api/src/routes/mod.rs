//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::admin_middleware};

pub mod auth;
pub mod blogs;
pub mod calculators;
pub mod chat;
pub mod contact;
pub mod health;
pub mod uploads;

/// Creates the API router with public and admin routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let max_upload = state.storage.as_ref().map(|s| s.config().max_file_size);

    // Admin routes require a valid bearer token
    let admin_routes = Router::new()
        .merge(auth::admin_routes())
        .merge(blogs::admin_routes())
        .merge(uploads::admin_routes(max_upload))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(blogs::routes())
        .merge(calculators::routes())
        .merge(contact::routes())
        .merge(chat::routes())
        .merge(admin_routes)
}
