use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::handlers::engagement::{add_comment, list_comments, toggle_like};
use crate::presentation::handlers::posts::{create_post, delete_post, get_post, update_post};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    // Reads are protected too: every post view is annotated for the
    // authenticated viewer.
    Router::new()
        .route("/", post(create_post))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/comments", get(list_comments).post(add_comment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ))
}
