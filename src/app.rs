use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::whoami).post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route(
            "/entries",
            get(handlers::list_entries)
                .post(handlers::add_entry)
                .delete(handlers::clear_entries),
        )
        .route("/entries/", delete(handlers::delete_missing_id))
        .route("/entries/:id", delete(handlers::delete_entry))
        .route("/stats", get(handlers::get_stats))
        .route("/share", get(handlers::share_link))
        .route("/shared", get(handlers::shared_board))
        .route("/shared.json", get(handlers::shared_board_json))
        .with_state(state)
}
