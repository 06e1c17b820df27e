use axum::Router;

use crate::AppState;

pub mod handler;

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rawlog",
            axum::routing::post(handler::ingest).get(handler::list),
        )
        .route("/rawlog/csv", axum::routing::get(handler::export_csv))
}
