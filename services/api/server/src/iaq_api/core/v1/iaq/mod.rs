use axum::Router;

use crate::AppState;

pub mod handler;

pub fn get_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/iaq",
            axum::routing::post(handler::ingest).get(handler::list),
        )
        .route("/iaq/csv", axum::routing::get(handler::export_csv))
}
