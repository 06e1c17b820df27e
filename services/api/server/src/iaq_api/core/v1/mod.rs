use axum::Router;

pub(crate) mod errors;
pub mod iaq;
pub(crate) mod models;
pub(crate) mod readings;
pub mod rawlog;

pub fn get_routes(state: crate::AppState) -> Router {
    Router::new()
        .merge(iaq::get_routes())
        .merge(rawlog::get_routes())
        .with_state(state)
}
