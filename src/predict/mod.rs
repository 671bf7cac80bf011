use crate::state::AppState;
use axum::Router;

pub mod calculator;
mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::predict_routes()
}
