use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/register", get(handlers::register_form).post(handlers::register))
        .route("/logout", get(handlers::logout))
        .route("/goal", get(handlers::goal_form).post(handlers::set_goal))
        .route("/add_water", post(handlers::add_water))
        .route("/reset_water", post(handlers::reset_water))
        .route("/history", get(handlers::history))
        .route("/api/today", get(handlers::get_today))
        .with_state(state)
}
