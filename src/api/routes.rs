use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::health::health_check;
use super::{
    appointments::appointment_routes, clients::client_routes, consultations::consultation_routes,
    feedbacks::feedback_routes, meal_plans::meal_plan_routes,
    notifications::notification_routes, progress::progress_routes, trainers::trainer_routes,
    users::user_routes, workout_plans::workout_plan_routes,
};
use crate::auth::{cors_layer, jwt_auth_middleware, JwtService};

/// Shared handler state; services are built per request from the pool
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt: JwtService,
}

pub fn create_routes(db: PgPool, jwt_secret: &str) -> Router {
    let state = AppState {
        db,
        jwt: JwtService::new(jwt_secret),
    };

    let api = Router::new()
        .nest("/users", user_routes())
        .nest("/trainers", trainer_routes())
        .nest("/clients", client_routes())
        .nest("/workout-plans", workout_plan_routes())
        .nest("/meal-plans", meal_plan_routes())
        .nest("/progress", progress_routes())
        .nest("/feedbacks", feedback_routes())
        .nest("/notifications", notification_routes())
        .nest("/consultations", consultation_routes())
        .nest("/appointments", appointment_routes())
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
