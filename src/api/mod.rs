// REST handlers, one module per resource

pub mod appointments;
pub mod clients;
pub mod consultations;
pub mod extract;
pub mod feedbacks;
pub mod health;
pub mod meal_plans;
pub mod notifications;
pub mod progress;
pub mod routes;
pub mod trainers;
pub mod users;
pub mod workout_plans;

pub use extract::ValidatedJson;
pub use routes::{create_routes, AppState};
