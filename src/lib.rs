// Gym management backend

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::AppError;
