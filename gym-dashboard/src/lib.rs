// Admin dashboard core: CRUD transport, validation, controller, store and pages.
// The `gym-admin` binary is a thin front end over these modules.

pub mod api;
pub mod commands;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod models;
pub mod pages;
pub mod store;
pub mod validation;

pub use api::{ApiContext, ApiError, CrudService, CrudTransport, FilterValue, ListParams, ListResponse};
pub use controller::{ControllerState, CrudController, Hooks, Operation};
pub use entity::Entity;
pub use error::DashboardError;
pub use store::CrudStore;
