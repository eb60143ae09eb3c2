// Bearer token verification and role checks

pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use errors::*;
pub use jwt::*;
pub use middleware::*;
pub use models::*;
