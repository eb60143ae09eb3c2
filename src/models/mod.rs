// Database rows, request payloads and list queries

pub mod appointment;
pub mod client;
pub mod consultation;
pub mod feedback;
pub mod meal_plan;
pub mod notification;
pub mod progress;
pub mod query;
pub mod trainer;
pub mod user;
pub mod validation;
pub mod workout_plan;

pub use appointment::*;
pub use client::*;
pub use consultation::*;
pub use feedback::*;
pub use meal_plan::*;
pub use notification::*;
pub use progress::*;
pub use query::*;
pub use trainer::*;
pub use user::*;
pub use validation::*;
pub use workout_plan::*;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
