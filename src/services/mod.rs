// Per-resource data access over the shared pool

pub mod appointment_service;
pub mod client_service;
pub mod consultation_service;
pub mod feedback_service;
pub mod notification_service;
pub mod plan_service;
pub mod progress_service;
pub mod trainer_service;
pub mod user_service;

pub use appointment_service::AppointmentService;
pub use client_service::ClientService;
pub use consultation_service::ConsultationService;
pub use feedback_service::{FeedbackService, NewFeedback};
pub use notification_service::NotificationService;
pub use plan_service::PlanService;
pub use progress_service::ProgressService;
pub use trainer_service::TrainerService;
pub use user_service::UserService;
