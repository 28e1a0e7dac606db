pub mod admin_vip;
pub mod chat;
pub mod error_reports;
pub mod notifications;
pub mod presence;
pub mod vip;
pub mod workouts;
