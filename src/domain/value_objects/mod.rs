pub mod chat;
pub mod enums;
pub mod error_reports;
pub mod notifications;
pub mod pacing;
pub mod pagination;
pub mod rate_limit;
pub mod vip;
pub mod workout_title;
pub mod workouts;
