pub mod audit_events;
pub mod chat;
pub mod error_reports;
pub mod notifications;
pub mod plans;
pub mod profiles;
pub mod subscriptions;
pub mod vip_usage;
pub mod workouts;
