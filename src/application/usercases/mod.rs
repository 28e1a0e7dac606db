pub mod admin_vip;
pub mod chat;
pub mod error_reports;
pub mod notifications;
pub mod presence;
pub mod rate_limit;
pub mod vip_entitlement;
pub mod workouts;
