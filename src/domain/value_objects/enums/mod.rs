pub mod channel_types;
pub mod roles;
pub mod subscription_statuses;
