use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Role {
    #[default]
    User,
    Teacher,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            Role::User => "user",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        };
        write!(f, "{}", role)
    }
}

impl Role {
    pub fn from_str(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "teacher" => Role::Teacher,
            _ => Role::User,
        }
    }

    /// Admin and teacher accounts bypass per-plan limits.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher)
    }
}
