/// User domain type
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Listener,
    Artist,
    Admin,
}

impl Role {
    /// Parse a role name leniently; unknown names map to `Listener`
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "admin" | "administrator" | "superadmin" => Role::Admin,
            "artist" | "band" | "musician" => Role::Artist,
            _ => Role::Listener,
        }
    }

    /// Whether admin screens should be reachable
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Role,
}
