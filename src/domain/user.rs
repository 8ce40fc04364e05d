//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleName {
    User,
    Admin,
}

impl RoleName {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, RoleName::Admin)
    }
}

impl From<&str> for RoleName {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => RoleName::Admin,
            _ => RoleName::User,
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleName::Admin => write!(f, "{}", ROLE_ADMIN),
            RoleName::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: Option<String>,
    pub roles: Vec<RoleName>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(RoleName::is_admin)
    }

    /// Role carried into JWT claims: the strongest role the user holds.
    pub fn primary_role(&self) -> RoleName {
        if self.is_admin() {
            RoleName::Admin
        } else {
            RoleName::User
        }
    }
}

/// User creation data (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: Option<String>,
}

/// User response (safe to return to client, never carries the hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            shipping_address: user.shipping_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(RoleName::from("ADMIN"), RoleName::Admin);
        assert_eq!(RoleName::from("USER"), RoleName::User);
        assert_eq!(RoleName::Admin.to_string(), "ADMIN");
    }

    #[test]
    fn unknown_role_string_defaults_to_user() {
        assert_eq!(RoleName::from("SUPERVISOR"), RoleName::User);
    }

    #[test]
    fn admin_wins_as_primary_role() {
        let user = User {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            shipping_address: None,
            roles: vec![RoleName::User, RoleName::Admin],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(user.is_admin());
        assert_eq!(user.primary_role(), RoleName::Admin);
    }
}
