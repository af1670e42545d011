//! Staff Member Model

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum StaffRole {
    #[serde(rename = "ADMIN")]
    #[cfg_attr(feature = "db", sqlx(rename = "ADMIN"))]
    Admin,
    #[serde(rename = "MANAGER")]
    #[cfg_attr(feature = "db", sqlx(rename = "MANAGER"))]
    Manager,
    #[serde(rename = "BARISTA")]
    #[cfg_attr(feature = "db", sqlx(rename = "BARISTA"))]
    Barista,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Barista => "BARISTA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Self::Admin),
            "MANAGER" => Some(Self::Manager),
            "BARISTA" => Some(Self::Barista),
            _ => None,
        }
    }

    /// Admins and managers run cafés; baristas work shifts
    pub fn can_manage(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Roles that authenticate with a password
    pub fn requires_password(&self) -> bool {
        self.can_manage()
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    pub phone: String,
    /// Unique external messenger identifier (chat platform user id)
    pub chat_id: i64,
    pub role: StaffRole,
    /// Argon2 hash; only Admin/Manager accounts carry one
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
    /// Baristas start inactive until a manager confirms them
    pub is_active: bool,
    /// Home café reference
    pub cafe_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub name: String,
    pub phone: String,
    pub chat_id: i64,
    pub role: StaffRole,
    /// Required when role is ADMIN or MANAGER
    pub password: Option<String>,
    pub cafe_id: Option<i64>,
}

/// Update staff payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<StaffRole>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub cafe_id: Option<i64>,
}
