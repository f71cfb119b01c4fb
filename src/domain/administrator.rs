use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Role;

/// Stored administrator account.
#[derive(Debug, Clone)]
pub struct Administrator {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// Soft-delete marker. Inactive accounts cannot log in or refresh.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Data needed to create an administrator. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAdministrator {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Changes applied by an update; `password_hash` is only replaced when set.
#[derive(Debug, Clone)]
pub struct AdministratorChanges {
    pub email: String,
    pub role: Role,
    pub password_hash: Option<String>,
}

/// Public view of an administrator, never carries the digest.
#[derive(Debug, Clone, Serialize)]
pub struct AdministratorView {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&Administrator> for AdministratorView {
    fn from(administrator: &Administrator) -> Self {
        Self {
            id: administrator.id,
            email: administrator.email.clone(),
            role: administrator.role,
        }
    }
}
