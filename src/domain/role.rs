use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Administrator role. Closed set; anything else is rejected where it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Adm", alias = "Admin")]
    Admin,
    Editor,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Adm",
            Role::Editor => "Editor",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Adm" | "Admin" => Ok(Role::Admin),
            "Editor" => Ok(Role::Editor),
            "User" => Ok(Role::User),
            _ => Err(ValidationError::InvalidFormat("role".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("Adm".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Editor".parse::<Role>().unwrap(), Role::Editor);
        assert_eq!("User".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn test_parse_rejects_free_text() {
        assert!("adm".parse::<Role>().is_err());
        assert!("root".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"Adm\"");
        let role: Role = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"Owner\"").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for role in [Role::Admin, Role::Editor, Role::User] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
