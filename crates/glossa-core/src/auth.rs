//! Principals and role claims.
//!
//! Authentication lives outside the core: an external identity
//! collaborator validates credentials and hands over a [`Principal`]
//! carrying a resolved role claim. The core only decides what that role
//! may do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GlossaError;

/// Role claim attached to an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    /// Whether this role may create or update translations.
    pub fn can_edit(self) -> bool {
        matches!(self, Self::Admin | Self::Editor)
    }

    /// Whether this role may delete translations.
    pub fn can_delete(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Admin => "ADMIN",
            Self::Editor => "EDITOR",
            Self::Viewer => "VIEWER",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = GlossaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "EDITOR" => Ok(Self::Editor),
            "VIEWER" => Ok(Self::Viewer),
            other => Err(GlossaError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

/// An authenticated caller, as resolved by the boundary layer.
///
/// Holding a principal authorizes reads; write operations additionally
/// check the role.
#[derive(Debug, Clone)]
pub struct Principal {
    pub subject: String,
    pub role: Role,
}

impl Principal {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_permissions() {
        assert!(Role::Admin.can_edit());
        assert!(Role::Admin.can_delete());
        assert!(Role::Editor.can_edit());
        assert!(!Role::Editor.can_delete());
        assert!(!Role::Viewer.can_edit());
        assert!(!Role::Viewer.can_delete());
    }

    #[test]
    fn role_parses_case_insensitive() {
        assert_eq!("editor".parse::<Role>().ok(), Some(Role::Editor));
        assert_eq!("ADMIN".parse::<Role>().ok(), Some(Role::Admin));
        assert!("root".parse::<Role>().is_err());
    }
}
