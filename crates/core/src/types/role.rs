//! Marketplace roles.

use serde::{Deserialize, Serialize};

/// The role an authenticated user acts under.
///
/// Roles are derived, never stored: the web layer computes one by checking
/// admin membership, then cook-profile existence, defaulting to `Student`.
/// Deliberately no `sqlx` support - there is no `role` column anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A customer ordering food. The default for any authenticated user.
    #[default]
    Student,
    /// A home cook with a cook profile (approved or not).
    Cook,
    /// A member of the admin set. Takes precedence over `Cook`.
    Admin,
}

impl Role {
    /// The dashboard path users of this role land on, if they have one.
    #[must_use]
    pub const fn dashboard_path(&self) -> Option<&'static str> {
        match self {
            Self::Student => None,
            Self::Cook => Some("/cook/dashboard"),
            Self::Admin => Some("/admin/dashboard"),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Cook => write!(f, "cook"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "cook" => Ok(Self::Cook),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_student() {
        assert_eq!(Role::default(), Role::Student);
    }

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(Role::Student.dashboard_path(), None);
        assert_eq!(Role::Cook.dashboard_path(), Some("/cook/dashboard"));
        assert_eq!(Role::Admin.dashboard_path(), Some("/admin/dashboard"));
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for role in [Role::Student, Role::Cook, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert!("superuser".parse::<Role>().is_err());
    }
}
