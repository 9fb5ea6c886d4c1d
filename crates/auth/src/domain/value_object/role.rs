use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by an account
///
/// Every registered account gets the default role; the remaining roles
/// are granted administratively (the bootstrap administrator holds all
/// of them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Supervisor,
    #[default]
    Member,
}

impl Role {
    /// All roles, in grant order
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Supervisor, Role::Member];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Admin => "Admin",
            Manager => "Manager",
            Supervisor => "Supervisor",
            Member => "Member",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "Admin" => Some(Admin),
            "Manager" => Some(Manager),
            "Supervisor" => Some(Supervisor),
            "Member" => Some(Member),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
