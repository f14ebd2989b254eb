use std::fmt;

/// Role reported by the backend at login. Anonymous sessions have no role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    /// Any other authenticated role, e.g. "Fleet Manager".
    Member(String),
}

impl Role {
    /// `None` for a blank value. "admin" matches in any case since the
    /// register form offers "Admin".
    pub fn parse(raw: &str) -> Option<Role> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else if raw.eq_ignore_ascii_case("admin") {
            Some(Role::Admin)
        } else {
            Some(Role::Member(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Member(name) => name,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
