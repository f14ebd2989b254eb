use serde::{Deserialize, Serialize};

pub const DEFAULT_REGISTER_ROLE: &str = "Fleet Manager";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl RegisterRequest {
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role: DEFAULT_REGISTER_ROLE.to_string(),
        }
    }

    /// Name of the first blank field, in form order.
    pub fn first_missing(&self) -> Option<&'static str> {
        [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("role", &self.role),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: LoginUser,
    /// Bearer credential, for backends that hand one out alongside the cookie.
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub role: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_accepts_either_token_name() {
        let plain: LoginResponse = serde_json::from_value(json!({ "user": { "role": "admin" } })).unwrap();
        assert_eq!(plain.user.role, "admin");
        assert!(plain.token.is_none());

        let bearer: LoginResponse = serde_json::from_value(json!({
            "user": { "role": "Fleet Manager", "username": "bob" },
            "access_token": "abc"
        }))
        .unwrap();
        assert_eq!(bearer.token.as_deref(), Some("abc"));
        assert_eq!(bearer.user.username.as_deref(), Some("bob"));
    }

    #[test]
    fn register_reports_first_blank_field() {
        let mut req = RegisterRequest::new("bob", "", "hunter22");
        assert_eq!(req.first_missing(), Some("email"));
        req.email = "bob@globetrans.co.ke".into();
        assert_eq!(req.first_missing(), None);
        assert_eq!(req.role, DEFAULT_REGISTER_ROLE);
    }
}
