use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role. `Admin` unlocks the catalog, order and table management
/// routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[default]
    Guest,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Public profile of a user. Embedded in issued tokens and handed to the
/// frontend after login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub user_id: i32,
    pub username: String,
    pub avatar: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserInfo,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub message: String,
    pub user: UserInfo,
}

/// Fields accepted by the registration form. Only the name and credential
/// fields are mandatory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password: String,
    pub address: Option<String>,
    pub cardnumber: Option<String>,
    pub phonenumber: Option<String>,
    pub email: Option<String>,
}

impl Registration {
    /// Names of mandatory fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Partial profile update. Unknown keys are rejected instead of being
/// turned into column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UserInfoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardnumber: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserInfoUpdate {
    pub fn is_empty(&self) -> bool {
        self == &UserInfoUpdate::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"Admin\"");
        let role: Role = serde_json::from_str("\"Guest\"").unwrap();
        assert_eq!(role, Role::Guest);
        assert!(!role.is_admin());
    }

    #[test]
    fn test_user_info_update_rejects_unknown_keys() {
        let result = serde_json::from_str::<UserInfoUpdate>(r#"{"role": "Admin"}"#);
        assert!(result.is_err());

        let update: UserInfoUpdate =
            serde_json::from_str(r#"{"email": "a@b.c", "phone_number": "040"}"#).unwrap();
        assert_eq!(update.email.as_deref(), Some("a@b.c"));
        assert_eq!(update.phone_number.as_deref(), Some("040"));
        assert!(!update.is_empty());
        assert!(UserInfoUpdate::default().is_empty());
    }

    #[test]
    fn test_registration_missing_fields() {
        let registration = Registration {
            firstname: "Alice".to_string(),
            lastname: " ".to_string(),
            username: "alice".to_string(),
            ..Default::default()
        };
        assert_eq!(registration.missing_fields(), vec!["lastname", "password"]);
    }
}
