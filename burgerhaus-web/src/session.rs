use std::sync::Arc;

use burgerhaus_types::users::{LoginResponse, UserInfo};
use tracing::debug;

use crate::cart::Cart;
use crate::error::{WebError, WebResult};
use crate::storage::{load_json, save_json, Storage};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Login state of the client, persisted through the injected storage.
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn Storage>,
}

impl Session {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn login(&self, response: &LoginResponse) -> WebResult<()> {
        self.storage.set(TOKEN_KEY, &response.token)?;
        save_json(self.storage.as_ref(), USER_KEY, &response.user)?;
        debug!(username = %response.user.username, "session stored");
        Ok(())
    }

    /// Replaces the stored profile, e.g. after a profile update.
    pub fn store_user(&self, user: &UserInfo) -> WebResult<()> {
        save_json(self.storage.as_ref(), USER_KEY, user)?;
        Ok(())
    }

    pub fn token(&self) -> WebResult<Option<String>> {
        Ok(self.storage.get(TOKEN_KEY)?)
    }

    pub fn user(&self) -> WebResult<Option<UserInfo>> {
        Ok(load_json(self.storage.as_ref(), USER_KEY)?)
    }

    /// Both token and profile are present.
    pub fn is_logged_in(&self) -> WebResult<bool> {
        Ok(self.token()?.is_some() && self.user()?.is_some())
    }

    pub fn is_admin(&self) -> WebResult<bool> {
        Ok(self.user()?.is_some_and(|user| user.role.is_admin()))
    }

    pub fn require_user(&self) -> WebResult<UserInfo> {
        self.user()?.ok_or(WebError::NotLoggedIn)
    }

    /// The cart of the logged-in user.
    pub fn cart(&self) -> WebResult<Cart> {
        let user = self.require_user()?;
        Cart::load(self.storage.clone(), user.user_id)
    }

    /// Forgets everything stored, carts included.
    pub fn logout(&self) -> WebResult<()> {
        self.storage.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use burgerhaus_types::users::Role;

    use super::*;
    use crate::storage::MemoryStorage;

    fn login_response(user_id: i32, username: &str, role: Role) -> LoginResponse {
        LoginResponse {
            token: format!("token-{username}"),
            user: UserInfo {
                user_id,
                username: username.to_string(),
                avatar: None,
                firstname: "Test".to_string(),
                lastname: "User".to_string(),
                address: None,
                phone: None,
                email: None,
                role,
            },
        }
    }

    #[test]
    fn test_login_and_logout() {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        assert!(!session.is_logged_in().unwrap());
        assert!(matches!(session.cart(), Err(WebError::NotLoggedIn)));

        session.login(&login_response(3, "alice", Role::Guest)).unwrap();
        assert!(session.is_logged_in().unwrap());
        assert!(!session.is_admin().unwrap());
        assert_eq!(session.token().unwrap().as_deref(), Some("token-alice"));
        assert_eq!(session.user().unwrap().unwrap().user_id, 3);

        session.logout().unwrap();
        assert!(!session.is_logged_in().unwrap());
        assert_eq!(session.user().unwrap(), None);
    }

    #[test]
    fn test_token_without_profile_is_logged_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "dangling").unwrap();
        let session = Session::new(storage);
        assert!(!session.is_logged_in().unwrap());
    }

    #[test]
    fn test_admin_role() {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        session.login(&login_response(1, "root", Role::Admin)).unwrap();
        assert!(session.is_admin().unwrap());
    }
}
