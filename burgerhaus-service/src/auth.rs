use argon2::password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHash};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use burgerhaus_types::users::UserInfo;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::ApiError, AppState};

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("Cannot hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub user: UserInfo,
    pub exp: usize,
    pub iat: usize,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires: TimeDelta,
}

impl TokenService {
    pub fn new(secret_key: &str, access_token_expires: TimeDelta) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret_key.as_ref()),
            decoding_key: DecodingKey::from_secret(secret_key.as_ref()),
            access_token_expires,
        }
    }

    pub fn issue(&self, user: &UserInfo) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            user: user.clone(),
            exp: (now + self.access_token_expires).timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Cannot issue token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding_key,
            &jsonwebtoken::Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("rejected token: {e}");
            ApiError::InvalidToken
        })
    }
}

/// Identity of the caller, inserted into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserInfo);

impl CurrentUser {
    pub fn info(&self) -> &UserInfo {
        &self.0
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&req) else {
        warn!(uri = %req.uri(), "missing bearer token");
        return Err(ApiError::AuthenticationFailed);
    };
    let claims = state.tokens.verify(token)?;
    debug!(username = %claims.user.username, "authenticated");
    req.extensions_mut().insert(CurrentUser(claims.user));
    Ok(next.run(req).await)
}

/// Must run inside [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(ApiError::AuthenticationFailed)?;
    if !user.0.role.is_admin() {
        warn!(username = %user.0.username, uri = %req.uri(), "admin route refused");
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}

pub fn ensure_self_or_admin(current: &UserInfo, username: &str) -> Result<(), ApiError> {
    if current.role.is_admin() || current.username == username {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub fn ensure_self_or_admin_id(current: &UserInfo, user_id: i32) -> Result<(), ApiError> {
    if current.role.is_admin() || current.user_id == user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burgerhaus_types::users::Role;

    fn alice(role: Role) -> UserInfo {
        UserInfo {
            user_id: 7,
            username: "alice".to_string(),
            avatar: None,
            firstname: "Alice".to_string(),
            lastname: "Smith".to_string(),
            address: Some("Main street 1".to_string()),
            phone: None,
            email: Some("alice@example.com".to_string()),
            role,
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("Secret", &hash));
        assert!(!verify_password("secret", "not-a-hash"));
    }

    #[test]
    fn test_token_carries_user_info() {
        let tokens = TokenService::new("test-secret", TimeDelta::hours(24));
        let token = tokens.issue(&alice(Role::Admin)).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user, alice(Role::Admin));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = TokenService::new("test-secret", TimeDelta::hours(-2));
        let token = tokens.issue(&alice(Role::Guest)).unwrap();
        assert!(matches!(tokens.verify(&token), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let ours = TokenService::new("test-secret", TimeDelta::hours(1));
        let theirs = TokenService::new("other-secret", TimeDelta::hours(1));
        let token = theirs.issue(&alice(Role::Guest)).unwrap();
        assert!(matches!(ours.verify(&token), Err(ApiError::InvalidToken)));
        assert!(matches!(ours.verify("garbage"), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_ownership_checks() {
        let guest = alice(Role::Guest);
        assert!(ensure_self_or_admin(&guest, "alice").is_ok());
        assert!(ensure_self_or_admin(&guest, "bob").is_err());
        assert!(ensure_self_or_admin_id(&guest, 7).is_ok());
        assert!(ensure_self_or_admin_id(&guest, 8).is_err());

        let admin = alice(Role::Admin);
        assert!(ensure_self_or_admin(&admin, "bob").is_ok());
        assert!(ensure_self_or_admin_id(&admin, 8).is_ok());
    }
}
