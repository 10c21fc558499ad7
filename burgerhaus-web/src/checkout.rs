use bigdecimal::BigDecimal;
use burgerhaus_types::users::UserInfo;
use tracing::info;

use crate::api::ApiClient;
use crate::cart::Cart;
use crate::error::{WebError, WebResult};
use crate::session::Session;

const MISSING: &str = "N/A";

/// What the confirmation dialog shows before an order is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// `<name> - <price>€ x <quantity>`
    pub lines: Vec<String>,
    pub total: BigDecimal,
}

impl CheckoutSummary {
    pub fn new(user: &UserInfo, cart: &Cart) -> Self {
        let or_missing = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(MISSING)
                .to_string()
        };
        Self {
            name: format!("{} {}", user.firstname, user.lastname),
            address: or_missing(&user.address),
            phone: or_missing(&user.phone),
            email: or_missing(&user.email),
            lines: cart
                .items()
                .iter()
                .map(|item| format!("{} - {}€ x {}", item.name, item.price, item.quantity))
                .collect(),
            total: cart.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub order_id: i32,
    /// Lines the server actually stored
    pub added: usize,
    pub total: BigDecimal,
}

/// Sends the cart of the logged-in user as a new order and empties it.
///
/// The order is created first and its items added in a second request. The
/// cart is only cleared once both succeeded.
pub async fn checkout(api: &ApiClient, session: &Session) -> WebResult<CheckoutReceipt> {
    if !session.is_logged_in()? {
        return Err(WebError::NotLoggedIn);
    }
    let user = session.require_user()?;
    let mut cart = session.cart()?;
    if cart.is_empty() {
        return Err(WebError::EmptyCart);
    }

    let total = cart.total();
    let order = api.place_order(user.user_id).await?;
    let items = api.add_order_items(order.order_id, cart.order_items()).await?;
    cart.clear()?;

    info!(order_id = order.order_id, added = items.added, "order placed");
    Ok(CheckoutReceipt {
        order_id: order.order_id,
        added: items.added,
        total,
    })
}

#[cfg(test)]
mod tests {
    use std::{str::FromStr, sync::Arc};

    use burgerhaus_types::users::{LoginResponse, Role};

    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStorage;

    fn user() -> UserInfo {
        UserInfo {
            user_id: 4,
            username: "alice".to_string(),
            avatar: None,
            firstname: "Alice".to_string(),
            lastname: "Smith".to_string(),
            address: Some("Main street 1".to_string()),
            phone: None,
            email: Some(" ".to_string()),
            role: Role::Guest,
        }
    }

    #[test]
    fn test_summary() {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        session
            .login(&LoginResponse {
                user: user(),
                token: "t".to_string(),
            })
            .unwrap();
        let mut cart = session.cart().unwrap();
        cart.add(1, "Classic", BigDecimal::from_str("8.50").unwrap())
            .unwrap();
        cart.add(1, "Classic", BigDecimal::from_str("8.50").unwrap())
            .unwrap();

        let summary = CheckoutSummary::new(&user(), &cart);
        assert_eq!(summary.name, "Alice Smith");
        assert_eq!(summary.phone, "N/A");
        assert_eq!(summary.email, "N/A");
        assert_eq!(summary.lines, vec!["Classic - 8.50€ x 2".to_string()]);
        assert_eq!(summary.total, BigDecimal::from(17));
    }

    #[tokio::test]
    async fn test_checkout_guards() {
        // Nothing listens here; the guards must fail before any request
        let api = ApiClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let session = Session::new(Arc::new(MemoryStorage::new()));
        assert!(matches!(
            checkout(&api, &session).await,
            Err(WebError::NotLoggedIn)
        ));

        session
            .login(&LoginResponse {
                user: user(),
                token: "t".to_string(),
            })
            .unwrap();
        assert!(matches!(
            checkout(&api, &session).await,
            Err(WebError::EmptyCart)
        ));
    }
}
