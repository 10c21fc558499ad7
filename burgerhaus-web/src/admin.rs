//! State of the admin console: active order selection and account removal.

use burgerhaus_types::orders::{ActiveOrderRow, OrderStatusUpdateResponse};
use chrono::NaiveDate;
use tracing::info;

use crate::api::ApiClient;
use crate::error::{WebError, WebResult};
use crate::session::Session;

/// Account that may never be deleted from the console.
pub const ROOT_ACCOUNT: &str = "root";

/// Order ids picked in the active order table, in the order they were
/// picked. Picking an id twice unpicks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSelection {
    ids: Vec<i32>,
}

impl OrderSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the order is selected afterwards.
    pub fn toggle(&mut self, order_id: i32) -> bool {
        match self.ids.iter().position(|id| *id == order_id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(order_id);
                true
            }
        }
    }

    pub fn contains(&self, order_id: i32) -> bool {
        self.ids.contains(&order_id)
    }

    pub fn ids(&self) -> &[i32] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Sends the new status for every selected order and clears the
    /// selection on success.
    pub async fn apply_status(
        &mut self,
        api: &ApiClient,
        status: &str,
    ) -> WebResult<OrderStatusUpdateResponse> {
        if self.is_empty() {
            return Err(WebError::BadRequest("no orders selected".to_string()));
        }
        let response = api.update_order_status(status, self.ids.clone()).await?;
        info!(status, updated = response.updated.len(), "order status applied");
        self.clear();
        Ok(response)
    }
}

/// An active order with all its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveOrder {
    pub order_id: i32,
    pub customer: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub date: NaiveDate,
    pub status: String,
    /// Burger name and quantity
    pub lines: Vec<(String, i32)>,
}

/// Folds the flat line rows into one entry per order, keeping the order in
/// which orders first appear.
pub fn group_active_orders(rows: Vec<ActiveOrderRow>) -> Vec<ActiveOrder> {
    let mut orders: Vec<ActiveOrder> = Vec::new();
    for row in rows {
        match orders.iter_mut().find(|o| o.order_id == row.order_id) {
            Some(order) => order.lines.push((row.name, row.quantity)),
            None => orders.push(ActiveOrder {
                order_id: row.order_id,
                customer: format!("{} {}", row.firstname, row.lastname),
                address: row.address,
                phone_number: row.phone_number,
                date: row.date,
                status: row.status,
                lines: vec![(row.name, row.quantity)],
            }),
        }
    }
    orders
}

pub async fn load_active_orders(api: &ApiClient) -> WebResult<Vec<ActiveOrder>> {
    Ok(group_active_orders(api.active_orders().await?))
}

pub fn ensure_deletable(username: &str) -> WebResult<()> {
    if username == ROOT_ACCOUNT {
        return Err(WebError::RootAccount);
    }
    Ok(())
}

/// Deletes the logged-in account and forgets the session.
pub async fn delete_account(api: &ApiClient, session: &Session) -> WebResult<()> {
    let user = session.require_user()?;
    ensure_deletable(&user.username)?;
    api.delete_user(&user.username).await?;
    session.logout()?;
    info!(username = %user.username, "account deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use burgerhaus_types::users::{LoginResponse, Role, UserInfo};

    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStorage;

    fn row(order_id: i32, name: &str, quantity: i32) -> ActiveOrderRow {
        ActiveOrderRow {
            order_id,
            name: name.to_string(),
            quantity,
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            address: None,
            phone_number: Some("040".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status: "Not started".to_string(),
        }
    }

    #[test]
    fn test_toggle_selection() {
        let mut selection = OrderSelection::new();
        assert!(selection.toggle(5));
        assert!(selection.toggle(3));
        assert_eq!(selection.ids(), &[5, 3]);
        assert!(!selection.toggle(5));
        assert!(!selection.contains(5));
        assert_eq!(selection.ids(), &[3]);
    }

    #[test]
    fn test_group_active_orders() {
        let orders = group_active_orders(vec![
            row(2, "Classic", 1),
            row(1, "Veggie", 2),
            row(2, "Double", 3),
        ]);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, 2);
        assert_eq!(
            orders[0].lines,
            vec![("Classic".to_string(), 1), ("Double".to_string(), 3)]
        );
        assert_eq!(orders[1].customer, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_root_cannot_be_deleted() {
        assert!(ensure_deletable("alice").is_ok());

        let api = ApiClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let session = Session::new(Arc::new(MemoryStorage::new()));
        session
            .login(&LoginResponse {
                token: "t".to_string(),
                user: UserInfo {
                    user_id: 1,
                    username: "root".to_string(),
                    avatar: None,
                    firstname: "Root".to_string(),
                    lastname: "Admin".to_string(),
                    address: None,
                    phone: None,
                    email: None,
                    role: Role::Admin,
                },
            })
            .unwrap();
        assert!(matches!(
            delete_account(&api, &session).await,
            Err(WebError::RootAccount)
        ));
        assert!(session.is_logged_in().unwrap());
    }

    #[tokio::test]
    async fn test_empty_selection_sends_nothing() {
        let api = ApiClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let mut selection = OrderSelection::new();
        assert!(matches!(
            selection.apply_status(&api, "Done").await,
            Err(WebError::BadRequest(_))
        ));
    }
}
