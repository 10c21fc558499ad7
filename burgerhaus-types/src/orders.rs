use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status given to freshly placed orders.
pub const STATUS_NOT_STARTED: &str = "Not started";
/// Orders in this status no longer show up in the active list.
pub const STATUS_DONE: &str = "Done";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewOrderRequest {
    pub user_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewOrderResponse {
    pub order_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    /// Burger id
    pub id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemsRequest {
    #[serde(rename = "orderId")]
    pub order_id: i32,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemsResponse {
    pub message: String,
    /// Items actually stored
    pub added: usize,
}

/// One line of a user's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderHistoryRow {
    pub name: String,
    pub quantity: i32,
    pub date: NaiveDate,
    pub status: String,
    pub order_id: i32,
}

/// One line of an order that is not done yet, with delivery contact data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActiveOrderRow {
    pub order_id: i32,
    pub name: String,
    pub quantity: i32,
    pub firstname: String,
    pub lastname: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusUpdate {
    pub status: String,
    pub orders: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusUpdateResponse {
    pub message: String,
    /// Order ids whose status actually changed
    pub updated: Vec<i32>,
}
