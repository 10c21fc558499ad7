use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use burgerhaus_types::orders::{
    ActiveOrderRow, NewOrderRequest, NewOrderResponse, OrderHistoryRow, OrderItemsRequest,
    OrderItemsResponse, OrderStatusUpdate, OrderStatusUpdateResponse, STATUS_NOT_STARTED,
};
use chrono::Local;
use tracing::{error, info, instrument, warn};

use crate::auth::{ensure_self_or_admin, ensure_self_or_admin_id, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::models::{NewOrder, NewOrderItem};
use crate::store;
use crate::AppState;

use super::{collection, JsonBody};

pub fn router() -> Router<AppState> {
    collection(Router::new(), "/users/orders", post(place_order))
        .route("/users/orders/items", post(add_order_items))
        .route("/users/orders/{name}", get(order_history))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route(
        "/users/admin/orders/active",
        get(active_orders).put(update_order_status),
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/users/orders",
    request_body = NewOrderRequest,
    responses(
        (status = 201, description = "Order created", body = NewOrderResponse),
        (status = 403, description = "Ordering for someone else", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
#[instrument(skip(state, current))]
pub async fn place_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<NewOrderRequest>,
) -> ApiResult<(StatusCode, Json<NewOrderResponse>)> {
    ensure_self_or_admin_id(current.info(), payload.user_id)?;
    let order = NewOrder {
        user_id: payload.user_id,
        status: STATUS_NOT_STARTED.to_string(),
        created_on: Local::now().date_naive(),
    };
    let mut conn = state.conn().await?;
    let order_id = store::orders::create(&mut conn, &order)
        .await
        .inspect_err(|e| error!("cannot create order: {e}"))?;
    info!(order_id, "created order");
    Ok((StatusCode::CREATED, Json(NewOrderResponse { order_id })))
}

/// Stores every item with its own insert. Items that fail are logged and
/// skipped; the response reports how many were stored.
#[utoipa::path(
    post,
    path = "/api/v1/users/orders/items",
    request_body = OrderItemsRequest,
    responses(
        (status = 201, description = "Items stored", body = OrderItemsResponse),
        (status = 403, description = "Not your order", body = burgerhaus_types::ErrorBody),
        (status = 404, description = "No such order", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
#[instrument(skip(state, current, payload), fields(order_id = payload.order_id))]
pub async fn add_order_items(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<OrderItemsRequest>,
) -> ApiResult<(StatusCode, Json<OrderItemsResponse>)> {
    let mut conn = state.conn().await?;
    let owner = store::orders::owner_of(&mut conn, payload.order_id)
        .await
        .inspect_err(|e| error!("cannot load order: {e}"))?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    ensure_self_or_admin_id(current.info(), owner)?;

    let mut added = 0;
    for item in &payload.items {
        if item.quantity <= 0 {
            warn!(burger_id = item.id, quantity = item.quantity, "skipped non-positive quantity");
            continue;
        }
        let row = NewOrderItem {
            order_id: payload.order_id,
            burger_id: item.id,
            quantity: item.quantity,
        };
        match store::orders::add_item(&mut conn, &row).await {
            Ok(_) => added += 1,
            Err(e) => warn!(burger_id = item.id, "skipped order item: {e}"),
        }
    }

    info!(added, requested = payload.items.len(), "stored order items");
    Ok((
        StatusCode::CREATED,
        Json(OrderItemsResponse {
            message: "Order items successfully added".to_string(),
            added,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/orders/{name}",
    params(("name" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Order lines sorted by order id", body = [OrderHistoryRow]),
        (status = 403, description = "Not your account", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
#[instrument(skip(state, current))]
pub async fn order_history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<OrderHistoryRow>>> {
    ensure_self_or_admin(current.info(), &name)?;
    let mut conn = state.conn().await?;
    let rows = store::orders::history_for_username(&mut conn, &name)
        .await
        .inspect_err(|e| error!("cannot load order history: {e}"))?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/admin/orders/active",
    responses(
        (status = 200, description = "Lines of orders not done yet", body = [ActiveOrderRow]),
        (status = 403, description = "Admin only", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn active_orders(State(state): State<AppState>) -> ApiResult<Json<Vec<ActiveOrderRow>>> {
    let mut conn = state.conn().await?;
    let rows = store::orders::active(&mut conn)
        .await
        .inspect_err(|e| error!("cannot load active orders: {e}"))?;
    Ok(Json(rows))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/admin/orders/active",
    request_body = OrderStatusUpdate,
    responses(
        (status = 200, description = "Statuses updated", body = OrderStatusUpdateResponse),
        (status = 400, description = "Blank status", body = burgerhaus_types::ErrorBody),
        (status = 403, description = "Admin only", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn update_order_status(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<OrderStatusUpdate>,
) -> ApiResult<Json<OrderStatusUpdateResponse>> {
    let status = payload.status.trim();
    if status.is_empty() {
        return Err(ApiError::bad_request("Missing status"));
    }

    let mut conn = state.conn().await?;
    let mut updated = Vec::with_capacity(payload.orders.len());
    for order_id in &payload.orders {
        match store::orders::update_status(&mut conn, *order_id, status).await {
            Ok(0) => warn!(order_id, "status update matched no order"),
            Ok(_) => updated.push(*order_id),
            Err(e) => warn!(order_id, "skipped status update: {e}"),
        }
    }

    info!(status, updated = updated.len(), "updated order statuses");
    Ok(Json(OrderStatusUpdateResponse {
        message: format!("Status set to {status}"),
        updated,
    }))
}
