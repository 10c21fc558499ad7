use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use burgerhaus_types::{
    reservations::{Customer, CustomerRequest},
    MessageResponse,
};
use tracing::{error, info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::models::CustomerFields;
use crate::store;
use crate::AppState;

use super::{collection, message, JsonBody};

pub fn public_router() -> Router<AppState> {
    collection(
        Router::new(),
        "/customers",
        get(list_customers).post(add_customer),
    )
    .route("/customers/name/{name}", get(customers_by_name))
    .route(
        "/customers/{id}",
        get(get_customer).put(update_customer).delete(delete_customer),
    )
}

fn customer_fields(request: CustomerRequest) -> ApiResult<CustomerFields> {
    let name = request.customer_name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Missing customer_name"));
    }
    Ok(CustomerFields {
        name: name.to_string(),
        contact_info: request.contact_info.trim().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    responses((status = 200, description = "All customers", body = [Customer])),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn list_customers(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    let mut conn = state.conn().await?;
    let customers = store::customers::list(&mut conn)
        .await
        .inspect_err(|e| error!("cannot list customers: {e}"))?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Missing name", body = burgerhaus_types::ErrorBody),
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn add_customer(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CustomerRequest>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let fields = customer_fields(request)?;
    let mut conn = state.conn().await?;
    let customer = store::customers::insert(&mut conn, &fields)
        .await
        .inspect_err(|e| error!("cannot add customer: {e}"))?;
    info!(customer_id = customer.customer_id, "added customer");
    Ok((StatusCode::CREATED, Json(customer.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "The customer", body = Customer),
        (status = 404, description = "No such customer", body = burgerhaus_types::ErrorBody),
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Customer>> {
    let mut conn = state.conn().await?;
    let customer = store::customers::find(&mut conn, id)
        .await
        .inspect_err(|e| error!("cannot load customer: {e}"))?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;
    Ok(Json(customer.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = MessageResponse),
        (status = 404, description = "No such customer", body = burgerhaus_types::ErrorBody),
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(request): JsonBody<CustomerRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let fields = customer_fields(request)?;
    let mut conn = state.conn().await?;
    let updated = store::customers::update_by_id(&mut conn, id, &fields)
        .await
        .inspect_err(|e| error!("cannot update customer: {e}"))?;
    if updated == 0 {
        return Err(ApiError::not_found("Customer not found"));
    }
    Ok(message("Customer updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted", body = MessageResponse),
        (status = 404, description = "No such customer", body = burgerhaus_types::ErrorBody),
        (status = 500, description = "Customer still has reservations", body = burgerhaus_types::ErrorBody),
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let mut conn = state.conn().await?;
    let deleted = store::customers::delete_by_id(&mut conn, id)
        .await
        .inspect_err(|e| error!("cannot delete customer: {e}"))?;
    if deleted == 0 {
        return Err(ApiError::not_found("Customer not found"));
    }
    info!("deleted customer");
    Ok(message("Customer deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/name/{name}",
    params(("name" = String, Path, description = "Exact customer name")),
    responses(
        (status = 200, description = "Customers with that name", body = [Customer]),
        (status = 404, description = "Nobody with that name", body = burgerhaus_types::ErrorBody),
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn customers_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<Customer>>> {
    let mut conn = state.conn().await?;
    let customers = store::customers::by_name(&mut conn, &name)
        .await
        .inspect_err(|e| error!("cannot find customers: {e}"))?;
    if customers.is_empty() {
        return Err(ApiError::not_found("No customer with this name"));
    }
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_fields_trim() {
        let fields = customer_fields(CustomerRequest {
            customer_name: " Ada ".to_string(),
            contact_info: "ada@example.com ".to_string(),
        })
        .unwrap();
        assert_eq!(fields.name, "Ada");
        assert_eq!(fields.contact_info, "ada@example.com");

        let blank = CustomerRequest {
            customer_name: String::new(),
            contact_info: "x".to_string(),
        };
        assert!(customer_fields(blank).is_err());
    }
}
