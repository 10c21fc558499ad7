use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use burgerhaus_types::{
    reservations::{DiningTable, TableLocation, TableRequest, TableWithStatus},
    MessageResponse,
};
use tracing::{error, info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::models::TableFields;
use crate::store;
use crate::AppState;

use super::{collection, message, JsonBody};

pub fn public_router() -> Router<AppState> {
    let router = collection(Router::new(), "/tables", get(list_tables));
    collection(router, "/tables/with-status", get(tables_with_status))
        .route("/tables/location/{location}", get(tables_by_location))
        .route("/tables/{id}/location", get(table_location))
        .route("/tables/{id}", get(get_table))
}

pub fn admin_router() -> Router<AppState> {
    collection(Router::new(), "/tables", post(add_table))
        .route("/tables/{id}", put(update_table).delete(delete_table))
}

fn table_fields(request: TableRequest) -> ApiResult<TableFields> {
    if request.capacity <= 0 {
        return Err(ApiError::bad_request("Capacity must be positive"));
    }
    let location = request.location.trim();
    if location.is_empty() {
        return Err(ApiError::bad_request("Missing location"));
    }
    Ok(TableFields {
        capacity: request.capacity,
        location: location.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/tables",
    responses((status = 200, description = "All tables", body = [DiningTable])),
    tag = "tables"
)]
#[instrument(skip(state))]
pub async fn list_tables(State(state): State<AppState>) -> ApiResult<Json<Vec<DiningTable>>> {
    let mut conn = state.conn().await?;
    let tables = store::tables::list(&mut conn)
        .await
        .inspect_err(|e| error!("cannot list tables: {e}"))?;
    Ok(Json(tables.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables",
    request_body = TableRequest,
    responses(
        (status = 201, description = "Table created", body = DiningTable),
        (status = 400, description = "Invalid capacity or location", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "tables"
)]
#[instrument(skip(state))]
pub async fn add_table(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TableRequest>,
) -> ApiResult<(StatusCode, Json<DiningTable>)> {
    let fields = table_fields(request)?;
    let mut conn = state.conn().await?;
    let table = store::tables::insert(&mut conn, &fields)
        .await
        .inspect_err(|e| error!("cannot add table: {e}"))?;
    info!(table_id = table.table_id, "added table");
    Ok((StatusCode::CREATED, Json(table.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/{id}",
    params(("id" = i32, Path, description = "Table id")),
    responses(
        (status = 200, description = "The table", body = DiningTable),
        (status = 404, description = "No such table", body = burgerhaus_types::ErrorBody),
    ),
    tag = "tables"
)]
#[instrument(skip(state))]
pub async fn get_table(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<DiningTable>> {
    let mut conn = state.conn().await?;
    let table = store::tables::find(&mut conn, id)
        .await
        .inspect_err(|e| error!("cannot load table: {e}"))?
        .ok_or_else(|| ApiError::not_found("Table not found"))?;
    Ok(Json(table.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/tables/{id}",
    params(("id" = i32, Path, description = "Table id")),
    request_body = TableRequest,
    responses(
        (status = 200, description = "Table updated", body = MessageResponse),
        (status = 404, description = "No such table", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "tables"
)]
#[instrument(skip(state))]
pub async fn update_table(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(request): JsonBody<TableRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let fields = table_fields(request)?;
    let mut conn = state.conn().await?;
    let updated = store::tables::update_by_id(&mut conn, id, &fields)
        .await
        .inspect_err(|e| error!("cannot update table: {e}"))?;
    if updated == 0 {
        return Err(ApiError::not_found("Table not found"));
    }
    Ok(message("Table updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tables/{id}",
    params(("id" = i32, Path, description = "Table id")),
    responses(
        (status = 200, description = "Table deleted", body = MessageResponse),
        (status = 404, description = "No such table", body = burgerhaus_types::ErrorBody),
        (status = 500, description = "Table still has reservations", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "tables"
)]
#[instrument(skip(state))]
pub async fn delete_table(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let mut conn = state.conn().await?;
    let deleted = store::tables::delete_by_id(&mut conn, id)
        .await
        .inspect_err(|e| error!("cannot delete table: {e}"))?;
    if deleted == 0 {
        return Err(ApiError::not_found("Table not found"));
    }
    info!("deleted table");
    Ok(message("Table deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/with-status",
    responses((status = 200, description = "Tables with the status of their latest reservation", body = [TableWithStatus])),
    tag = "tables"
)]
#[instrument(skip(state))]
pub async fn tables_with_status(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TableWithStatus>>> {
    let mut conn = state.conn().await?;
    let tables = store::tables::with_latest_status(&mut conn)
        .await
        .inspect_err(|e| error!("cannot list table statuses: {e}"))?;
    Ok(Json(tables))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/location/{location}",
    params(("location" = String, Path, description = "Location name")),
    responses(
        (status = 200, description = "Tables at the location", body = [DiningTable]),
        (status = 404, description = "No table at the location", body = burgerhaus_types::ErrorBody),
    ),
    tag = "tables"
)]
#[instrument(skip(state))]
pub async fn tables_by_location(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> ApiResult<Json<Vec<DiningTable>>> {
    let mut conn = state.conn().await?;
    let tables = store::tables::by_location(&mut conn, &location)
        .await
        .inspect_err(|e| error!("cannot list tables: {e}"))?;
    if tables.is_empty() {
        return Err(ApiError::not_found("No tables found for this location"));
    }
    Ok(Json(tables.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/{id}/location",
    params(("id" = i32, Path, description = "Table id")),
    responses(
        (status = 200, description = "Where the table stands", body = TableLocation),
        (status = 404, description = "No such table", body = burgerhaus_types::ErrorBody),
    ),
    tag = "tables"
)]
#[instrument(skip(state))]
pub async fn table_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<TableLocation>> {
    let mut conn = state.conn().await?;
    let location = store::tables::location_of(&mut conn, id)
        .await
        .inspect_err(|e| error!("cannot load table location: {e}"))?
        .ok_or_else(|| ApiError::not_found("Table not found"))?;
    Ok(Json(TableLocation {
        table_id: id,
        location,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_fields_validation() {
        let fields = table_fields(TableRequest {
            capacity: 4,
            location: " Terrace ".to_string(),
        })
        .unwrap();
        assert_eq!(fields.location, "Terrace");

        let empty = TableRequest {
            capacity: 4,
            location: "  ".to_string(),
        };
        assert!(matches!(table_fields(empty), Err(ApiError::BadRequest(_))));

        let zero = TableRequest {
            capacity: 0,
            location: "Hall".to_string(),
        };
        assert!(table_fields(zero).is_err());
    }
}
