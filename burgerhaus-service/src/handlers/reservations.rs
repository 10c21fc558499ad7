use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use burgerhaus_types::{
    reservations::{
        Customer, DateQuery, GuestCountUpdate, NewReservationRequest, Reservation,
        ReservationCreated, DEFAULT_RESERVATION_STATUS,
    },
    slots::SlotGrid,
    MessageResponse,
};
use chrono::NaiveDate;
use tracing::{error, info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::models::NewReservation;
use crate::store;
use crate::AppState;

use super::{collection, message, JsonBody};

pub fn public_router() -> Router<AppState> {
    collection(
        Router::new(),
        "/reservations",
        get(list_reservations).post(add_reservation),
    )
    .route(
        "/reservations/customer/{reservation_id}",
        get(customer_for_reservation),
    )
    .route("/reservations/{id}/slots", get(slots_for_table))
    .route(
        "/reservations/{id}",
        get(reservations_for_table)
            .put(update_reservation)
            .delete(delete_reservation),
    )
}

fn required_date(query: Result<Query<DateQuery>, QueryRejection>) -> ApiResult<NaiveDate> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    query
        .date
        .ok_or_else(|| ApiError::bad_request("Missing date parameter"))
}

fn new_reservation(request: NewReservationRequest) -> ApiResult<NewReservation> {
    request.validate().map_err(ApiError::BadRequest)?;
    let status = request
        .status
        .as_deref()
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .unwrap_or(DEFAULT_RESERVATION_STATUS)
        .to_string();
    Ok(NewReservation {
        table_id: request.table_id,
        customer_id: request.customer_id,
        number_of_guests: request.number_of_guests,
        start_time: request.start_time,
        end_time: request.end_time,
        status,
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    responses((status = 200, description = "All reservations", body = [Reservation])),
    tag = "reservations"
)]
#[instrument(skip(state))]
pub async fn list_reservations(State(state): State<AppState>) -> ApiResult<Json<Vec<Reservation>>> {
    let mut conn = state.conn().await?;
    let reservations = store::reservations::list(&mut conn)
        .await
        .inspect_err(|e| error!("cannot list reservations: {e}"))?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

/// Books a table. Overlapping bookings of the same table are not rejected.
#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    request_body = NewReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ReservationCreated),
        (status = 400, description = "Invalid guest count or time range", body = burgerhaus_types::ErrorBody),
        (status = 500, description = "Unknown table or customer", body = burgerhaus_types::ErrorBody),
    ),
    tag = "reservations"
)]
#[instrument(skip(state))]
pub async fn add_reservation(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NewReservationRequest>,
) -> ApiResult<(StatusCode, Json<ReservationCreated>)> {
    let reservation = new_reservation(request)?;
    let mut conn = state.conn().await?;
    let reservation = store::reservations::insert(&mut conn, &reservation)
        .await
        .inspect_err(|e| error!("cannot add reservation: {e}"))?;
    info!(
        reservation_id = reservation.reservation_id,
        table_id = reservation.table_id,
        "added reservation"
    );
    Ok((
        StatusCode::CREATED,
        Json(ReservationCreated {
            reservation_id: reservation.reservation_id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    params(("id" = i32, Path, description = "Reservation id")),
    request_body = GuestCountUpdate,
    responses(
        (status = 200, description = "Guest count updated", body = MessageResponse),
        (status = 400, description = "Missing or invalid guest count", body = burgerhaus_types::ErrorBody),
        (status = 404, description = "No such reservation", body = burgerhaus_types::ErrorBody),
    ),
    tag = "reservations"
)]
#[instrument(skip(state))]
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(update): JsonBody<GuestCountUpdate>,
) -> ApiResult<Json<MessageResponse>> {
    let guests = update
        .number_of_guests
        .ok_or_else(|| ApiError::bad_request("Missing number_of_guests"))?;
    if guests <= 0 {
        return Err(ApiError::bad_request("number_of_guests must be positive"));
    }
    let mut conn = state.conn().await?;
    let updated = store::reservations::update_guest_count(&mut conn, id, guests)
        .await
        .inspect_err(|e| error!("cannot update reservation: {e}"))?;
    if updated == 0 {
        return Err(ApiError::not_found("Reservation not found"));
    }
    Ok(message("Reservation updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    params(("id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation deleted", body = MessageResponse),
        (status = 404, description = "No such reservation", body = burgerhaus_types::ErrorBody),
    ),
    tag = "reservations"
)]
#[instrument(skip(state))]
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    let mut conn = state.conn().await?;
    let deleted = store::reservations::delete_by_id(&mut conn, id)
        .await
        .inspect_err(|e| error!("cannot delete reservation: {e}"))?;
    if deleted == 0 {
        return Err(ApiError::not_found("Reservation not found"));
    }
    info!("deleted reservation");
    Ok(message("Reservation deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    params(
        ("id" = i32, Path, description = "Table id"),
        ("date" = String, Query, description = "Day to look at"),
    ),
    responses(
        (status = 200, description = "Reservations of the table starting that day", body = [Reservation]),
        (status = 400, description = "Missing or malformed date", body = burgerhaus_types::ErrorBody),
    ),
    tag = "reservations"
)]
#[instrument(skip(state))]
pub async fn reservations_for_table(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Reservation>>> {
    let date = required_date(query)?;
    let mut conn = state.conn().await?;
    let reservations = store::reservations::for_table_on(&mut conn, table_id, date)
        .await
        .inspect_err(|e| error!("cannot list reservations: {e}"))?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

/// The hourly 08:00 to 20:00 grid of a table for one day.
#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}/slots",
    params(
        ("id" = i32, Path, description = "Table id"),
        ("date" = String, Query, description = "Day to look at"),
    ),
    responses(
        (status = 200, description = "One slot per opening hour", body = SlotGrid),
        (status = 400, description = "Missing or malformed date", body = burgerhaus_types::ErrorBody),
    ),
    tag = "reservations"
)]
#[instrument(skip(state))]
pub async fn slots_for_table(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Json<SlotGrid>> {
    let date = required_date(query)?;
    let mut conn = state.conn().await?;
    let reservations: Vec<Reservation> = store::reservations::for_table_on(&mut conn, table_id, date)
        .await
        .inspect_err(|e| error!("cannot list reservations: {e}"))?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(SlotGrid::build(&reservations)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/customer/{reservation_id}",
    params(("reservation_id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Customer holding the reservation", body = Customer),
        (status = 404, description = "No such reservation", body = burgerhaus_types::ErrorBody),
    ),
    tag = "reservations"
)]
#[instrument(skip(state))]
pub async fn customer_for_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<i32>,
) -> ApiResult<Json<Customer>> {
    let mut conn = state.conn().await?;
    let customer = store::customers::for_reservation(&mut conn, reservation_id)
        .await
        .inspect_err(|e| error!("cannot load customer: {e}"))?
        .ok_or_else(|| ApiError::not_found("No customer found for this reservation"))?;
    Ok(Json(customer.into()))
}

#[cfg(test)]
mod tests {
    use burgerhaus_types::dates::parse_datetime;

    use super::*;

    fn request(status: Option<&str>) -> NewReservationRequest {
        NewReservationRequest {
            table_id: 1,
            customer_id: 2,
            number_of_guests: 4,
            start_time: parse_datetime("2024-06-01T18:00").unwrap(),
            end_time: parse_datetime("2024-06-01T20:00").unwrap(),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_new_reservation_default_status() {
        assert_eq!(new_reservation(request(None)).unwrap().status, "Reserved");
        assert_eq!(new_reservation(request(Some(" "))).unwrap().status, "Reserved");
        assert_eq!(
            new_reservation(request(Some("Seated"))).unwrap().status,
            "Seated"
        );
    }

    #[test]
    fn test_new_reservation_rejects_reversed_range() {
        let mut reversed = request(None);
        std::mem::swap(&mut reversed.start_time, &mut reversed.end_time);
        assert!(matches!(
            new_reservation(reversed),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_required_date() {
        let missing: Result<Query<DateQuery>, QueryRejection> =
            Ok(Query(DateQuery { date: None }));
        assert!(required_date(missing).is_err());

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let given: Result<Query<DateQuery>, QueryRejection> =
            Ok(Query(DateQuery { date: Some(date) }));
        assert_eq!(required_date(given).unwrap(), date);
    }
}
