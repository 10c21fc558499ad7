use burgerhaus_types::{
    reservations::{CustomerRequest, NewReservationRequest, ReservationCreated},
    slots::{SlotGrid, FIRST_SLOT_HOUR, LAST_SLOT_HOUR},
};
use chrono::{NaiveDate, TimeDelta};
use tracing::info;

use crate::api::ApiClient;
use crate::error::{WebError, WebResult};

/// Status of reservations booked from the slot grid.
pub const BOOKED_STATUS: &str = "Confirmed";

/// Table and day the reservation screen is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSelection {
    pub table_id: i32,
    pub date: NaiveDate,
}

impl GridSelection {
    pub fn new(table_id: i32, date: NaiveDate) -> Self {
        Self { table_id, date }
    }

    /// The same table `days` days later (or earlier).
    pub fn shift(self, days: i64) -> Self {
        Self {
            date: self.date + TimeDelta::days(days),
            ..self
        }
    }

    pub async fn load(&self, api: &ApiClient) -> WebResult<SlotGrid> {
        api.slots_for_table(self.table_id, self.date).await
    }
}

/// One-hour reservation of the selected table starting at `hour`.
pub fn slot_reservation(
    selection: GridSelection,
    customer_id: i32,
    number_of_guests: i32,
    hour: u32,
) -> WebResult<NewReservationRequest> {
    if !(FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&hour) {
        return Err(WebError::BadRequest(format!("{hour}:00 is not a bookable slot")));
    }
    let start_time = selection
        .date
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| WebError::BadRequest(format!("invalid hour {hour}")))?;
    Ok(NewReservationRequest {
        table_id: selection.table_id,
        customer_id,
        number_of_guests,
        start_time,
        end_time: start_time + TimeDelta::hours(1),
        status: Some(BOOKED_STATUS.to_string()),
    })
}

/// Registers the customer and books the slot for them.
pub async fn book_slot(
    api: &ApiClient,
    selection: GridSelection,
    hour: u32,
    customer: &CustomerRequest,
    number_of_guests: i32,
) -> WebResult<ReservationCreated> {
    if number_of_guests <= 0 {
        return Err(WebError::BadRequest(
            "number of guests must be positive".to_string(),
        ));
    }
    let customer = api.add_customer(customer).await?;
    let request = slot_reservation(selection, customer.customer_id, number_of_guests, hour)?;
    let created = api.add_reservation(&request).await?;
    info!(
        reservation_id = created.reservation_id,
        table_id = selection.table_id,
        hour,
        "slot booked"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> GridSelection {
        GridSelection::new(3, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_slot_reservation_lasts_one_hour() {
        let request = slot_reservation(selection(), 9, 2, 18).unwrap();
        assert_eq!(request.start_time.to_string(), "2024-06-01 18:00:00");
        assert_eq!(request.end_time.to_string(), "2024-06-01 19:00:00");
        assert_eq!(request.status.as_deref(), Some("Confirmed"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_slot_reservation_rejects_closed_hours() {
        assert!(slot_reservation(selection(), 9, 2, 7).is_err());
        assert!(slot_reservation(selection(), 9, 2, 21).is_err());
        assert!(slot_reservation(selection(), 9, 2, 20).is_ok());
    }

    #[test]
    fn test_shift_crosses_months() {
        let next = selection().shift(-1);
        assert_eq!(next.date, NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert_eq!(next.table_id, 3);
    }
}
