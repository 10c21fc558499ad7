use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status given to reservations created without one.
pub const DEFAULT_RESERVATION_STATUS: &str = "Reserved";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DiningTable {
    pub table_id: i32,
    pub capacity: i32,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableRequest {
    pub capacity: i32,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TableWithStatus {
    pub table_id: i32,
    pub capacity: i32,
    pub location: String,
    /// Status of the most recent reservation, `None` if never reserved
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TableLocation {
    pub table_id: i32,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub customer_id: i32,
    pub name: String,
    pub contact_info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerRequest {
    pub customer_name: String,
    pub contact_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub reservation_id: i32,
    pub table_id: i32,
    pub customer_id: i32,
    pub number_of_guests: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewReservationRequest {
    pub table_id: i32,
    pub customer_id: i32,
    pub number_of_guests: i32,
    #[serde(deserialize_with = "crate::dates::deserialize_datetime")]
    #[schema(value_type = String)]
    pub start_time: NaiveDateTime,
    #[serde(deserialize_with = "crate::dates::deserialize_datetime")]
    #[schema(value_type = String)]
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub status: Option<String>,
}

impl NewReservationRequest {
    /// Shape checks done before touching the database. Overlap with other
    /// reservations is not checked.
    pub fn validate(&self) -> Result<(), String> {
        if self.number_of_guests <= 0 {
            return Err("number_of_guests must be positive".to_string());
        }
        if self.end_time <= self.start_time {
            return Err("end_time must be after start_time".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReservationCreated {
    pub reservation_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GuestCountUpdate {
    pub number_of_guests: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DateQuery {
    #[serde(default, deserialize_with = "crate::dates::deserialize_optional_date")]
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(guests: i32, start: &str, end: &str) -> NewReservationRequest {
        serde_json::from_value(serde_json::json!({
            "table_id": 5,
            "customer_id": 1,
            "number_of_guests": guests,
            "start_time": start,
            "end_time": end,
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_reservation() {
        assert!(request(4, "2024-06-01T10:00", "2024-06-01T12:00").validate().is_ok());
        assert!(request(0, "2024-06-01T10:00", "2024-06-01T12:00").validate().is_err());
        assert!(request(2, "2024-06-01T12:00", "2024-06-01T12:00").validate().is_err());
    }

    #[test]
    fn test_status_defaults_to_none() {
        let req = request(2, "2024-06-01T10:00", "2024-06-01T11:00");
        assert_eq!(req.status, None);
    }

    #[test]
    fn test_date_query_empty_is_none() {
        let query: DateQuery = serde_json::from_str(r#"{"date": ""}"#).unwrap();
        assert_eq!(query.date, None);
        let query: DateQuery = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(query.date, None);
    }
}
