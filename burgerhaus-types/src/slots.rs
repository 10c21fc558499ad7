use chrono::Timelike;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::reservations::Reservation;

pub const FIRST_SLOT_HOUR: u32 = 8;
pub const LAST_SLOT_HOUR: u32 = 20;

/// Hours offered for reservations, one slot per full hour.
pub fn slot_hours() -> impl Iterator<Item = u32> {
    FIRST_SLOT_HOUR..=LAST_SLOT_HOUR
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Slot {
    pub hour: u32,
    /// `HH:00`
    pub label: String,
    pub reservation: Option<Reservation>,
}

impl Slot {
    pub fn is_free(&self) -> bool {
        self.reservation.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SlotGrid {
    pub slots: Vec<Slot>,
}

impl SlotGrid {
    /// Places each reservation under the slot whose hour equals the hour of its
    /// start time. The first matching reservation wins; starts off the full
    /// hour still land in their hour, starts outside opening hours are not
    /// shown.
    pub fn build(reservations: &[Reservation]) -> Self {
        let slots = slot_hours()
            .map(|hour| Slot {
                hour,
                label: format!("{hour:02}:00"),
                reservation: reservations
                    .iter()
                    .find(|r| r.start_time.hour() == hour)
                    .cloned(),
            })
            .collect();
        SlotGrid { slots }
    }

    pub fn free_hours(&self) -> Vec<u32> {
        self.slots
            .iter()
            .filter(|slot| slot.is_free())
            .map(|slot| slot.hour)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reservation(id: i32, hour: u32, minute: u32) -> Reservation {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        Reservation {
            reservation_id: id,
            table_id: 5,
            customer_id: 1,
            number_of_guests: 2,
            start_time: day.and_hms_opt(hour, minute, 0).unwrap(),
            end_time: day.and_hms_opt(hour + 1, minute, 0).unwrap(),
            status: "Reserved".to_string(),
        }
    }

    #[test]
    fn test_empty_grid_has_thirteen_free_slots() {
        let grid = SlotGrid::build(&[]);
        assert_eq!(grid.slots.len(), 13);
        assert_eq!(grid.slots[0].label, "08:00");
        assert_eq!(grid.slots[12].label, "20:00");
        assert_eq!(grid.free_hours().len(), 13);
    }

    #[test]
    fn test_reservations_match_by_hour() {
        let rows = vec![reservation(1, 10, 0), reservation(2, 10, 0), reservation(3, 14, 30)];
        let grid = SlotGrid::build(&rows);

        let ten = &grid.slots[2];
        assert_eq!(ten.hour, 10);
        assert_eq!(ten.reservation.as_ref().map(|r| r.reservation_id), Some(1));

        let two = &grid.slots[6];
        assert_eq!(two.reservation.as_ref().map(|r| r.reservation_id), Some(3));

        assert_eq!(grid.free_hours().len(), 11);
    }

    #[test]
    fn test_hours_outside_opening_are_ignored() {
        let rows = vec![reservation(1, 7, 0), reservation(2, 21, 0)];
        let grid = SlotGrid::build(&rows);
        assert!(grid.slots.iter().all(Slot::is_free));
    }

    #[test]
    fn test_build_is_deterministic() {
        let rows = vec![reservation(1, 9, 0), reservation(2, 18, 0)];
        assert_eq!(SlotGrid::build(&rows), SlotGrid::build(&rows));
    }
}
