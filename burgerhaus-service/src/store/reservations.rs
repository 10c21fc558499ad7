use chrono::{NaiveDate, TimeDelta};
use diesel::{delete, insert_into, prelude::*, update, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{NewReservation, Reservation};
use crate::schema::reservations;

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Reservation>> {
    reservations::table
        .select(Reservation::as_select())
        .order(reservations::reservation_id.asc())
        .load(conn)
        .await
}

pub async fn insert(
    conn: &mut AsyncPgConnection,
    reservation: &NewReservation,
) -> QueryResult<Reservation> {
    insert_into(reservations::table)
        .values(reservation)
        .returning(Reservation::as_returning())
        .get_result(conn)
        .await
}

pub async fn update_guest_count(
    conn: &mut AsyncPgConnection,
    id: i32,
    number_of_guests: i32,
) -> QueryResult<usize> {
    update(reservations::table.find(id))
        .set(reservations::number_of_guests.eq(number_of_guests))
        .execute(conn)
        .await
}

pub async fn delete_by_id(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<usize> {
    delete(reservations::table.find(id)).execute(conn).await
}

/// Reservations of a table starting on `date`, in start order.
pub async fn for_table_on(
    conn: &mut AsyncPgConnection,
    table_id: i32,
    date: NaiveDate,
) -> QueryResult<Vec<Reservation>> {
    let day_start = date.and_time(chrono::NaiveTime::MIN);
    let day_end = day_start + TimeDelta::days(1);
    reservations::table
        .select(Reservation::as_select())
        .filter(reservations::table_id.eq(table_id))
        .filter(reservations::start_time.ge(day_start))
        .filter(reservations::start_time.lt(day_end))
        .order((reservations::start_time.asc(), reservations::reservation_id.asc()))
        .load(conn)
        .await
}
