use std::collections::HashMap;

use burgerhaus_types::reservations::TableWithStatus;
use diesel::{delete, insert_into, prelude::*, update, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{DiningTable, TableFields};
use crate::schema::{dining_tables, reservations};

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<DiningTable>> {
    dining_tables::table
        .select(DiningTable::as_select())
        .order(dining_tables::table_id.asc())
        .load(conn)
        .await
}

pub async fn find(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<Option<DiningTable>> {
    dining_tables::table
        .select(DiningTable::as_select())
        .find(id)
        .first(conn)
        .await
        .optional()
}

pub async fn insert(conn: &mut AsyncPgConnection, fields: &TableFields) -> QueryResult<DiningTable> {
    insert_into(dining_tables::table)
        .values(fields)
        .returning(DiningTable::as_returning())
        .get_result(conn)
        .await
}

pub async fn update_by_id(
    conn: &mut AsyncPgConnection,
    id: i32,
    fields: &TableFields,
) -> QueryResult<usize> {
    update(dining_tables::table.find(id))
        .set(fields)
        .execute(conn)
        .await
}

pub async fn delete_by_id(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<usize> {
    delete(dining_tables::table.find(id)).execute(conn).await
}

pub async fn by_location(
    conn: &mut AsyncPgConnection,
    location: &str,
) -> QueryResult<Vec<DiningTable>> {
    dining_tables::table
        .select(DiningTable::as_select())
        .filter(dining_tables::location.eq(location))
        .order(dining_tables::table_id.asc())
        .load(conn)
        .await
}

pub async fn location_of(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<Option<String>> {
    dining_tables::table
        .select(dining_tables::location)
        .find(id)
        .first(conn)
        .await
        .optional()
}

/// Every table with the status of its latest reservation. Tables reserved
/// most recently come first; tables never reserved come last.
pub async fn with_latest_status(conn: &mut AsyncPgConnection) -> QueryResult<Vec<TableWithStatus>> {
    let latest: HashMap<i32, (i32, String)> = reservations::table
        .distinct_on(reservations::table_id)
        .order((reservations::table_id, reservations::reservation_id.desc()))
        .select((
            reservations::table_id,
            reservations::reservation_id,
            reservations::status,
        ))
        .load::<(i32, i32, String)>(conn)
        .await?
        .into_iter()
        .map(|(table_id, reservation_id, status)| (table_id, (reservation_id, status)))
        .collect();

    let mut rows: Vec<(Option<i32>, TableWithStatus)> = list(conn)
        .await?
        .into_iter()
        .map(|table| {
            let latest = latest.get(&table.table_id);
            (
                latest.map(|(reservation_id, _)| *reservation_id),
                TableWithStatus {
                    table_id: table.table_id,
                    capacity: table.capacity,
                    location: table.location,
                    status: latest.map(|(_, status)| status.clone()),
                },
            )
        })
        .collect();
    rows.sort_by(|(a, ta), (b, tb)| b.cmp(a).then(ta.table_id.cmp(&tb.table_id)));

    Ok(rows.into_iter().map(|(_, table)| table).collect())
}
