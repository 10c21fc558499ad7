use burgerhaus_types::orders::{ActiveOrderRow, OrderHistoryRow, STATUS_DONE};
use chrono::NaiveDate;
use diesel::{insert_into, prelude::*, update, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{NewOrder, NewOrderItem};
use crate::schema::{burgers, order_items, orders, users};

pub async fn create(conn: &mut AsyncPgConnection, order: &NewOrder) -> QueryResult<i32> {
    insert_into(orders::table)
        .values(order)
        .returning(orders::id)
        .get_result(conn)
        .await
}

pub async fn add_item(conn: &mut AsyncPgConnection, item: &NewOrderItem) -> QueryResult<usize> {
    insert_into(order_items::table)
        .values(item)
        .execute(conn)
        .await
}

pub async fn history_for_username(
    conn: &mut AsyncPgConnection,
    username: &str,
) -> QueryResult<Vec<OrderHistoryRow>> {
    let rows = order_items::table
        .inner_join(burgers::table)
        .inner_join(orders::table.inner_join(users::table))
        .filter(users::username.eq(username))
        .order((orders::id.asc(), order_items::id.asc()))
        .select((
            burgers::name,
            order_items::quantity,
            orders::created_on,
            orders::status,
            orders::id,
        ))
        .load::<(String, i32, NaiveDate, String, i32)>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(name, quantity, date, status, order_id)| OrderHistoryRow {
            name,
            quantity,
            date,
            status,
            order_id,
        })
        .collect())
}

/// Item rows of every order that is not done, with the ordering user's
/// delivery data.
pub async fn active(conn: &mut AsyncPgConnection) -> QueryResult<Vec<ActiveOrderRow>> {
    let rows = order_items::table
        .inner_join(burgers::table)
        .inner_join(orders::table.inner_join(users::table))
        .filter(orders::status.ne(STATUS_DONE))
        .order((orders::id.asc(), order_items::id.asc()))
        .select((
            orders::id,
            burgers::name,
            order_items::quantity,
            users::firstname,
            users::lastname,
            users::address,
            users::phone_number,
            orders::created_on,
            orders::status,
        ))
        .load::<(
            i32,
            String,
            i32,
            String,
            String,
            Option<String>,
            Option<String>,
            NaiveDate,
            String,
        )>(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(
            |(order_id, name, quantity, firstname, lastname, address, phone_number, date, status)| {
                ActiveOrderRow {
                    order_id,
                    name,
                    quantity,
                    firstname,
                    lastname,
                    address,
                    phone_number,
                    date,
                    status,
                }
            },
        )
        .collect())
}

pub async fn update_status(
    conn: &mut AsyncPgConnection,
    order_id: i32,
    status: &str,
) -> QueryResult<usize> {
    update(orders::table.find(order_id))
        .set(orders::status.eq(status))
        .execute(conn)
        .await
}

pub async fn owner_of(conn: &mut AsyncPgConnection, order_id: i32) -> QueryResult<Option<i32>> {
    orders::table
        .select(orders::user_id)
        .find(order_id)
        .first(conn)
        .await
        .optional()
}
