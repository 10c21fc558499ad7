use diesel::{delete, insert_into, prelude::*, update, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{Customer, CustomerFields};
use crate::schema::{customers, reservations};

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Customer>> {
    customers::table
        .select(Customer::as_select())
        .order(customers::customer_id.asc())
        .load(conn)
        .await
}

pub async fn find(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<Option<Customer>> {
    customers::table
        .select(Customer::as_select())
        .find(id)
        .first(conn)
        .await
        .optional()
}

pub async fn by_name(conn: &mut AsyncPgConnection, name: &str) -> QueryResult<Vec<Customer>> {
    customers::table
        .select(Customer::as_select())
        .filter(customers::name.eq(name))
        .order(customers::customer_id.asc())
        .load(conn)
        .await
}

pub async fn insert(conn: &mut AsyncPgConnection, fields: &CustomerFields) -> QueryResult<Customer> {
    insert_into(customers::table)
        .values(fields)
        .returning(Customer::as_returning())
        .get_result(conn)
        .await
}

pub async fn update_by_id(
    conn: &mut AsyncPgConnection,
    id: i32,
    fields: &CustomerFields,
) -> QueryResult<usize> {
    update(customers::table.find(id))
        .set(fields)
        .execute(conn)
        .await
}

pub async fn delete_by_id(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<usize> {
    delete(customers::table.find(id)).execute(conn).await
}

pub async fn for_reservation(
    conn: &mut AsyncPgConnection,
    reservation_id: i32,
) -> QueryResult<Option<Customer>> {
    reservations::table
        .inner_join(customers::table)
        .filter(reservations::reservation_id.eq(reservation_id))
        .select(Customer::as_select())
        .first(conn)
        .await
        .optional()
}
