use chrono::NaiveDate;
use diesel::{insert_into, prelude::*, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{MenuEntry, NewMenuEntry};
use crate::schema::menu;

pub async fn insert(conn: &mut AsyncPgConnection, entry: &NewMenuEntry) -> QueryResult<MenuEntry> {
    insert_into(menu::table)
        .values(entry)
        .returning(MenuEntry::as_returning())
        .get_result(conn)
        .await
}

pub async fn by_date(conn: &mut AsyncPgConnection, date: NaiveDate) -> QueryResult<Vec<MenuEntry>> {
    menu::table
        .select(MenuEntry::as_select())
        .filter(menu::date.eq(date))
        .order(menu::id.asc())
        .load(conn)
        .await
}
