use diesel::{insert_into, prelude::*, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::Ingredient;
use crate::schema::ingredients;

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Ingredient>> {
    ingredients::table
        .select(Ingredient::as_select())
        .order(ingredients::id.asc())
        .load(conn)
        .await
}

/// Id of the ingredient called `name`, inserting it first if needed.
pub async fn upsert_by_name(conn: &mut AsyncPgConnection, name: &str) -> QueryResult<i32> {
    insert_into(ingredients::table)
        .values(ingredients::name.eq(name))
        .on_conflict(ingredients::name)
        .do_nothing()
        .execute(conn)
        .await?;
    ingredients::table
        .select(ingredients::id)
        .filter(ingredients::name.eq(name))
        .first(conn)
        .await
}
