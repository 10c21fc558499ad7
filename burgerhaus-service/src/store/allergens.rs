use diesel::{prelude::*, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::Allergen;
use crate::schema::{allergens, join_allergens};

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Allergen>> {
    allergens::table
        .select(Allergen::as_select())
        .order(allergens::id.asc())
        .load(conn)
        .await
}

pub async fn for_burger(conn: &mut AsyncPgConnection, burger_id: i32) -> QueryResult<Vec<Allergen>> {
    join_allergens::table
        .inner_join(allergens::table)
        .filter(join_allergens::burger_id.eq(burger_id))
        .select(Allergen::as_select())
        .order(allergens::id.asc())
        .load(conn)
        .await
}
