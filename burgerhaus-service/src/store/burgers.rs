use diesel::{delete, insert_into, prelude::*, QueryResult};
use diesel_async::{
    scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl,
};

use crate::models::{AllergenLink, Burger, IngredientLink, NewBurger};
use crate::schema::{burgers, join_allergens, join_ingredients};
use crate::store::ingredients;

pub async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Burger>> {
    burgers::table
        .select(Burger::as_select())
        .order(burgers::id.asc())
        .load(conn)
        .await
}

pub async fn find(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<Option<Burger>> {
    burgers::table
        .select(Burger::as_select())
        .find(id)
        .first(conn)
        .await
        .optional()
}

pub async fn delete_by_id(conn: &mut AsyncPgConnection, id: i32) -> QueryResult<usize> {
    delete(burgers::table.find(id)).execute(conn).await
}

/// Inserts the burger, resolves every ingredient by name (creating missing
/// ones) and links ingredients and allergens, all in one transaction. Any
/// failing statement rolls the whole burger back.
pub async fn create_with_links(
    conn: &mut AsyncPgConnection,
    burger: NewBurger,
    ingredient_names: Vec<String>,
    allergen_ids: Vec<i32>,
) -> QueryResult<Burger> {
    conn.transaction(|conn| {
        async move {
            let burger = insert_into(burgers::table)
                .values(&burger)
                .returning(Burger::as_returning())
                .get_result(conn)
                .await?;

            for name in &ingredient_names {
                let ingredient_id = ingredients::upsert_by_name(conn, name).await?;
                insert_into(join_ingredients::table)
                    .values(IngredientLink {
                        ingredient_id,
                        burger_id: burger.id,
                    })
                    .execute(conn)
                    .await?;
            }

            for allergen_id in &allergen_ids {
                insert_into(join_allergens::table)
                    .values(AllergenLink {
                        allergen_id: *allergen_id,
                        burger_id: burger.id,
                    })
                    .execute(conn)
                    .await?;
            }

            Ok(burger)
        }
        .scope_boxed()
    })
    .await
}
