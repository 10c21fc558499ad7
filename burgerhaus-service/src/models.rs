use std::io::Write;

use bigdecimal::BigDecimal;
use burgerhaus_types::{catalog, reservations, users::Role, users::UserInfo};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::{
    deserialize::FromSql, deserialize::FromSqlRow, expression::AsExpression, prelude::*,
    serialize::ToSql,
};

use crate::schema::{
    allergens, burgers, customers, dining_tables, ingredients, join_allergens, join_ingredients,
    menu, order_items, orders, reservations as reservations_table, special_offers, users,
};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub address: Option<String>,
    pub role: UserRole,
    pub cardnumber: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            user_id: user.id,
            username: user.username,
            avatar: user.avatar,
            firstname: user.firstname,
            lastname: user.lastname,
            address: user.address,
            phone: user.phone_number,
            email: user.email,
            role: user.role.into(),
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub address: Option<String>,
    pub role: UserRole,
    pub cardnumber: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

#[derive(FromSqlRow, AsExpression, PartialEq, Eq, Hash, Copy, Clone, Debug)]
#[diesel(sql_type = crate::schema::sql_types::UserRole)]
pub enum UserRole {
    Guest,
    Admin,
}

impl ToSql<crate::schema::sql_types::UserRole, diesel::pg::Pg> for UserRole {
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, diesel::pg::Pg>,
    ) -> diesel::serialize::Result {
        match *self {
            UserRole::Guest => out.write_all(b"GUEST")?,
            UserRole::Admin => out.write_all(b"ADMIN")?,
        }
        Ok(diesel::serialize::IsNull::No)
    }
}

impl FromSql<crate::schema::sql_types::UserRole, diesel::pg::Pg> for UserRole {
    fn from_sql(bytes: diesel::pg::PgValue<'_>) -> diesel::deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"GUEST" => Ok(UserRole::Guest),
            b"ADMIN" => Ok(UserRole::Admin),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Guest => Role::Guest,
            UserRole::Admin => Role::Admin,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Guest => UserRole::Guest,
            Role::Admin => UserRole::Admin,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = burgers)]
pub struct Burger {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub filename: Option<String>,
}

impl From<Burger> for catalog::Burger {
    fn from(burger: Burger) -> Self {
        catalog::Burger {
            id: burger.id,
            name: burger.name,
            description: burger.description,
            price: burger.price,
            filename: burger.filename,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = burgers)]
pub struct NewBurger {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub filename: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = ingredients)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
}

impl From<Ingredient> for catalog::Ingredient {
    fn from(ingredient: Ingredient) -> Self {
        catalog::Ingredient {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = allergens)]
pub struct Allergen {
    pub id: i32,
    pub acronym: String,
    pub description: String,
}

impl From<Allergen> for catalog::Allergen {
    fn from(allergen: Allergen) -> Self {
        catalog::Allergen {
            id: allergen.id,
            acronym: allergen.acronym,
            description: allergen.description,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = join_ingredients)]
pub struct IngredientLink {
    pub ingredient_id: i32,
    pub burger_id: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = join_allergens)]
pub struct AllergenLink {
    pub allergen_id: i32,
    pub burger_id: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = menu)]
pub struct MenuEntry {
    pub id: i32,
    pub burger_id: i32,
    pub date: NaiveDate,
}

impl From<MenuEntry> for catalog::MenuEntry {
    fn from(entry: MenuEntry) -> Self {
        catalog::MenuEntry {
            id: entry.id,
            burger_id: entry.burger_id,
            date: entry.date,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = menu)]
pub struct NewMenuEntry {
    pub burger_id: i32,
    pub date: NaiveDate,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = special_offers)]
pub struct SpecialOffer {
    pub id: i32,
    pub offer_name: String,
    pub description: String,
    pub price: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub burger_id: Option<i32>,
    pub filename: Option<String>,
}

impl From<SpecialOffer> for catalog::SpecialOffer {
    fn from(offer: SpecialOffer) -> Self {
        catalog::SpecialOffer {
            id: offer.id,
            offer_name: offer.offer_name,
            description: offer.description,
            price: offer.price,
            start_date: offer.start_date,
            end_date: offer.end_date,
            burger_id: offer.burger_id,
            filename: offer.filename,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = special_offers)]
pub struct NewSpecialOffer {
    pub offer_name: String,
    pub description: String,
    pub price: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub burger_id: Option<i32>,
    pub filename: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = dining_tables, primary_key(table_id))]
pub struct DiningTable {
    pub table_id: i32,
    pub capacity: i32,
    pub location: String,
}

impl From<DiningTable> for reservations::DiningTable {
    fn from(table: DiningTable) -> Self {
        reservations::DiningTable {
            table_id: table.table_id,
            capacity: table.capacity,
            location: table.location,
        }
    }
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = dining_tables)]
pub struct TableFields {
    pub capacity: i32,
    pub location: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = customers, primary_key(customer_id))]
pub struct Customer {
    pub customer_id: i32,
    pub name: String,
    pub contact_info: String,
}

impl From<Customer> for reservations::Customer {
    fn from(customer: Customer) -> Self {
        reservations::Customer {
            customer_id: customer.customer_id,
            name: customer.name,
            contact_info: customer.contact_info,
        }
    }
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = customers)]
pub struct CustomerFields {
    pub name: String,
    pub contact_info: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = reservations_table, primary_key(reservation_id))]
pub struct Reservation {
    pub reservation_id: i32,
    pub table_id: i32,
    pub customer_id: i32,
    pub number_of_guests: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: String,
}

impl From<Reservation> for reservations::Reservation {
    fn from(r: Reservation) -> Self {
        reservations::Reservation {
            reservation_id: r.reservation_id,
            table_id: r.table_id,
            customer_id: r.customer_id,
            number_of_guests: r.number_of_guests,
            start_time: r.start_time,
            end_time: r.end_time,
            status: r.status,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = reservations_table)]
pub struct NewReservation {
    pub table_id: i32,
    pub customer_id: i32,
    pub number_of_guests: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: String,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(User))]
#[diesel(table_name = orders)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub status: String,
    pub created_on: NaiveDate,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub user_id: i32,
    pub status: String,
    pub created_on: NaiveDate,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub burger_id: i32,
    pub quantity: i32,
}
