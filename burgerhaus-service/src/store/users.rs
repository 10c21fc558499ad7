use diesel::{delete, insert_into, prelude::*, update, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{NewUser, User};
use crate::schema::users;

/// One column of a profile update.
#[derive(Debug, Clone, PartialEq)]
pub enum UserField {
    Firstname(String),
    Lastname(String),
    Address(String),
    Cardnumber(String),
    PhoneNumber(String),
    Email(String),
    /// Already hashed
    Password(String),
}

impl UserField {
    pub fn column_name(&self) -> &'static str {
        match self {
            UserField::Firstname(_) => "firstname",
            UserField::Lastname(_) => "lastname",
            UserField::Address(_) => "address",
            UserField::Cardnumber(_) => "cardnumber",
            UserField::PhoneNumber(_) => "phone_number",
            UserField::Email(_) => "email",
            UserField::Password(_) => "password",
        }
    }
}

pub async fn find_by_username(
    conn: &mut AsyncPgConnection,
    username: &str,
) -> QueryResult<Option<User>> {
    users::table
        .select(User::as_select())
        .filter(users::username.eq(username))
        .first(conn)
        .await
        .optional()
}

pub async fn insert(conn: &mut AsyncPgConnection, user: &NewUser) -> QueryResult<User> {
    insert_into(users::table)
        .values(user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

pub async fn update_avatar(
    conn: &mut AsyncPgConnection,
    username: &str,
    avatar: &str,
) -> QueryResult<usize> {
    update(users::table.filter(users::username.eq(username)))
        .set(users::avatar.eq(avatar))
        .execute(conn)
        .await
}

pub async fn update_field(
    conn: &mut AsyncPgConnection,
    username: &str,
    field: &UserField,
) -> QueryResult<usize> {
    let target = users::table.filter(users::username.eq(username));
    let query = update(target);
    match field {
        UserField::Firstname(v) => query.set(users::firstname.eq(v)).execute(conn).await,
        UserField::Lastname(v) => query.set(users::lastname.eq(v)).execute(conn).await,
        UserField::Address(v) => query.set(users::address.eq(v)).execute(conn).await,
        UserField::Cardnumber(v) => query.set(users::cardnumber.eq(v)).execute(conn).await,
        UserField::PhoneNumber(v) => query.set(users::phone_number.eq(v)).execute(conn).await,
        UserField::Email(v) => query.set(users::email.eq(v)).execute(conn).await,
        UserField::Password(v) => query.set(users::password.eq(v)).execute(conn).await,
    }
}

pub async fn delete_by_username(conn: &mut AsyncPgConnection, username: &str) -> QueryResult<usize> {
    delete(users::table.filter(users::username.eq(username)))
        .execute(conn)
        .await
}
