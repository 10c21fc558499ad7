use chrono::NaiveDate;
use diesel::{insert_into, prelude::*, QueryResult};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{NewSpecialOffer, SpecialOffer};
use crate::schema::special_offers;

pub const OFFERS_SHOWN: i64 = 3;

pub async fn insert(
    conn: &mut AsyncPgConnection,
    offer: &NewSpecialOffer,
) -> QueryResult<SpecialOffer> {
    insert_into(special_offers::table)
        .values(offer)
        .returning(SpecialOffer::as_returning())
        .get_result(conn)
        .await
}

/// Offers still running on `date`, earliest start first.
pub async fn from_date(
    conn: &mut AsyncPgConnection,
    date: NaiveDate,
) -> QueryResult<Vec<SpecialOffer>> {
    special_offers::table
        .select(SpecialOffer::as_select())
        .filter(special_offers::end_date.ge(date))
        .order((special_offers::start_date.asc(), special_offers::id.asc()))
        .limit(OFFERS_SHOWN)
        .load(conn)
        .await
}
