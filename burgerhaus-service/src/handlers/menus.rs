use axum::{
    extract::{rejection::QueryRejection, Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use burgerhaus_types::{
    catalog::{MenuEntry, NewMenuEntry, SpecialOffer},
    dates::parse_date,
    reservations::DateQuery,
};
use chrono::Local;
use tracing::{error, info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::models::{self, NewSpecialOffer};
use crate::store;
use crate::uploads::{MultipartForm, SPECIALS_DIR};
use crate::AppState;

use super::{burgers::parse_price, collection, JsonBody};

pub const IMAGE_FIELD: &str = "special-offer-upload-name";

pub fn public_router() -> Router<AppState> {
    collection(Router::new(), "/special_offers", get(get_offers_from_date))
        .route("/menus/{date}", get(get_menu_by_date))
}

pub fn admin_router() -> Router<AppState> {
    let router = collection(Router::new(), "/menus", post(add_menu_item));
    collection(router, "/special_offers", post(add_special_offer))
}

#[utoipa::path(
    post,
    path = "/api/v1/menus",
    request_body = NewMenuEntry,
    responses(
        (status = 201, description = "Burger scheduled", body = MenuEntry),
        (status = 400, description = "Malformed body or date", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "menus"
)]
#[instrument(skip(state))]
pub async fn add_menu_item(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewMenuEntry>,
) -> ApiResult<(StatusCode, Json<MenuEntry>)> {
    let entry = models::NewMenuEntry {
        burger_id: payload.burger_id,
        date: payload.date,
    };
    let mut conn = state.conn().await?;
    let entry = store::menus::insert(&mut conn, &entry)
        .await
        .inspect_err(|e| error!("cannot add menu entry: {e}"))?;
    info!(menu_id = entry.id, "scheduled burger");
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/menus/{date}",
    params(("date" = String, Path, description = "`YYYY-MM-DD` or `DD.MM.YYYY`")),
    responses(
        (status = 200, description = "Burgers scheduled on the date", body = [MenuEntry]),
        (status = 400, description = "Malformed date", body = burgerhaus_types::ErrorBody),
    ),
    tag = "menus"
)]
#[instrument(skip(state))]
pub async fn get_menu_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Json<Vec<MenuEntry>>> {
    let date = parse_date(&date)?;
    let mut conn = state.conn().await?;
    let entries = store::menus::by_date(&mut conn, date)
        .await
        .inspect_err(|e| error!("cannot load menu: {e}"))?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

fn offer_from(form: &MultipartForm) -> ApiResult<NewSpecialOffer> {
    let start_date = parse_date(form.required("special-offer-start-date")?)?;
    let end_date = parse_date(form.required("special-offer-end-date")?)?;
    if end_date < start_date {
        return Err(ApiError::bad_request("Offer ends before it starts"));
    }
    let burger_id = form
        .text("special-offer-burger")
        .map(|id| {
            id.parse::<i32>()
                .map_err(|_| ApiError::bad_request(format!("Invalid burger id `{id}`")))
        })
        .transpose()?;
    Ok(NewSpecialOffer {
        offer_name: form.required("special-offer-name")?.to_string(),
        description: form
            .text("special-offer-description")
            .unwrap_or_default()
            .to_string(),
        price: parse_price(form.required("special-offer-price")?)?,
        start_date,
        end_date,
        burger_id,
        filename: None,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/special_offers",
    request_body(content = String, description = "Multipart special offer form", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Offer created", body = SpecialOffer),
        (status = 400, description = "Missing or malformed field", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "menus"
)]
#[instrument(skip_all)]
pub async fn add_special_offer(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<SpecialOffer>)> {
    let mut form = MultipartForm::read(multipart, IMAGE_FIELD).await?;
    let mut offer = offer_from(&form)?;
    if let Some(file) = form.take_file() {
        offer.filename = Some(state.uploads.save(Some(SPECIALS_DIR), &file).await?);
    }

    let mut conn = state.conn().await?;
    let offer = store::offers::insert(&mut conn, &offer)
        .await
        .inspect_err(|e| error!("cannot add special offer: {e}"))?;
    info!(offer_id = offer.id, "added special offer");
    Ok((StatusCode::CREATED, Json(offer.into())))
}

/// Up to three offers still running on the given date (today by default).
#[utoipa::path(
    get,
    path = "/api/v1/special_offers",
    params(("date" = Option<String>, Query, description = "Reference date, defaults to today")),
    responses(
        (status = 200, description = "Running offers, earliest start first", body = [SpecialOffer]),
        (status = 400, description = "Malformed date", body = burgerhaus_types::ErrorBody),
    ),
    tag = "menus"
)]
#[instrument(skip(state))]
pub async fn get_offers_from_date(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SpecialOffer>>> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());
    let mut conn = state.conn().await?;
    let offers = store::offers::from_date(&mut conn, date)
        .await
        .inspect_err(|e| error!("cannot load special offers: {e}"))?;
    Ok(Json(offers.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(end_date: &str) -> MultipartForm {
        let mut form = MultipartForm::default();
        form.insert_text("special-offer-name", "Double Deal");
        form.insert_text("special-offer-price", "9.90");
        form.insert_text("special-offer-start-date", "2024-06-01");
        form.insert_text("special-offer-end-date", end_date);
        form
    }

    #[test]
    fn test_offer_from_form() {
        let offer = offer_from(&form("30.06.2024")).unwrap();
        assert_eq!(offer.offer_name, "Double Deal");
        assert_eq!(offer.end_date.to_string(), "2024-06-30");
        assert_eq!(offer.burger_id, None);
        assert_eq!(offer.description, "");
    }

    #[test]
    fn test_offer_rejects_reversed_dates() {
        let form = form("2024-05-01");
        assert!(matches!(offer_from(&form), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_offer_rejects_bad_burger_id() {
        let mut bad = form("2024-06-30");
        bad.insert_text("special-offer-burger", "classic");
        assert!(offer_from(&bad).is_err());

        let mut good = form("2024-06-30");
        good.insert_text("special-offer-burger", "4");
        assert_eq!(offer_from(&good).unwrap().burger_id, Some(4));
    }
}
