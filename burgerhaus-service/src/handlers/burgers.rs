use std::str::FromStr;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use bigdecimal::BigDecimal;
use burgerhaus_types::catalog::{
    parse_ingredient_list, Allergen, Burger, CreatedBurger, DeleteBurgerResponse, Ingredient,
};
use tracing::{error, info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::models::NewBurger;
use crate::store;
use crate::uploads::{MultipartForm, BURGER_DIR};
use crate::AppState;

use super::collection;

pub const IMAGE_FIELD: &str = "add-burger-upload-name";

pub fn public_router() -> Router<AppState> {
    let router = collection(Router::new(), "/hamburgers", get(list_burgers));
    let router = collection(router, "/ingredients", get(list_ingredients));
    collection(router, "/allergens", get(list_allergens))
        .route("/hamburgers/{id}", get(get_burger))
        .route("/allergens/{burger_id}", get(list_allergens_for_burger))
}

pub fn admin_router() -> Router<AppState> {
    collection(Router::new(), "/hamburgers", post(add_burger))
        .route("/hamburgers/{id}", delete(delete_burger))
}

pub(crate) fn parse_price(text: &str) -> ApiResult<BigDecimal> {
    let price = BigDecimal::from_str(text)
        .map_err(|_| ApiError::bad_request(format!("Invalid price `{text}`")))?;
    if price < BigDecimal::from(0) {
        return Err(ApiError::bad_request("Price must not be negative"));
    }
    Ok(price.with_scale(2))
}

fn parse_ids<'a>(values: impl Iterator<Item = &'a str>) -> ApiResult<Vec<i32>> {
    let mut ids: Vec<i32> = Vec::new();
    for value in values {
        let id = value
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid allergen id `{value}`")))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[utoipa::path(
    get,
    path = "/api/v1/hamburgers",
    responses((status = 200, description = "All burgers", body = [Burger])),
    tag = "burgers"
)]
#[instrument(skip(state))]
pub async fn list_burgers(State(state): State<AppState>) -> ApiResult<Json<Vec<Burger>>> {
    let mut conn = state.conn().await?;
    let burgers = store::burgers::list(&mut conn)
        .await
        .inspect_err(|e| error!("cannot list burgers: {e}"))?;
    Ok(Json(burgers.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/hamburgers/{id}",
    params(("id" = i32, Path, description = "Burger id")),
    responses(
        (status = 200, description = "The burger", body = Burger),
        (status = 404, description = "No such burger", body = burgerhaus_types::ErrorBody),
    ),
    tag = "burgers"
)]
#[instrument(skip(state))]
pub async fn get_burger(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Burger>> {
    let mut conn = state.conn().await?;
    let burger = store::burgers::find(&mut conn, id)
        .await
        .inspect_err(|e| error!("cannot load burger: {e}"))?
        .ok_or_else(|| ApiError::not_found("Burger not found"))?;
    Ok(Json(burger.into()))
}

/// Creates a burger from the admin form. The image is stored first; the
/// burger row, new ingredients and all links are written in one transaction.
#[utoipa::path(
    post,
    path = "/api/v1/hamburgers",
    request_body(content = String, description = "Multipart burger form", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Burger created", body = CreatedBurger),
        (status = 400, description = "Missing or malformed field", body = burgerhaus_types::ErrorBody),
        (status = 500, description = "Linking failed, nothing was stored", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "burgers"
)]
#[instrument(skip_all)]
pub async fn add_burger(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<CreatedBurger>)> {
    let mut form = MultipartForm::read(multipart, IMAGE_FIELD).await?;
    let name = form.required("add-burger-name")?.to_string();
    let description = form.text("add-burger-description").unwrap_or_default().to_string();
    let price = parse_price(form.required("add-burger-price")?)?;
    let ingredients = parse_ingredient_list(form.text("ingredients").unwrap_or_default());
    let allergens = parse_ids(form.all("allergens"))?;

    let filename = match form.take_file() {
        Some(file) => Some(state.uploads.save(Some(BURGER_DIR), &file).await?),
        None => None,
    };

    let new_burger = NewBurger {
        name,
        description,
        price,
        filename,
    };
    let mut conn = state.conn().await?;
    let burger = store::burgers::create_with_links(&mut conn, new_burger, ingredients, allergens)
        .await
        .inspect_err(|e| error!("cannot add burger: {e}"))?;

    info!(burger_id = burger.id, name = %burger.name, "added burger");
    Ok((
        StatusCode::CREATED,
        Json(CreatedBurger {
            id: burger.id,
            name: burger.name,
            description: burger.description,
            price: burger.price,
            image: burger.filename,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/hamburgers/{id}",
    params(("id" = i32, Path, description = "Burger id")),
    responses(
        (status = 200, description = "Burger deleted", body = DeleteBurgerResponse),
        (status = 404, description = "No such burger", body = burgerhaus_types::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "burgers"
)]
#[instrument(skip(state))]
pub async fn delete_burger(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<DeleteBurgerResponse>> {
    let mut conn = state.conn().await?;
    let deleted = store::burgers::delete_by_id(&mut conn, id)
        .await
        .inspect_err(|e| error!("cannot delete burger: {e}"))?;
    if deleted == 0 {
        return Err(ApiError::not_found("Burger not found"));
    }
    info!("deleted burger");
    Ok(Json(DeleteBurgerResponse {
        success: true,
        message: "Burger deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    responses((status = 200, description = "All ingredients", body = [Ingredient])),
    tag = "burgers"
)]
#[instrument(skip(state))]
pub async fn list_ingredients(State(state): State<AppState>) -> ApiResult<Json<Vec<Ingredient>>> {
    let mut conn = state.conn().await?;
    let ingredients = store::ingredients::list(&mut conn)
        .await
        .inspect_err(|e| error!("cannot list ingredients: {e}"))?;
    Ok(Json(ingredients.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/allergens",
    responses((status = 200, description = "All allergens", body = [Allergen])),
    tag = "burgers"
)]
#[instrument(skip(state))]
pub async fn list_allergens(State(state): State<AppState>) -> ApiResult<Json<Vec<Allergen>>> {
    let mut conn = state.conn().await?;
    let allergens = store::allergens::list(&mut conn)
        .await
        .inspect_err(|e| error!("cannot list allergens: {e}"))?;
    Ok(Json(allergens.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/allergens/{burger_id}",
    params(("burger_id" = i32, Path, description = "Burger id")),
    responses((status = 200, description = "Allergens linked to the burger", body = [Allergen])),
    tag = "burgers"
)]
#[instrument(skip(state))]
pub async fn list_allergens_for_burger(
    State(state): State<AppState>,
    Path(burger_id): Path<i32>,
) -> ApiResult<Json<Vec<Allergen>>> {
    let mut conn = state.conn().await?;
    let allergens = store::allergens::for_burger(&mut conn, burger_id)
        .await
        .inspect_err(|e| error!("cannot list allergens: {e}"))?;
    Ok(Json(allergens.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12.5").unwrap(), BigDecimal::from_str("12.50").unwrap());
        assert!(matches!(parse_price("twelve"), Err(ApiError::BadRequest(_))));
        assert!(parse_price("-1").is_err());
    }

    #[test]
    fn test_parse_allergen_ids() {
        assert_eq!(parse_ids(["1", "2", "1"].into_iter()).unwrap(), vec![1, 2]);
        assert!(parse_ids(["x"].into_iter()).is_err());
    }
}
