pub mod auth;
pub mod burgers;
pub mod customers;
pub mod menus;
pub mod orders;
pub mod reservations;
pub mod tables;
pub mod users;

use axum::{
    extract::{DefaultBodyLimit, FromRequest, Request},
    middleware::{from_fn, from_fn_with_state},
    response::Json,
    routing::{get, MethodRouter},
    Router,
};
use burgerhaus_types::MessageResponse;
use serde::de::DeserializeOwned;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{require_admin, require_auth};
use crate::error::ApiError;
use crate::AppState;

pub const WELCOME: &str = "Welcome to my REST API!";

/// JSON body whose rejections answer 400 in the common error envelope.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

pub(crate) fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse::new(text))
}

/// Registers a collection route both with and without the trailing slash.
pub(crate) fn collection(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

async fn welcome() -> &'static str {
    WELCOME
}

/// Assembles the whole HTTP application.
///
/// Public, authenticated and admin routes live in separate routers; the
/// protected ones carry their guards as route layers and are merged by path.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .merge(auth::public_router())
        .merge(users::public_router())
        .merge(burgers::public_router())
        .merge(menus::public_router())
        .merge(tables::public_router())
        .merge(customers::public_router())
        .merge(reservations::public_router());

    let authenticated = Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(orders::router())
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .merge(burgers::admin_router())
        .merge(menus::admin_router())
        .merge(tables::admin_router())
        .merge(orders::admin_router())
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let files = ServeDir::new(&state.config.static_dir)
        .fallback(ServeDir::new(state.uploads.root()));

    let api = public
        .merge(authenticated)
        .merge(admin)
        .fallback_service(files);

    Router::new()
        .route("/", get(welcome))
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::verify,
        users::register,
        users::get_user,
        users::update_avatar,
        users::update_user,
        users::delete_user,
        orders::place_order,
        orders::add_order_items,
        orders::order_history,
        orders::active_orders,
        orders::update_order_status,
        burgers::list_burgers,
        burgers::get_burger,
        burgers::add_burger,
        burgers::delete_burger,
        burgers::list_ingredients,
        burgers::list_allergens,
        burgers::list_allergens_for_burger,
        menus::add_menu_item,
        menus::get_menu_by_date,
        menus::add_special_offer,
        menus::get_offers_from_date,
        tables::list_tables,
        tables::add_table,
        tables::get_table,
        tables::update_table,
        tables::delete_table,
        tables::tables_with_status,
        tables::tables_by_location,
        tables::table_location,
        customers::list_customers,
        customers::add_customer,
        customers::get_customer,
        customers::update_customer,
        customers::delete_customer,
        customers::customers_by_name,
        reservations::list_reservations,
        reservations::add_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
        reservations::reservations_for_table,
        reservations::slots_for_table,
        reservations::customer_for_reservation,
    ),
    components(
        schemas(
            burgerhaus_types::ErrorBody,
            burgerhaus_types::MessageResponse,
            burgerhaus_types::users::Role,
            burgerhaus_types::users::UserInfo,
            burgerhaus_types::users::LoginRequest,
            burgerhaus_types::users::LoginResponse,
            burgerhaus_types::users::VerifyResponse,
            burgerhaus_types::users::Registration,
            burgerhaus_types::users::UserInfoUpdate,
            burgerhaus_types::users::AvatarResponse,
            burgerhaus_types::orders::NewOrderRequest,
            burgerhaus_types::orders::NewOrderResponse,
            burgerhaus_types::orders::OrderItemRequest,
            burgerhaus_types::orders::OrderItemsRequest,
            burgerhaus_types::orders::OrderItemsResponse,
            burgerhaus_types::orders::OrderHistoryRow,
            burgerhaus_types::orders::ActiveOrderRow,
            burgerhaus_types::orders::OrderStatusUpdate,
            burgerhaus_types::orders::OrderStatusUpdateResponse,
            burgerhaus_types::catalog::Burger,
            burgerhaus_types::catalog::CreatedBurger,
            burgerhaus_types::catalog::DeleteBurgerResponse,
            burgerhaus_types::catalog::Allergen,
            burgerhaus_types::catalog::Ingredient,
            burgerhaus_types::catalog::MenuEntry,
            burgerhaus_types::catalog::NewMenuEntry,
            burgerhaus_types::catalog::SpecialOffer,
            burgerhaus_types::reservations::DiningTable,
            burgerhaus_types::reservations::TableRequest,
            burgerhaus_types::reservations::TableWithStatus,
            burgerhaus_types::reservations::TableLocation,
            burgerhaus_types::reservations::Customer,
            burgerhaus_types::reservations::CustomerRequest,
            burgerhaus_types::reservations::Reservation,
            burgerhaus_types::reservations::NewReservationRequest,
            burgerhaus_types::reservations::ReservationCreated,
            burgerhaus_types::reservations::GuestCountUpdate,
            burgerhaus_types::slots::Slot,
            burgerhaus_types::slots::SlotGrid,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and token verification"),
        (name = "users", description = "Accounts and profiles"),
        (name = "orders", description = "Orders and order tracking"),
        (name = "burgers", description = "Burgers, ingredients and allergens"),
        (name = "menus", description = "Daily menus and special offers"),
        (name = "tables", description = "Dining tables"),
        (name = "customers", description = "Reservation customers"),
        (name = "reservations", description = "Table reservations")
    ),
    info(
        title = "Burgerhaus API",
        description = "Restaurant ordering and table reservation backend",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            use utoipa::openapi::security::*;
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
