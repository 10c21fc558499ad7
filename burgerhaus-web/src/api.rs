//! Typed HTTP client for the burgerhaus REST API.

use bigdecimal::BigDecimal;
use burgerhaus_types::{
    catalog::{
        Allergen, Burger, CreatedBurger, DeleteBurgerResponse, Ingredient, MenuEntry,
        NewMenuEntry, SpecialOffer,
    },
    orders::{
        ActiveOrderRow, NewOrderRequest, NewOrderResponse, OrderHistoryRow, OrderItemRequest,
        OrderItemsRequest, OrderItemsResponse, OrderStatusUpdate, OrderStatusUpdateResponse,
    },
    reservations::{
        Customer, CustomerRequest, DiningTable, GuestCountUpdate, NewReservationRequest,
        Reservation, ReservationCreated, TableLocation, TableRequest, TableWithStatus,
    },
    slots::SlotGrid,
    users::{AvatarResponse, LoginRequest, LoginResponse, Registration, UserInfo, UserInfoUpdate, VerifyResponse},
    ErrorBody, MessageResponse,
};
use chrono::NaiveDate;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{WebError, WebResult};
use crate::session::Session;

/// An image picked for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    /// e.g. `image/png`
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    fn into_part(self) -> WebResult<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?)
    }
}

/// Admin form for a new burger.
#[derive(Debug, Clone)]
pub struct BurgerForm {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub ingredients: Vec<String>,
    pub allergens: Vec<i32>,
    pub image: Option<ImageUpload>,
}

/// Admin form for a new special offer.
#[derive(Debug, Clone)]
pub struct OfferForm {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub burger_id: Option<i32>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> WebResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            token: None,
        })
    }

    /// Client carrying the token of the session, if any.
    pub fn for_session(config: ClientConfig, session: &Session) -> WebResult<Self> {
        let client = Self::new(config)?;
        Ok(match session.token()? {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = self.config.api_url(path);
        debug!(%method, url, "api request");
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> WebResult<T> {
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> WebResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        warn!(status = status.as_u16(), error = %message, "api request failed");
        Err(match status {
            StatusCode::BAD_REQUEST => WebError::BadRequest(message),
            StatusCode::UNAUTHORIZED => WebError::Unauthorized(message),
            StatusCode::FORBIDDEN => WebError::Forbidden(message),
            StatusCode::NOT_FOUND => WebError::NotFound(message),
            StatusCode::IM_A_TEAPOT => WebError::NoChange(message),
            _ => WebError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> WebResult<T> {
        Self::send(self.request(reqwest::Method::GET, path)).await
    }

    async fn get_on<T: DeserializeOwned>(&self, path: &str, date: NaiveDate) -> WebResult<T> {
        let request = self
            .request(reqwest::Method::GET, path)
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);
        Self::send(request).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> WebResult<T> {
        Self::send(self.request(reqwest::Method::POST, path).json(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> WebResult<T> {
        Self::send(self.request(reqwest::Method::PUT, path).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> WebResult<T> {
        Self::send(self.request(reqwest::Method::DELETE, path)).await
    }

    async fn multipart<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        form: Form,
    ) -> WebResult<T> {
        Self::send(self.request(method, path).multipart(form)).await
    }

    /// The plain-text greeting at the server root.
    pub async fn welcome(&self) -> WebResult<String> {
        let url = format!("{}/", self.config.base_url.trim_end_matches('/'));
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    // Auth and accounts

    pub async fn login(&self, username: &str, password: &str) -> WebResult<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post("auth", &body).await
    }

    pub async fn verify(&self) -> WebResult<VerifyResponse> {
        self.get("auth/verify").await
    }

    pub async fn register(
        &self,
        registration: &Registration,
        avatar: Option<ImageUpload>,
    ) -> WebResult<MessageResponse> {
        let mut form = Form::new()
            .text("firstname", registration.firstname.clone())
            .text("lastname", registration.lastname.clone())
            .text("username", registration.username.clone())
            .text("password", registration.password.clone());
        for (name, value) in [
            ("address", &registration.address),
            ("cardnumber", &registration.cardnumber),
            ("phonenumber", &registration.phonenumber),
            ("email", &registration.email),
        ] {
            if let Some(value) = value {
                form = form.text(name, value.clone());
            }
        }
        if let Some(avatar) = avatar {
            form = form.part("file", avatar.into_part()?);
        }
        self.multipart(reqwest::Method::POST, "users/register", form)
            .await
    }

    pub async fn get_user(&self, username: &str) -> WebResult<UserInfo> {
        self.get(&format!("users/{username}")).await
    }

    pub async fn update_user(
        &self,
        username: &str,
        update: &UserInfoUpdate,
    ) -> WebResult<MessageResponse> {
        self.put(&format!("users/{username}"), update).await
    }

    pub async fn update_avatar(
        &self,
        username: &str,
        avatar: ImageUpload,
    ) -> WebResult<AvatarResponse> {
        let form = Form::new()
            .text("username", username.to_string())
            .part("file", avatar.into_part()?);
        self.multipart(reqwest::Method::PUT, "users/avatar/update", form)
            .await
    }

    pub async fn delete_user(&self, username: &str) -> WebResult<MessageResponse> {
        self.delete(&format!("users/{username}")).await
    }

    // Orders

    pub async fn place_order(&self, user_id: i32) -> WebResult<NewOrderResponse> {
        self.post("users/orders", &NewOrderRequest { user_id }).await
    }

    pub async fn add_order_items(
        &self,
        order_id: i32,
        items: Vec<OrderItemRequest>,
    ) -> WebResult<OrderItemsResponse> {
        self.post("users/orders/items", &OrderItemsRequest { order_id, items })
            .await
    }

    pub async fn order_history(&self, username: &str) -> WebResult<Vec<OrderHistoryRow>> {
        self.get(&format!("users/orders/{username}")).await
    }

    pub async fn active_orders(&self) -> WebResult<Vec<ActiveOrderRow>> {
        self.get("users/admin/orders/active").await
    }

    pub async fn update_order_status(
        &self,
        status: &str,
        orders: Vec<i32>,
    ) -> WebResult<OrderStatusUpdateResponse> {
        let body = OrderStatusUpdate {
            status: status.to_string(),
            orders,
        };
        self.put("users/admin/orders/active", &body).await
    }

    // Catalog

    pub async fn burgers(&self) -> WebResult<Vec<Burger>> {
        self.get("hamburgers").await
    }

    pub async fn burger(&self, id: i32) -> WebResult<Burger> {
        self.get(&format!("hamburgers/{id}")).await
    }

    pub async fn add_burger(&self, burger: BurgerForm) -> WebResult<CreatedBurger> {
        let mut form = Form::new()
            .text("add-burger-name", burger.name)
            .text("add-burger-description", burger.description)
            .text("add-burger-price", burger.price.to_string())
            .text("ingredients", burger.ingredients.join(","));
        for allergen in burger.allergens {
            form = form.text("allergens", allergen.to_string());
        }
        if let Some(image) = burger.image {
            form = form.part("add-burger-upload-name", image.into_part()?);
        }
        self.multipart(reqwest::Method::POST, "hamburgers", form)
            .await
    }

    pub async fn delete_burger(&self, id: i32) -> WebResult<DeleteBurgerResponse> {
        self.delete(&format!("hamburgers/{id}")).await
    }

    pub async fn ingredients(&self) -> WebResult<Vec<Ingredient>> {
        self.get("ingredients").await
    }

    pub async fn allergens(&self) -> WebResult<Vec<Allergen>> {
        self.get("allergens").await
    }

    pub async fn allergens_for_burger(&self, burger_id: i32) -> WebResult<Vec<Allergen>> {
        self.get(&format!("allergens/{burger_id}")).await
    }

    pub async fn add_menu_item(&self, burger_id: i32, date: NaiveDate) -> WebResult<MenuEntry> {
        self.post("menus", &NewMenuEntry { burger_id, date }).await
    }

    pub async fn menu_for_date(&self, date: NaiveDate) -> WebResult<Vec<MenuEntry>> {
        self.get(&format!("menus/{}", date.format("%Y-%m-%d")))
            .await
    }

    pub async fn add_special_offer(&self, offer: OfferForm) -> WebResult<SpecialOffer> {
        let mut form = Form::new()
            .text("special-offer-name", offer.name)
            .text("special-offer-description", offer.description)
            .text("special-offer-price", offer.price.to_string())
            .text(
                "special-offer-start-date",
                offer.start_date.format("%Y-%m-%d").to_string(),
            )
            .text(
                "special-offer-end-date",
                offer.end_date.format("%Y-%m-%d").to_string(),
            );
        if let Some(burger_id) = offer.burger_id {
            form = form.text("special-offer-burger", burger_id.to_string());
        }
        if let Some(image) = offer.image {
            form = form.part("special-offer-upload-name", image.into_part()?);
        }
        self.multipart(reqwest::Method::POST, "special_offers", form)
            .await
    }

    pub async fn special_offers(&self, date: NaiveDate) -> WebResult<Vec<SpecialOffer>> {
        self.get_on("special_offers", date).await
    }

    // Tables, customers and reservations

    pub async fn tables(&self) -> WebResult<Vec<DiningTable>> {
        self.get("tables").await
    }

    pub async fn add_table(&self, table: &TableRequest) -> WebResult<DiningTable> {
        self.post("tables", table).await
    }

    pub async fn table(&self, id: i32) -> WebResult<DiningTable> {
        self.get(&format!("tables/{id}")).await
    }

    pub async fn update_table(&self, id: i32, table: &TableRequest) -> WebResult<MessageResponse> {
        self.put(&format!("tables/{id}"), table).await
    }

    pub async fn delete_table(&self, id: i32) -> WebResult<MessageResponse> {
        self.delete(&format!("tables/{id}")).await
    }

    pub async fn tables_with_status(&self) -> WebResult<Vec<TableWithStatus>> {
        self.get("tables/with-status").await
    }

    pub async fn tables_by_location(&self, location: &str) -> WebResult<Vec<DiningTable>> {
        self.get(&format!("tables/location/{location}")).await
    }

    pub async fn table_location(&self, id: i32) -> WebResult<TableLocation> {
        self.get(&format!("tables/{id}/location")).await
    }

    pub async fn customers(&self) -> WebResult<Vec<Customer>> {
        self.get("customers").await
    }

    pub async fn add_customer(&self, customer: &CustomerRequest) -> WebResult<Customer> {
        self.post("customers", customer).await
    }

    pub async fn customer(&self, id: i32) -> WebResult<Customer> {
        self.get(&format!("customers/{id}")).await
    }

    pub async fn update_customer(
        &self,
        id: i32,
        customer: &CustomerRequest,
    ) -> WebResult<MessageResponse> {
        self.put(&format!("customers/{id}"), customer).await
    }

    pub async fn delete_customer(&self, id: i32) -> WebResult<MessageResponse> {
        self.delete(&format!("customers/{id}")).await
    }

    pub async fn customers_by_name(&self, name: &str) -> WebResult<Vec<Customer>> {
        self.get(&format!("customers/name/{name}")).await
    }

    pub async fn reservations(&self) -> WebResult<Vec<Reservation>> {
        self.get("reservations").await
    }

    pub async fn add_reservation(
        &self,
        reservation: &NewReservationRequest,
    ) -> WebResult<ReservationCreated> {
        self.post("reservations", reservation).await
    }

    pub async fn update_reservation_guests(
        &self,
        reservation_id: i32,
        number_of_guests: i32,
    ) -> WebResult<MessageResponse> {
        let body = GuestCountUpdate {
            number_of_guests: Some(number_of_guests),
        };
        self.put(&format!("reservations/{reservation_id}"), &body)
            .await
    }

    pub async fn delete_reservation(&self, reservation_id: i32) -> WebResult<MessageResponse> {
        self.delete(&format!("reservations/{reservation_id}")).await
    }

    pub async fn reservations_for_table(
        &self,
        table_id: i32,
        date: NaiveDate,
    ) -> WebResult<Vec<Reservation>> {
        self.get_on(&format!("reservations/{table_id}"), date).await
    }

    pub async fn slots_for_table(&self, table_id: i32, date: NaiveDate) -> WebResult<SlotGrid> {
        self.get_on(&format!("reservations/{table_id}/slots"), date)
            .await
    }

    pub async fn customer_for_reservation(&self, reservation_id: i32) -> WebResult<Customer> {
        self.get(&format!("reservations/customer/{reservation_id}"))
            .await
    }
}
