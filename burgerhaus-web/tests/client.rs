use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use burgerhaus_types::{
    orders::{NewOrderRequest, OrderItemsRequest},
    users::{LoginRequest, Role, UserInfo},
};
use burgerhaus_web::{
    checkout::checkout,
    menu::{daily_menu, top_offers},
    storage::{FileStorage, MemoryStorage},
    ApiClient, ClientConfig, Session, WebError,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorded {
    items: Arc<Mutex<Vec<OrderItemsRequest>>>,
}

fn alice() -> UserInfo {
    UserInfo {
        user_id: 7,
        username: "alice".to_string(),
        avatar: None,
        firstname: "Alice".to_string(),
        lastname: "Smith".to_string(),
        address: None,
        phone: None,
        email: None,
        role: Role::Guest,
    }
}

fn error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(json!({ "message": message })))
}

async fn login(Json(body): Json<LoginRequest>) -> impl IntoResponse {
    if body.password == "secret" {
        Json(json!({ "user": alice(), "token": "token-7" })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials").into_response()
    }
}

async fn place_order(headers: HeaderMap, Json(body): Json<NewOrderRequest>) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer token-7");
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "No token provided").into_response();
    }
    assert_eq!(body.user_id, 7);
    (StatusCode::CREATED, Json(json!({ "order_id": 31 }))).into_response()
}

async fn add_items(
    State(recorded): State<Recorded>,
    Json(body): Json<OrderItemsRequest>,
) -> impl IntoResponse {
    let added = body.items.len();
    recorded.items.lock().unwrap().push(body);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Order items added", "added": added })),
    )
}

async fn burger(Path(id): Path<i32>) -> impl IntoResponse {
    match id {
        1 => Json(json!({
            "id": 1,
            "name": "Classic",
            "description": "Beef",
            "price": "8.50",
            "filename": "classic.png"
        }))
        .into_response(),
        _ => error(StatusCode::NOT_FOUND, "Burger not found").into_response(),
    }
}

async fn menu(Path(date): Path<String>) -> Json<Value> {
    Json(json!([
        { "id": 1, "burger_id": 1, "date": date },
        { "id": 2, "burger_id": 99, "date": date },
    ]))
}

async fn allergens(Path(_burger_id): Path<i32>) -> Json<Value> {
    Json(json!([
        { "id": 1, "acronym": "G", "description": "Gluten" },
        { "id": 5, "acronym": "L", "description": "Lactose" },
    ]))
}

async fn offers() -> Json<Value> {
    let offer = |id: i32, start: &str, burger_id: Option<i32>| {
        json!({
            "id": id,
            "offer_name": format!("offer {id}"),
            "description": "",
            "price": "5.00",
            "start_date": start,
            "end_date": "2024-12-31",
            "burger_id": burger_id,
            "filename": null
        })
    };
    Json(json!([
        offer(1, "2024-06-04", None),
        offer(2, "2024-06-01", Some(1)),
        offer(3, "2024-06-03", Some(99)),
        offer(4, "2024-06-02", None),
    ]))
}

async fn teapot() -> impl IntoResponse {
    error(StatusCode::IM_A_TEAPOT, "Nothing to delete")
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "plain failure")
}

async fn spawn(recorded: Recorded) -> ClientConfig {
    let api = Router::new()
        .route("/auth", post(login))
        .route("/users/orders", post(place_order))
        .route("/users/orders/items", post(add_items))
        .route("/users/{username}", get(broken).delete(teapot))
        .route("/hamburgers/{id}", get(burger))
        .route("/menus/{date}", get(menu))
        .route("/allergens/{burger_id}", get(allergens))
        .route("/special_offers", get(offers))
        .with_state(recorded);
    let app = Router::new().nest("/api/v1", api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    ClientConfig::new(format!("http://{addr}/"))
}

#[tokio::test]
async fn test_status_mapping() {
    let config = spawn(Recorded::default()).await;
    let api = ApiClient::new(config).unwrap();

    match api.login("alice", "wrong").await {
        Err(WebError::Unauthorized(message)) => assert_eq!(message, "Invalid credentials"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(api.burger(2).await, Err(WebError::NotFound(_))));
    assert!(matches!(
        api.delete_user("alice").await,
        Err(WebError::NoChange(_))
    ));
    match api.get_user("alice").await {
        Err(WebError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "plain failure");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_login_then_checkout() {
    let recorded = Recorded::default();
    let config = spawn(recorded.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(Arc::new(
        FileStorage::open(dir.path().join("session.json")).unwrap(),
    ));

    let response = ApiClient::new(config.clone())
        .unwrap()
        .login("alice", "secret")
        .await
        .unwrap();
    session.login(&response).unwrap();

    let api = ApiClient::for_session(config, &session).unwrap();
    assert_eq!(api.token(), Some("token-7"));

    let burger = api.burger(1).await.unwrap();
    let mut cart = session.cart().unwrap();
    cart.add_burger(&burger).unwrap();
    cart.add_burger(&burger).unwrap();

    let receipt = checkout(&api, &session).await.unwrap();
    assert_eq!(receipt.order_id, 31);
    assert_eq!(receipt.added, 1);
    assert!(session.cart().unwrap().is_empty());

    let sent = recorded.items.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].order_id, 31);
    assert_eq!(sent[0].items[0].id, 1);
    assert_eq!(sent[0].items[0].quantity, 2);
}

#[tokio::test]
async fn test_menu_and_offer_cards() {
    let config = spawn(Recorded::default()).await;
    let api = ApiClient::new(config).unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    let cards = daily_menu(&api, day).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].burger.name, "Classic");
    assert_eq!(cards[0].allergen_label(), "G, L");
    assert!(cards[0]
        .image_url
        .as_deref()
        .is_some_and(|url| url.ends_with("/api/v1/burgers/classic.png")));

    let offers = top_offers(&api, day).await.unwrap();
    let ids: Vec<i32> = offers.iter().map(|card| card.offer.id).collect();
    assert_eq!(ids, vec![2, 4, 3]);
    assert!(offers[0].burger.is_some());
    assert!(offers[0].image_url.is_some());
    assert!(offers[2].burger.is_none());
    assert!(offers[2].image_url.is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let session = Session::new(Arc::new(MemoryStorage::new()));
    let api = ApiClient::for_session(ClientConfig::new("http://127.0.0.1:1"), &session).unwrap();
    assert!(api.token().is_none());
    assert!(matches!(api.burgers().await, Err(WebError::Http(_))));
}
