mod common;

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use common::{address, user};
use serde_json::{Value, json};
use storefront_checkout::{
    client::{ApiError, HttpStoreApi, StoreApi},
    models::{CartLine, OrderRequest},
};

/// Requests the fake backend received: (path, bearer token, body).
type Seen = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn add_address(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    seen.lock()
        .unwrap()
        .push(("/api/address/add".into(), bearer(&headers), body));
    Json(json!({ "success": true, "message": "Address added" }))
}

async fn get_addresses(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    seen.lock()
        .unwrap()
        .push(("/api/address/get".into(), bearer(&headers), Value::Null));
    Json(json!({
        "success": true,
        "addresses": [
            {
                "_id": "addr-2",
                "userId": "user-1",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "street": "12 St James's Square",
                "city": "London",
                "state": "Greater London",
                "zipcode": "10001",
                "country": "United Kingdom",
                "phone": "+44 20 7946 0000",
                "createdAt": "2025-03-01T12:00:00Z"
            }
        ]
    }))
}

async fn place_order(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    seen.lock()
        .unwrap()
        .push(("/api/order/cod".into(), bearer(&headers), body.clone()));
    if body["items"].as_array().is_some_and(|items| items.is_empty()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Invalid data" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Order Placed Successfully" })),
    )
}

async fn list_products() -> Json<Value> {
    Json(json!({
        "success": true,
        "products": [
            { "_id": "A", "name": "Apple", "category": "Fruits", "offerPrice": 3.5, "inStock": true },
            { "_id": "B", "name": "Banana" }
        ]
    }))
}

async fn start_backend() -> (HttpStoreApi, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/address/add", post(add_address))
        .route("/api/address/get", get(get_addresses))
        .route("/api/order/cod", post(place_order))
        .route("/api/product/list", get(list_products))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (HttpStoreApi::new(format!("http://{addr}/")), seen)
}

#[tokio::test]
async fn create_address_posts_wrapped_address_with_bearer() {
    let (api, seen) = start_backend().await;

    let ack = api.create_address(&user(), &address()).await.expect("ack");
    assert!(ack.success);
    assert_eq!(ack.message.as_deref(), Some("Address added"));

    let seen = seen.lock().unwrap();
    let (path, token, body) = &seen[0];
    assert_eq!(path, "/api/address/add");
    assert_eq!(token.as_deref(), Some("token-1"));
    assert_eq!(body["address"]["firstName"], "Ada");
    assert_eq!(body["address"]["zipcode"], "10001");
}

#[tokio::test]
async fn list_addresses_reads_backend_ids() {
    let (api, _) = start_backend().await;

    let addresses = api.list_addresses(&user()).await.expect("addresses");
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].id, "addr-2");
    assert_eq!(addresses[0].address.city, "London");
}

#[tokio::test]
async fn order_request_uses_backend_field_names() {
    let (api, seen) = start_backend().await;
    let order = OrderRequest {
        user_id: "user-1".into(),
        items: vec![CartLine {
            product: "A".into(),
            quantity: 2,
        }],
        address: "addr-2".into(),
    };

    let ack = api.place_cod_order(&user(), &order).await.expect("ack");
    assert!(ack.success);

    let seen = seen.lock().unwrap();
    let (_, _, body) = &seen[0];
    assert_eq!(
        body,
        &json!({
            "userId": "user-1",
            "items": [{ "product": "A", "quantity": 2 }],
            "address": "addr-2"
        })
    );
}

#[tokio::test]
async fn error_status_carries_backend_message() {
    let (api, _) = start_backend().await;
    let order = OrderRequest {
        user_id: "user-1".into(),
        items: Vec::new(),
        address: "addr-2".into(),
    };

    let err = api
        .place_cod_order(&user(), &order)
        .await
        .expect_err("rejected");
    match &err {
        ApiError::Status { status, message } => {
            assert_eq!(*status, 400);
            assert_eq!(message.as_deref(), Some("Invalid data"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Invalid data");
}

#[tokio::test]
async fn products_fill_defaults() {
    let (api, _) = start_backend().await;

    let products = api.list_products().await.expect("products");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].offer_price, Some(3.5));
    assert!(products[1].in_stock);
    assert_eq!(products[1].category, None);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let api = HttpStoreApi::new("http://127.0.0.1:1");
    let err = api.list_products().await.expect_err("unreachable");
    assert!(matches!(err, ApiError::Transport(_)));
}
