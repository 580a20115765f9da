#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use storefront_checkout::{
    client::{Ack, ApiError, StoreApi},
    models::{Address, AddressField, OrderRequest, Product, SavedAddress, User},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateAddress(Address),
    ListAddresses,
    PlaceOrder(OrderRequest),
    ListProducts,
}

/// In-memory backend: fixed replies per endpoint, every call recorded.
pub struct MockStoreApi {
    pub create_address: Result<Ack, ApiError>,
    pub addresses: Result<Vec<SavedAddress>, ApiError>,
    pub place_order: Result<Ack, ApiError>,
    pub products: Result<Vec<Product>, ApiError>,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for MockStoreApi {
    fn default() -> Self {
        Self {
            create_address: Ok(Ack::ok()),
            addresses: Ok(vec![saved("addr-new"), saved("addr-old")]),
            place_order: Ok(Ack::ok()),
            products: Ok(vec![product("A"), product("B")]),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockStoreApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::PlaceOrder(order) => Some(order),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StoreApi for MockStoreApi {
    async fn create_address(&self, _user: &User, address: &Address) -> Result<Ack, ApiError> {
        self.record(Call::CreateAddress(address.clone()));
        self.create_address.clone()
    }

    async fn list_addresses(&self, _user: &User) -> Result<Vec<SavedAddress>, ApiError> {
        self.record(Call::ListAddresses);
        self.addresses.clone()
    }

    async fn place_cod_order(&self, _user: &User, order: &OrderRequest) -> Result<Ack, ApiError> {
        self.record(Call::PlaceOrder(order.clone()));
        self.place_order.clone()
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record(Call::ListProducts);
        self.products.clone()
    }
}

pub fn address() -> Address {
    let mut address = Address::default();
    for (field, value) in AddressField::ALL.into_iter().zip([
        "Ada",
        "Lovelace",
        "ada@example.com",
        "12 St James's Square",
        "London",
        "Greater London",
        "10001",
        "United Kingdom",
        "+44 20 7946 0000",
    ]) {
        address.set(field, value);
    }
    address
}

pub fn saved(id: &str) -> SavedAddress {
    SavedAddress {
        id: id.to_string(),
        address: address(),
        created_at: None,
    }
}

pub fn product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        category: Some("Fruits".into()),
        offer_price: Some(4.5),
        in_stock: true,
    }
}

pub fn user() -> User {
    User {
        id: "user-1".into(),
        token: "token-1".into(),
    }
}
