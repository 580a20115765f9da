//! Client side of the store backend.
//!
//! [`StoreApi`] is the seam the checkout workflow talks through; [`HttpStoreApi`]
//! is the production implementation over `reqwest`.

mod http;

pub use http::HttpStoreApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Address, OrderRequest, Product, SavedAddress, User};

/// Errors raised when no usable reply was obtained from the backend.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Connection failure, timeout or similar.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx reply. `message` is the backend's own message when its body
    /// carried one.
    #[error("backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    #[error("could not decode backend reply: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the shopper: the backend message when there is one,
    /// otherwise the error itself.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// `{ success, message? }` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAddressBody<'a> {
    pub address: &'a Address,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressList {
    #[serde(default)]
    pub addresses: Vec<SavedAddress>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Remote endpoints of the store backend, called on behalf of `user`.
#[async_trait]
pub trait StoreApi: Send + Sync {
    async fn create_address(&self, user: &User, address: &Address) -> Result<Ack, ApiError>;

    /// Saved addresses of the user, in backend order.
    async fn list_addresses(&self, user: &User) -> Result<Vec<SavedAddress>, ApiError>;

    async fn place_cod_order(&self, user: &User, order: &OrderRequest) -> Result<Ack, ApiError>;

    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
}
