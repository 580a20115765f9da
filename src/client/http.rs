use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use super::{Ack, AddressList, ApiError, CreateAddressBody, ProductList, StoreApi};
use crate::models::{Address, OrderRequest, Product, SavedAddress, User};

/// `StoreApi` over HTTP/JSON.
///
/// Each call is a single request with no retry; timeouts are whatever the
/// underlying `reqwest::Client` applies.
#[derive(Clone)]
pub struct HttpStoreApi {
    inner: Arc<HttpStoreApiInner>,
}

struct HttpStoreApiInner {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpStoreApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(HttpStoreApiInner { client, base_url }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str, user: Option<&User>) -> RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        let builder = self.inner.client.request(method, url);
        match user {
            Some(user) => builder.bearer_auth(&user.token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            tracing::warn!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "store backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "failed to parse store backend reply");
            ApiError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl StoreApi for HttpStoreApi {
    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn create_address(&self, user: &User, address: &Address) -> Result<Ack, ApiError> {
        debug!("POST /api/address/add");
        let builder = self
            .request(Method::POST, "/api/address/add", Some(user))
            .json(&CreateAddressBody { address });
        self.execute(builder).await
    }

    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn list_addresses(&self, user: &User) -> Result<Vec<SavedAddress>, ApiError> {
        debug!("GET /api/address/get");
        let builder = self.request(Method::GET, "/api/address/get", Some(user));
        let list: AddressList = self.execute(builder).await?;
        Ok(list.addresses)
    }

    #[instrument(skip_all, fields(user_id = %user.id, lines = order.items.len()))]
    async fn place_cod_order(&self, user: &User, order: &OrderRequest) -> Result<Ack, ApiError> {
        debug!("POST /api/order/cod");
        let builder = self
            .request(Method::POST, "/api/order/cod", Some(user))
            .json(order);
        self.execute(builder).await
    }

    #[instrument(skip_all)]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        debug!("GET /api/product/list");
        let builder = self.request(Method::GET, "/api/product/list", None);
        let list: ProductList = self.execute(builder).await?;
        Ok(list.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let api = HttpStoreApi::new("http://localhost:4000/");
        assert_eq!(api.base_url(), "http://localhost:4000");
    }
}
