use std::{collections::HashMap, sync::Arc, time::Duration};

use moka::future::Cache;
use tokio::sync::{Mutex, RwLock};

use crate::{
    client::{ApiError, StoreApi},
    error::{AppError, AppResult},
    models::{Cart, Catalog},
};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn StoreApi>,
    pub carts: CartStore,
    pub catalog: CatalogCache,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(api: Arc<dyn StoreApi>, jwt_secret: &str, catalog_ttl: Duration) -> Self {
        Self {
            catalog: CatalogCache::new(api.clone(), catalog_ttl),
            api,
            carts: CartStore::default(),
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}

/// Carts keyed by user id.
///
/// Each cart sits behind its own mutex; a submission holds it for its whole
/// run, which also keeps two submissions of the same user from interleaving.
#[derive(Clone, Default)]
pub struct CartStore {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<Cart>>>>>,
}

impl CartStore {
    pub async fn cart_for(&self, user_id: &str) -> Arc<Mutex<Cart>> {
        if let Some(cart) = self.inner.read().await.get(user_id) {
            return cart.clone();
        }
        self.inner
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }
}

const CATALOG_KEY: &str = "catalog";

/// Product catalog fetched from the backend, cached for a fixed TTL.
#[derive(Clone)]
pub struct CatalogCache {
    api: Arc<dyn StoreApi>,
    cache: Cache<&'static str, Arc<Catalog>>,
}

impl CatalogCache {
    pub fn new(api: Arc<dyn StoreApi>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { api, cache }
    }

    pub async fn get(&self) -> AppResult<Arc<Catalog>> {
        let api = self.api.clone();
        self.cache
            .try_get_with(CATALOG_KEY, async move {
                let products = api.list_products().await?;
                tracing::debug!(count = products.len(), "catalog refreshed");
                Ok::<_, ApiError>(Arc::new(Catalog::new(products)))
            })
            .await
            .map_err(|err| AppError::Upstream((*err).clone()))
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate(CATALOG_KEY).await;
    }
}
