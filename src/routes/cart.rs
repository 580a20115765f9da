use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Cart, CartEntry},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCartItemRequest {
    pub product_id: String,
    /// Zero removes the product from the cart.
    pub quantity: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartEntry>,
}

impl From<&Cart> for CartList {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.iter().cloned().collect(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(cart_list).put(set_item).delete(clear_cart))
}

fn respond(cart: &Cart) -> Json<ApiResponse<CartList>> {
    Json(ApiResponse::success(
        "OK",
        CartList::from(cart),
        Some(Meta::total(cart.len())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart of the current user, in insertion order", body = ApiResponse<CartList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let cart = state.carts.cart_for(&user.user_id).await;
    let cart = cart.lock().await;
    Ok(respond(&cart))
}

#[utoipa::path(
    put,
    path = "/api/cart",
    request_body = SetCartItemRequest,
    responses(
        (status = 200, description = "Set the quantity of one product", body = ApiResponse<CartList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn set_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let cart = state.carts.cart_for(&user.user_id).await;
    let mut cart = cart.lock().await;
    cart.set(payload.product_id.clone(), payload.quantity);
    tracing::debug!(
        user_id = %user.user_id,
        product_id = %payload.product_id,
        quantity = payload.quantity,
        "cart updated"
    );
    Ok(respond(&cart))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Empty the cart", body = ApiResponse<CartList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let cart = state.carts.cart_for(&user.user_id).await;
    let mut cart = cart.lock().await;
    cart.clear();
    Ok(respond(&cart))
}
