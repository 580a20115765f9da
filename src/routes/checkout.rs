use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    checkout::{CheckoutContext, Navigation, Outcome, SubmissionReport, submit_address},
    error::{AppError, AppResult},
    identity::{IdentityGuard, IdentityState},
    middleware::auth::AuthUser,
    models::{Address, Catalog, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAddressRequest {
    pub address: Address,
    /// Place a cash-on-delivery order for the current cart once the address is saved.
    #[serde(default)]
    pub place_order_now: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormEntry {
    /// Set when the shopper must leave the form.
    pub navigation: Option<Navigation>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/address", get(address_form).post(submit))
}

#[utoipa::path(
    get,
    path = "/api/checkout/address",
    responses(
        (status = 200, description = "Whether the address form may be shown", body = ApiResponse<FormEntry>),
    ),
    tag = "Checkout"
)]
pub async fn address_form(user: Option<AuthUser>) -> Json<ApiResponse<FormEntry>> {
    let identity = IdentityState::from(user.map(User::from));
    let navigation = IdentityGuard::new().observe(&identity);
    Json(ApiResponse::success(
        "OK",
        FormEntry { navigation },
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/checkout/address",
    request_body = SubmitAddressRequest,
    responses(
        (status = 200, description = "Submission finished; see outcome", body = ApiResponse<SubmissionReport>),
        (status = 400, description = "Required address fields are empty"),
        (status = 401, description = "Missing or invalid token"),
        (status = 502, description = "Catalog could not be loaded"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    Json(payload): Json<SubmitAddressRequest>,
) -> AppResult<Json<ApiResponse<SubmissionReport>>> {
    let missing = payload.address.missing_fields();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
        return Err(AppError::BadRequest(format!(
            "missing required fields: {}",
            names.join(", ")
        )));
    }

    let user = User::from(user);
    let catalog = if payload.place_order_now {
        state.catalog.get().await?
    } else {
        Arc::new(Catalog::default())
    };

    let cart = state.carts.cart_for(&user.id).await;
    let mut cart = cart.lock().await;

    let report = submit_address(
        state.api.as_ref(),
        &payload.address,
        payload.place_order_now,
        CheckoutContext {
            user: &user,
            catalog: catalog.as_ref(),
            cart: &mut *cart,
        },
    )
    .await;

    let message = match report.outcome {
        Outcome::Done => "Address saved",
        Outcome::OrderPlaced => "Order placed",
        Outcome::OrderFailed => "Address saved, order failed",
        Outcome::Failed => "Submission failed",
    };
    let request_id = headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    Ok(Json(ApiResponse::success(
        message,
        report,
        Some(Meta::empty().with_request_id(request_id)),
    )))
}
