use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    checkout::{Navigation, Notice, NoticeLevel, Outcome, Step, SubmissionReport},
    models::{Address, AddressField, CartEntry},
    response::{ApiResponse, Meta},
    routes::{
        cart::{self, CartList, SetCartItemRequest},
        checkout::{self, FormEntry, SubmitAddressRequest},
        health,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        checkout::address_form,
        checkout::submit,
        cart::cart_list,
        cart::set_item,
        cart::clear_cart,
    ),
    components(
        schemas(
            Address,
            AddressField,
            CartEntry,
            CartList,
            SetCartItemRequest,
            SubmitAddressRequest,
            FormEntry,
            SubmissionReport,
            Navigation,
            Notice,
            NoticeLevel,
            Outcome,
            Step,
            Meta,
            ApiResponse<SubmissionReport>,
            ApiResponse<CartList>,
            ApiResponse<FormEntry>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Checkout", description = "Shipping address submission and order placement"),
        (name = "Cart", description = "Cart endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
