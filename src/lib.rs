//! Checkout backend-for-frontend for the storefront.
//!
//! Accepts a shipping address, saves it with the store backend and, when the
//! shopper asked to check out straight away, places a cash-on-delivery order
//! for their cart. The workflow itself lives in [`checkout`]; the rest of the
//! crate is the HTTP service around it.

pub mod checkout;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;
