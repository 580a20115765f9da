use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shipping address as entered on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
    pub phone: String,
}

/// The form fields of an [`Address`], addressed by their wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    FirstName,
    LastName,
    Email,
    Street,
    City,
    State,
    Zipcode,
    Country,
    Phone,
}

impl AddressField {
    /// Form order.
    pub const ALL: [AddressField; 9] = [
        AddressField::FirstName,
        AddressField::LastName,
        AddressField::Email,
        AddressField::Street,
        AddressField::City,
        AddressField::State,
        AddressField::Zipcode,
        AddressField::Country,
        AddressField::Phone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressField::FirstName => "firstName",
            AddressField::LastName => "lastName",
            AddressField::Email => "email",
            AddressField::Street => "street",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Zipcode => "zipcode",
            AddressField::Country => "country",
            AddressField::Phone => "phone",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown address field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for AddressField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl Address {
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::FirstName => &self.first_name,
            AddressField::LastName => &self.last_name,
            AddressField::Email => &self.email,
            AddressField::Street => &self.street,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::Zipcode => &self.zipcode,
            AddressField::Country => &self.country,
            AddressField::Phone => &self.phone,
        }
    }

    /// Replace a single field, the way a bound form input updates its value.
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let slot = match field {
            AddressField::FirstName => &mut self.first_name,
            AddressField::LastName => &mut self.last_name,
            AddressField::Email => &mut self.email,
            AddressField::Street => &mut self.street,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::Zipcode => &mut self.zipcode,
            AddressField::Country => &mut self.country,
            AddressField::Phone => &mut self.phone,
        };
        *slot = value.into();
    }

    /// Required fields that are empty or whitespace only, in form order.
    pub fn missing_fields(&self) -> Vec<AddressField> {
        AddressField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

/// An address as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedAddress {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub offer_price: Option<f64>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

/// Product list the cart is resolved against.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product_id: String,
    pub quantity: u32,
}

/// Product id to quantity, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Cart {
    items: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity for a product. Existing entries keep their position;
    /// a quantity of zero removes the entry.
    pub fn set(&mut self, product_id: impl Into<String>, quantity: u32) {
        let product_id = product_id.into();
        let existing = self.items.iter().position(|e| e.product_id == product_id);
        match (existing, quantity) {
            (Some(idx), 0) => {
                self.items.remove(idx);
            }
            (Some(idx), qty) => {
                if let Some(entry) = self.items.get_mut(idx) {
                    entry.quantity = qty;
                }
            }
            (None, 0) => {}
            (None, qty) => self.items.push(CartEntry {
                product_id,
                quantity: qty,
            }),
        }
    }

    pub fn quantity(&self, product_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|e| e.product_id == product_id)
            .map(|e| e.quantity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Cart {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut cart = Cart::new();
        for (product_id, quantity) in iter {
            cart.set(product_id, quantity);
        }
        cart
    }
}

/// One line of an order: a catalog product and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: String,
    pub items: Vec<CartLine>,
    pub address: String,
}

/// Authenticated shopper, with the credential used to call the backend on
/// their behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub token: String,
}
