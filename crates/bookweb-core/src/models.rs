//! Records exchanged with the bookstore REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything a list view can address by a stable identifier
pub trait Identified {
    fn id(&self) -> &str;
}

/// Genre summary embedded in book rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub writer: String,
    pub publisher: String,
    pub publication_year: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub genre_id: String,
    #[serde(default)]
    pub genre: Option<GenreRef>,
}

impl Book {
    /// Genre name for display, `-` when the backend did not embed it
    pub fn genre_name(&self) -> &str {
        self.genre.as_ref().map(|g| g.name.as_str()).unwrap_or("-")
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

impl Identified for Book {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Identified for Genre {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Book as embedded in an order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedBook {
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub genre: Option<GenreRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub quantity: i64,
    #[serde(default)]
    pub book: Option<OrderedBook>,
}

/// A purchase transaction with its order lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

impl Transaction {
    /// Sum of price x quantity over lines whose book is known
    pub fn total_price(&self) -> f64 {
        self.order_items
            .iter()
            .filter_map(|item| item.book.as_ref().map(|b| b.price * item.quantity as f64))
            .sum()
    }
}

impl Identified for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Paging metadata reported by paginated list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// `{data, meta?}` wrapper used by every list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PaginationMeta>,
}

/// Error and acknowledgement bodies; only `message` is of interest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ==================== Request payloads ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPayload {
    pub title: String,
    pub writer: String,
    pub publisher: String,
    pub publication_year: i32,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i64,
    pub genre_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenrePayload {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub book_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

// ==================== Authentication ====================

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Echo of the new account; only shown, so timestamps stay as sent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub data: RegisteredUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}
