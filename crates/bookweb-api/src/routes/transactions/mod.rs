//! Transaction routes - Paginated list and checkout
//!
//! Features:
//! - Server-side pagination with page size from config
//! - Checkout composer: pick quantities for several books, one request
//!
//! Structure:
//! - api.rs: HTMX endpoints
//! - page.rs: Full page rendering and shared fragments

pub mod api;
pub mod page;

pub use api::{
    htmx_checkout_cancel, htmx_checkout_open, htmx_checkout_quantity, htmx_checkout_submit, htmx_transactions_goto,
    htmx_transactions_list, htmx_transactions_next, htmx_transactions_prev,
};
pub use page::page_transactions;
