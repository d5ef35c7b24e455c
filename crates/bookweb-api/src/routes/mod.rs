//! Route modules for the back office
//!
//! - auth: Register, login, logout
//! - books: Catalogue list, filters, book form, delete confirmation
//! - genres: Genre list, genre form, delete confirmation
//! - transactions: Paginated list and the checkout composer
//! - session: Guard middleware for protected pages
//!
//! Each area module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: HTMX endpoints returning fragments
//! - page.rs: Full page rendering and shared fragments

pub mod auth;
pub mod books;
pub mod genres;
pub mod session;
pub mod transactions;

use std::collections::HashMap;

/// Form fields as submitted; missing keys read as empty
pub(crate) fn field<'a>(form: &'a HashMap<String, String>, key: &str) -> &'a str {
    form.get(key).map(String::as_str).unwrap_or("")
}
