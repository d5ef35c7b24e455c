//! Book routes - Catalogue list, filters, create/edit, delete
//!
//! Features:
//! - Text and number filters are applied on demand, the stock checkbox
//!   refetches as soon as it changes
//! - Book form in a modal; bad numbers are reported before any request
//! - Delete asks for confirmation first
//!
//! Structure:
//! - api.rs: HTMX endpoints
//! - page.rs: Full page rendering and shared fragments

pub mod api;
pub mod page;

pub use api::{
    htmx_book_create, htmx_book_delete_cancel, htmx_book_delete_confirm, htmx_book_delete_request,
    htmx_book_edit_form, htmx_book_new_form, htmx_book_update, htmx_books_filter_apply, htmx_books_filter_reset,
    htmx_books_filter_set, htmx_books_filter_toggle, htmx_books_list,
};
pub use page::{page_books, BooksView};
