//! Genre routes - Genre list, create/edit, delete
//!
//! Structure:
//! - api.rs: HTMX endpoints
//! - page.rs: Full page rendering and shared fragments

pub mod api;
pub mod page;

pub use api::{
    htmx_genre_create, htmx_genre_delete_cancel, htmx_genre_delete_confirm, htmx_genre_delete_request,
    htmx_genre_edit_form, htmx_genre_update, htmx_genres_list,
};
pub use page::page_genres;
