//! Authentication routes - Register, login, logout
//!
//! `/` and `/register` show the registration form. A successful login stores
//! the token in the session and lands on `/home`.

pub mod api;
pub mod page;

pub use api::{htmx_login, htmx_register, logout};
pub use page::{page_login, page_register};
