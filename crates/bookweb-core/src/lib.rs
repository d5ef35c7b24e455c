//! Core bookstore back-office logic
//!
//! API client, session, filter and paging state, and the generic
//! list-filter-mutate controller every list view is built on.

pub mod checkout;
pub mod client;
pub mod controller;
pub mod error;
pub mod filter;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod resource;
pub mod session;

pub use checkout::CheckoutComposer;
pub use client::ApiClient;
pub use controller::{ControllerState, ListController, Notice, NoticeKind};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use filter::{book_filters, FilterKind, FilterState, FilterValue};
pub use forms::{BookDraft, GenreDraft, LoginForm, RegisterForm};
pub use models::{Book, Genre, Identified, Transaction};
pub use pagination::PageCursor;
pub use resource::{BookResource, GenreResource, ListQuery, Page, Resource, ResourceLabels, TransactionResource};
pub use session::{FileTokenStore, GuardDecision, MemoryTokenStore, Session, SessionGuard, TokenStore};
