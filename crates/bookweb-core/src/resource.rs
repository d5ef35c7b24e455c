//! Capability set behind every list view
//!
//! A [`Resource`] is `{fetch, create, update, delete}` for one entity. The
//! generic controller drives any of them the same way.

use crate::client::{item_path, ApiClient};
use crate::error::{CoreError, CoreResult};
use crate::filter::FilterState;
use crate::models::{
    Book, BookPayload, CheckoutRequest, Genre, GenrePayload, Identified, ListEnvelope, PaginationMeta, Transaction,
};
use async_trait::async_trait;
use reqwest::Method;

/// Filter plus optional paging for one fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filters: FilterState,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = self.filters.to_query();
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// One fetched page of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<PaginationMeta>,
}

impl<T> From<ListEnvelope<T>> for Page<T> {
    fn from(envelope: ListEnvelope<T>) -> Self {
        Self {
            items: envelope.data,
            meta: envelope.meta,
        }
    }
}

/// Status texts a resource shows after each operation
#[derive(Debug, Clone, Copy)]
pub struct ResourceLabels {
    pub load_failed: &'static str,
    pub created: &'static str,
    pub create_failed: &'static str,
    pub updated: &'static str,
    pub update_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
}

#[async_trait]
pub trait Resource: Send + Sync {
    type Item: Identified + Clone + Send + Sync;
    type Payload: Send + Sync;

    /// Short name for logs
    const NAME: &'static str;
    const LABELS: ResourceLabels;

    async fn fetch(&self, query: &ListQuery) -> CoreResult<Page<Self::Item>>;
    async fn create(&self, payload: &Self::Payload) -> CoreResult<()>;
    async fn update(&self, id: &str, payload: &Self::Payload) -> CoreResult<()>;
    async fn delete(&self, id: &str) -> CoreResult<()>;
}

// ==================== Books ====================

#[derive(Clone, Debug)]
pub struct BookResource {
    client: ApiClient,
}

impl BookResource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for BookResource {
    type Item = Book;
    type Payload = BookPayload;

    const NAME: &'static str = "books";
    const LABELS: ResourceLabels = ResourceLabels {
        load_failed: "Failed to load books",
        created: "Book added",
        create_failed: "Failed to save book",
        updated: "Book updated",
        update_failed: "Failed to save book",
        deleted: "Book deleted",
        delete_failed: "Failed to delete book",
    };

    async fn fetch(&self, query: &ListQuery) -> CoreResult<Page<Book>> {
        let envelope: ListEnvelope<Book> = self.client.get_json("books", &query.to_params()).await?;
        Ok(envelope.into())
    }

    async fn create(&self, payload: &BookPayload) -> CoreResult<()> {
        self.client.send(Method::POST, "books", Some(payload)).await
    }

    async fn update(&self, id: &str, payload: &BookPayload) -> CoreResult<()> {
        self.client.send(Method::PATCH, &item_path("books", id), Some(payload)).await
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.client.send::<()>(Method::DELETE, &item_path("books", id), None).await
    }
}

// ==================== Genres ====================

#[derive(Clone, Debug)]
pub struct GenreResource {
    client: ApiClient,
}

impl GenreResource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for GenreResource {
    type Item = Genre;
    type Payload = GenrePayload;

    const NAME: &'static str = "genres";
    const LABELS: ResourceLabels = ResourceLabels {
        load_failed: "Failed to load genres",
        created: "Genre added",
        create_failed: "Failed to add genre",
        updated: "Genre updated",
        update_failed: "Failed to update genre",
        deleted: "Genre deleted",
        delete_failed: "Failed to delete genre",
    };

    async fn fetch(&self, query: &ListQuery) -> CoreResult<Page<Genre>> {
        let envelope: ListEnvelope<Genre> = self.client.get_json("genre", &query.to_params()).await?;
        Ok(envelope.into())
    }

    async fn create(&self, payload: &GenrePayload) -> CoreResult<()> {
        self.client.send(Method::POST, "genre", Some(payload)).await
    }

    async fn update(&self, id: &str, payload: &GenrePayload) -> CoreResult<()> {
        self.client.send(Method::PATCH, &item_path("genre", id), Some(payload)).await
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.client.send::<()>(Method::DELETE, &item_path("genre", id), None).await
    }
}

// ==================== Transactions ====================

/// Transactions can only be listed and created
#[derive(Clone, Debug)]
pub struct TransactionResource {
    client: ApiClient,
}

impl TransactionResource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for TransactionResource {
    type Item = Transaction;
    type Payload = CheckoutRequest;

    const NAME: &'static str = "transactions";
    const LABELS: ResourceLabels = ResourceLabels {
        load_failed: "Failed to load transactions",
        created: "Transaction created",
        create_failed: "Failed to create transaction",
        updated: "Transaction updated",
        update_failed: "Failed to update transaction",
        deleted: "Transaction deleted",
        delete_failed: "Failed to delete transaction",
    };

    async fn fetch(&self, query: &ListQuery) -> CoreResult<Page<Transaction>> {
        let envelope: ListEnvelope<Transaction> = self.client.get_json("transactions", &query.to_params()).await?;
        Ok(envelope.into())
    }

    async fn create(&self, payload: &CheckoutRequest) -> CoreResult<()> {
        self.client.send(Method::POST, "transactions", Some(payload)).await
    }

    async fn update(&self, _id: &str, _payload: &CheckoutRequest) -> CoreResult<()> {
        Err(CoreError::NotSupported {
            operation: "update transaction".to_string(),
        })
    }

    async fn delete(&self, _id: &str) -> CoreResult<()> {
        Err(CoreError::NotSupported {
            operation: "delete transaction".to_string(),
        })
    }
}
