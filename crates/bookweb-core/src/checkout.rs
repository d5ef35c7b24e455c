//! Transaction creation: several book/quantity selections in one request

use std::collections::BTreeMap;

use crate::controller::{ListController, Notice};
use crate::error::{CoreError, CoreResult};
use crate::models::{Book, CheckoutItem, CheckoutRequest};
use crate::resource::{ListQuery, Resource};

const EMPTY_SELECTION: &str = "Select at least one book to check out";
const CATALOGUE_FAILED: &str = "Failed to load books";

/// Draft of a checkout. Books the user never touched are absent from the
/// selection; a cleared input removes its entry again.
#[derive(Debug, Default)]
pub struct CheckoutComposer {
    open: bool,
    catalogue: Vec<Book>,
    selections: BTreeMap<String, u32>,
    notice: Option<Notice>,
}

impl CheckoutComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn catalogue(&self) -> &[Book] {
        &self.catalogue
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn quantity(&self, book_id: &str) -> Option<u32> {
        self.selections.get(book_id).copied()
    }

    pub fn selection_len(&self) -> usize {
        self.selections.len()
    }

    /// Start a fresh draft and load the books to choose from.
    ///
    /// The composer opens even when the catalogue cannot be loaded; the
    /// failure is shown inside it.
    pub async fn open<C>(&mut self, books: &C) -> bool
    where
        C: Resource<Item = Book>,
    {
        self.selections.clear();
        self.notice = None;
        self.open = true;

        match books.fetch(&ListQuery::default()).await {
            Ok(page) => {
                self.catalogue = page.items;
                true
            }
            Err(e) => {
                log::warn!(target: "bookweb::checkout", "Loading catalogue failed: {}", e);
                self.notice = Some(Notice::error(e.user_message(CATALOGUE_FAILED)));
                false
            }
        }
    }

    /// Record the raw text of one quantity input
    pub fn set_quantity(&mut self, book_id: &str, raw: &str) -> CoreResult<()> {
        let raw = raw.trim();
        if raw.is_empty() {
            self.selections.remove(book_id);
            return Ok(());
        }

        match raw.parse::<u32>() {
            Ok(quantity) => {
                self.selections.insert(book_id.to_string(), quantity);
                self.notice = None;
                Ok(())
            }
            Err(_) => {
                let error = CoreError::InvalidInput {
                    field: "quantity".to_string(),
                    message: format!("Quantity must be a whole number, got '{}'", raw),
                };
                self.notice = Some(Notice::error(error.user_message(EMPTY_SELECTION)));
                Err(error)
            }
        }
    }

    /// Payload for the whole selection, or a validation error when nothing
    /// positive was chosen
    pub fn to_request(&self) -> CoreResult<CheckoutRequest> {
        if !self.selections.values().any(|&q| q > 0) {
            return Err(CoreError::ValidationError {
                message: EMPTY_SELECTION.to_string(),
            });
        }
        Ok(CheckoutRequest {
            items: self
                .selections
                .iter()
                .map(|(book_id, &quantity)| CheckoutItem {
                    book_id: book_id.clone(),
                    quantity,
                })
                .collect(),
        })
    }

    /// Send the selection through the transactions controller.
    ///
    /// On success the draft is cleared and closed and the controller has
    /// already refetched its current page.
    pub async fn submit<R>(&mut self, transactions: &mut ListController<R>) -> bool
    where
        R: Resource<Payload = CheckoutRequest>,
    {
        let request = match self.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.notice = Some(Notice::error(e.user_message(EMPTY_SELECTION)));
                return false;
            }
        };

        if transactions.create(request).await {
            self.reset();
            true
        } else {
            self.notice = transactions.notice().cloned();
            false
        }
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.selections.clear();
        self.notice = None;
        self.open = false;
    }
}
