//! Generic list-filter-mutate controller
//!
//! One instance per list view. It owns the filter state, the page cursor
//! and the last fetched snapshot. Every successful mutation is followed by a
//! full refetch of the current page and filter; the snapshot is only ever
//! replaced by a fetch response.

use crate::error::CoreError;
use crate::filter::{FilterState, FilterValue};
use crate::models::Identified;
use crate::pagination::PageCursor;
use crate::resource::{ListQuery, Resource};

/// Fetch lifecycle of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Loading,
    ErrorShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Inline status line shown above a list or inside a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Outcome of a single fetch
enum Fetched {
    Current,
    /// Rows arrived but the cursor had to move back into range
    Clamped,
    Failed,
}

pub struct ListController<R: Resource> {
    resource: R,
    filters: FilterState,
    cursor: Option<PageCursor>,
    items: Vec<R::Item>,
    state: ControllerState,
    notice: Option<Notice>,
    pending_delete: Option<String>,
}

impl<R: Resource> ListController<R> {
    /// Controller for an endpoint that returns the whole collection
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            filters: FilterState::new(),
            cursor: None,
            items: Vec::new(),
            state: ControllerState::Idle,
            notice: None,
            pending_delete: None,
        }
    }

    /// Controller for an endpoint taking `page` and `limit`
    pub fn paginated(resource: R, page_size: u32) -> Self {
        let mut controller = Self::new(resource);
        controller.cursor = Some(PageCursor::new(page_size));
        controller
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&R::Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    fn query(&self) -> ListQuery {
        ListQuery {
            filters: self.filters.clone(),
            page: self.cursor.map(|c| c.page()),
            limit: self.cursor.map(|c| c.limit()),
        }
    }

    /// Show a failure that happened before any request, e.g. a bad form field
    pub fn reject(&mut self, error: &CoreError) {
        self.notice = Some(Notice::error(error.user_message(R::LABELS.create_failed)));
    }

    // ==================== Fetching ====================

    /// First load of the view
    pub async fn mount(&mut self) -> bool {
        self.refresh().await
    }

    /// Fetch the current page with the current filters.
    ///
    /// Returns whether the fetch succeeded. On failure the previous snapshot
    /// stays in place and the error becomes the notice. When the server now
    /// reports fewer pages than the cursor points at, the cursor is clamped
    /// and the clamped page is fetched once more.
    pub async fn refresh(&mut self) -> bool {
        match self.fetch_current().await {
            Fetched::Current => true,
            Fetched::Clamped => !matches!(self.fetch_current().await, Fetched::Failed),
            Fetched::Failed => false,
        }
    }

    async fn fetch_current(&mut self) -> Fetched {
        self.state = ControllerState::Loading;
        let query = self.query();
        log::debug!(target: "bookweb::controller", "Fetching {} {:?}", R::NAME, query.to_params());

        match self.resource.fetch(&query).await {
            Ok(page) => {
                let mut clamped = false;
                if let (Some(cursor), Some(meta)) = (self.cursor.as_mut(), page.meta.as_ref()) {
                    clamped = cursor.revalidate(meta);
                }
                self.items = page.items;
                self.notice = None;
                self.state = ControllerState::Idle;
                if clamped {
                    Fetched::Clamped
                } else {
                    Fetched::Current
                }
            }
            Err(e) => {
                log::log!(
                    target: "bookweb::controller",
                    e.severity().log_level(),
                    "Fetching {} failed [{}]: {}",
                    R::NAME,
                    e.code(),
                    e
                );
                self.notice = Some(Notice::error(e.user_message(R::LABELS.load_failed)));
                self.state = ControllerState::ErrorShown;
                Fetched::Failed
            }
        }
    }

    // ==================== Filters ====================

    /// Pure state update, no fetch
    pub fn set_filter(&mut self, key: &str, value: Option<FilterValue>) {
        self.filters.set(key, value);
    }

    /// Deferred filters (text, numbers) take effect here
    pub async fn apply_filters(&mut self) -> bool {
        self.refresh().await
    }

    /// Checkbox filters refetch immediately
    pub async fn toggle_filter(&mut self, key: &str, checked: bool) -> bool {
        self.set_filter(key, Some(FilterValue::Flag(checked)));
        self.refresh().await
    }

    /// Drop every constraint and fetch unconstrained
    pub async fn reset_filters(&mut self) -> bool {
        self.filters.clear();
        self.refresh().await
    }

    // ==================== Pagination ====================

    /// Returns whether a fetch was issued
    pub async fn next_page(&mut self) -> bool {
        match self.cursor.and_then(|c| c.next()) {
            Some(page) => self.load_page(page).await,
            None => false,
        }
    }

    /// Returns whether a fetch was issued
    pub async fn prev_page(&mut self) -> bool {
        match self.cursor.and_then(|c| c.prev()) {
            Some(page) => self.load_page(page).await,
            None => false,
        }
    }

    /// Jump to a page; out-of-range pages issue nothing
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        match self.cursor.and_then(|c| c.target(page)) {
            Some(page) => self.load_page(page).await,
            None => false,
        }
    }

    /// The cursor only stays on `page` if its rows arrived
    async fn load_page(&mut self, page: u32) -> bool {
        let previous = self.cursor.map(|c| c.page());
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.move_to(page);
        }
        if !self.refresh().await {
            if let (Some(cursor), Some(previous)) = (self.cursor.as_mut(), previous) {
                cursor.move_to(previous);
            }
        }
        true
    }

    // ==================== Mutations ====================

    pub async fn create(&mut self, payload: R::Payload) -> bool {
        log::debug!(target: "bookweb::controller", "Creating in {}", R::NAME);
        let result = self.resource.create(&payload).await;
        self.after_mutation(result, R::LABELS.created, R::LABELS.create_failed).await
    }

    pub async fn update(&mut self, id: &str, payload: R::Payload) -> bool {
        log::debug!(target: "bookweb::controller", "Updating {} {}", R::NAME, id);
        let result = self.resource.update(id, &payload).await;
        self.after_mutation(result, R::LABELS.updated, R::LABELS.update_failed).await
    }

    /// First step of a delete: remember what to delete, send nothing
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step of a delete. Without a pending request nothing is sent.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        log::debug!(target: "bookweb::controller", "Deleting {} {}", R::NAME, id);
        let result = self.resource.delete(&id).await;
        self.after_mutation(result, R::LABELS.deleted, R::LABELS.delete_failed).await
    }

    async fn after_mutation(
        &mut self,
        result: Result<(), CoreError>,
        success: &str,
        failure: &str,
    ) -> bool {
        match result {
            Ok(()) => {
                if self.refresh().await {
                    self.notice = Some(Notice::success(success));
                }
                true
            }
            Err(e) => {
                log::log!(
                    target: "bookweb::controller",
                    e.severity().log_level(),
                    "Mutation on {} failed [{}]: {}",
                    R::NAME,
                    e.code(),
                    e
                );
                self.notice = Some(Notice::error(e.user_message(failure)));
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::CoreResult;
    use crate::models::{Genre, GenrePayload, PaginationMeta};
    use crate::resource::{Page, ResourceLabels};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// In-memory backend for genres with call recording and failure injection
    #[derive(Default)]
    pub(crate) struct FakeGenres {
        pub rows: Mutex<Vec<Genre>>,
        pub fetches: Mutex<Vec<ListQuery>>,
        pub mutations: Mutex<Vec<String>>,
        pub fail_fetch: Mutex<bool>,
        pub page_size: Option<u32>,
        pub referenced: Vec<String>,
    }

    impl FakeGenres {
        pub fn with(names: &[&str]) -> Arc<Self> {
            let rows = names
                .iter()
                .enumerate()
                .map(|(i, name)| Genre {
                    id: format!("g{}", i + 1),
                    name: name.to_string(),
                    description: None,
                })
                .collect();
            Arc::new(Self {
                rows: Mutex::new(rows),
                ..Default::default()
            })
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Resource for Arc<FakeGenres> {
        type Item = Genre;
        type Payload = GenrePayload;

        const NAME: &'static str = "fake genres";
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
            self.fetches.lock().unwrap().push(query.clone());
            if *self.fail_fetch.lock().unwrap() {
                return Err(CoreError::Transport { message: "connection refused".to_string() });
            }
            let rows = self.rows.lock().unwrap().clone();
            match (self.page_size, query.page) {
                (Some(size), Some(page)) => {
                    let total = rows.len() as u64;
                    let total_pages = ((total + u64::from(size) - 1) / u64::from(size)) as u32;
                    let items = rows
                        .into_iter()
                        .skip(((page - 1) * size) as usize)
                        .take(size as usize)
                        .collect();
                    Ok(Page {
                        items,
                        meta: Some(PaginationMeta {
                            page,
                            limit: size,
                            total_items: total,
                            total_pages,
                        }),
                    })
                }
                _ => Ok(Page { items: rows, meta: None }),
            }
        }

        async fn create(&self, payload: &GenrePayload) -> CoreResult<()> {
            self.mutations.lock().unwrap().push(format!("create {}", payload.name));
            let mut rows = self.rows.lock().unwrap();
            let id = format!("g{}", rows.len() + 1);
            rows.push(Genre {
                id,
                name: payload.name.clone(),
                description: Some(payload.description.clone()),
            });
            Ok(())
        }

        async fn update(&self, id: &str, payload: &GenrePayload) -> CoreResult<()> {
            self.mutations.lock().unwrap().push(format!("update {}", id));
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|g| g.id == id) {
                Some(genre) => {
                    genre.name = payload.name.clone();
                    Ok(())
                }
                None => Err(CoreError::Server { status: 404, message: Some("Genre not found".to_string()) }),
            }
        }

        async fn delete(&self, id: &str) -> CoreResult<()> {
            self.mutations.lock().unwrap().push(format!("delete {}", id));
            if self.referenced.iter().any(|r| r == id) {
                return Err(CoreError::Server {
                    status: 400,
                    message: Some("Genre is used by existing books".to_string()),
                });
            }
            self.rows.lock().unwrap().retain(|g| g.id != id);
            Ok(())
        }
    }

    fn payload(name: &str) -> GenrePayload {
        GenrePayload {
            name: name.to_string(),
            description: String::new(),
        }
    }

    fn names(controller: &ListController<Arc<FakeGenres>>) -> Vec<String> {
        controller.items().iter().map(|g| g.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_mount_loads_snapshot() {
        let fake = FakeGenres::with(&["Fantasy", "Horror"]);
        let mut controller = ListController::new(fake.clone());
        assert!(controller.mount().await);
        assert_eq!(names(&controller), vec!["Fantasy", "Horror"]);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.notice().is_none());
        assert_eq!(fake.fetches.lock().unwrap()[0].page, None);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_snapshot() {
        let fake = FakeGenres::with(&["Fantasy"]);
        let mut controller = ListController::new(fake.clone());
        controller.mount().await;

        *fake.fail_fetch.lock().unwrap() = true;
        assert!(!controller.refresh().await);
        assert_eq!(controller.state(), ControllerState::ErrorShown);
        assert_eq!(names(&controller), vec!["Fantasy"]);
        assert_eq!(controller.notice(), Some(&Notice::error("connection refused")));

        *fake.fail_fetch.lock().unwrap() = false;
        assert!(controller.refresh().await);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.notice().is_none());
    }

    #[tokio::test]
    async fn test_create_refetches_from_server() {
        let fake = FakeGenres::with(&["Fantasy"]);
        let mut controller = ListController::new(fake.clone());
        controller.mount().await;

        assert!(controller.create(payload("Poetry")).await);
        assert_eq!(fake.fetch_count(), 2);
        assert_eq!(names(&controller), vec!["Fantasy", "Poetry"]);
        assert_eq!(controller.notice(), Some(&Notice::success("Genre added")));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_snapshot() {
        let fake = FakeGenres::with(&["Fantasy"]);
        let mut controller = ListController::new(fake.clone());
        controller.mount().await;
        let before = controller.items().to_vec();

        assert!(!controller.update("g99", payload("Nope")).await);
        assert_eq!(controller.items(), before.as_slice());
        assert_eq!(fake.fetch_count(), 1);
        assert_eq!(controller.notice(), Some(&Notice::error("Genre not found")));
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let fake = FakeGenres::with(&["Fantasy", "Horror"]);
        let mut controller = ListController::new(fake.clone());
        controller.mount().await;

        assert!(!controller.confirm_delete().await);
        assert!(fake.mutations.lock().unwrap().is_empty());

        controller.request_delete("g1");
        controller.cancel_delete();
        assert!(!controller.confirm_delete().await);
        assert!(fake.mutations.lock().unwrap().is_empty());

        controller.request_delete("g1");
        assert_eq!(controller.pending_delete(), Some("g1"));
        assert!(controller.confirm_delete().await);
        assert_eq!(names(&controller), vec!["Horror"]);
        assert!(controller.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_referenced_genre_survives_failed_delete() {
        let fake = Arc::new(FakeGenres {
            rows: Mutex::new(vec![Genre { id: "g1".to_string(), name: "Fantasy".to_string(), description: None }]),
            referenced: vec!["g1".to_string()],
            ..Default::default()
        });
        let mut controller = ListController::new(fake.clone());
        controller.mount().await;

        controller.request_delete("g1");
        assert!(!controller.confirm_delete().await);
        assert_eq!(names(&controller), vec!["Fantasy"]);
        assert_eq!(controller.notice(), Some(&Notice::error("Genre is used by existing books")));
    }

    #[tokio::test]
    async fn test_filters_are_deferred_until_applied() {
        let fake = FakeGenres::with(&["Fantasy"]);
        let mut controller = ListController::new(fake.clone());
        controller.mount().await;

        controller.set_filter("q", Some(FilterValue::Text("fan".to_string())));
        assert_eq!(fake.fetch_count(), 1);

        controller.apply_filters().await;
        assert_eq!(fake.fetch_count(), 2);
        assert_eq!(fake.fetches.lock().unwrap()[1].to_params(), vec![("q".to_string(), "fan".to_string())]);
    }

    #[tokio::test]
    async fn test_toggle_fetches_immediately_and_reset_clears() {
        let fake = FakeGenres::with(&["Fantasy"]);
        let mut controller = ListController::new(fake.clone());
        controller.mount().await;

        controller.toggle_filter("inStock", true).await;
        controller.toggle_filter("inStock", false).await;
        controller.set_filter("q", Some(FilterValue::Text("x".to_string())));
        controller.reset_filters().await;

        let fetches = fake.fetches.lock().unwrap();
        assert_eq!(fetches.len(), 4);
        assert_eq!(fetches[1].to_params(), vec![("inStock".to_string(), "true".to_string())]);
        assert!(fetches[2].to_params().is_empty());
        assert!(fetches[3].to_params().is_empty());
    }

    #[tokio::test]
    async fn test_paging_never_leaves_range() {
        let fake = Arc::new(FakeGenres {
            page_size: Some(2),
            ..Default::default()
        });
        *fake.rows.lock().unwrap() = (1..=5)
            .map(|i| Genre { id: format!("g{}", i), name: format!("G{}", i), description: None })
            .collect();
        let mut controller = ListController::paginated(fake.clone(), 2);
        controller.mount().await;
        assert_eq!(controller.cursor().unwrap().total_pages(), 3);

        assert!(!controller.prev_page().await);
        assert!(controller.next_page().await);
        assert!(controller.next_page().await);
        assert!(!controller.next_page().await);
        assert!(!controller.go_to_page(0).await);
        assert!(!controller.go_to_page(4).await);
        assert!(controller.prev_page().await);

        let pages: Vec<Option<u32>> = fake.fetches.lock().unwrap().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![Some(1), Some(2), Some(3), Some(2)]);
        assert!(fake.fetches.lock().unwrap().iter().all(|q| q.limit == Some(2)));
    }

    fn paged_genres(count: usize, page_size: u32) -> Arc<FakeGenres> {
        let fake = Arc::new(FakeGenres {
            page_size: Some(page_size),
            ..Default::default()
        });
        *fake.rows.lock().unwrap() = (1..=count)
            .map(|i| Genre { id: format!("g{}", i), name: format!("G{}", i), description: None })
            .collect();
        fake
    }

    #[tokio::test]
    async fn test_shrunk_collection_refetches_clamped_page() {
        let fake = paged_genres(5, 2);
        let mut controller = ListController::paginated(fake.clone(), 2);
        controller.mount().await;
        controller.go_to_page(3).await;
        assert_eq!(names(&controller), vec!["G5"]);

        fake.rows.lock().unwrap().truncate(2);
        assert!(controller.refresh().await);

        let cursor = controller.cursor().unwrap();
        assert_eq!((cursor.page(), cursor.total_pages()), (1, 1));
        assert_eq!(names(&controller), vec!["G1", "G2"]);
        let pages: Vec<Option<u32>> = fake.fetches.lock().unwrap().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![Some(1), Some(3), Some(3), Some(1)]);
    }

    #[tokio::test]
    async fn test_failed_page_change_keeps_cursor_with_rows() {
        let fake = paged_genres(5, 2);
        let mut controller = ListController::paginated(fake.clone(), 2);
        controller.mount().await;

        *fake.fail_fetch.lock().unwrap() = true;
        assert!(controller.next_page().await);
        assert_eq!(controller.state(), ControllerState::ErrorShown);
        assert_eq!(controller.cursor().unwrap().page(), 1);
        assert!(!controller.cursor().unwrap().can_prev());
        assert_eq!(names(&controller), vec!["G1", "G2"]);

        *fake.fail_fetch.lock().unwrap() = false;
        assert!(controller.next_page().await);
        assert_eq!(controller.cursor().unwrap().page(), 2);
        assert_eq!(names(&controller), vec!["G3", "G4"]);
    }

    #[tokio::test]
    async fn test_mutation_keeps_current_page() {
        let fake = Arc::new(FakeGenres {
            page_size: Some(2),
            ..Default::default()
        });
        *fake.rows.lock().unwrap() = (1..=3)
            .map(|i| Genre { id: format!("g{}", i), name: format!("G{}", i), description: None })
            .collect();
        let mut controller = ListController::paginated(fake.clone(), 2);
        controller.mount().await;
        controller.next_page().await;

        controller.create(payload("G4")).await;
        assert_eq!(fake.fetches.lock().unwrap().last().unwrap().page, Some(2));
        assert_eq!(names(&controller), vec!["G3", "G4"]);
    }

    #[tokio::test]
    async fn test_reject_shows_local_error_without_request() {
        let fake = FakeGenres::with(&[]);
        let mut controller = ListController::new(fake.clone());
        controller.reject(&CoreError::ValidationError { message: "Genre name is required".to_string() });
        assert_eq!(controller.notice(), Some(&Notice::error("Genre name is required")));
        assert_eq!(fake.fetch_count(), 0);
    }
}
