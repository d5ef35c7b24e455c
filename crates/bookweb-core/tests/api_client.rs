//! End-to-end list flows against an in-process backend

mod common;

use bookweb_core::forms::{LoginForm, RegisterForm};
use bookweb_core::{
    book_filters, BookDraft, BookResource, CheckoutComposer, ControllerState, CoreError, FilterValue, GenreResource,
    ListController, Notice, Session, TransactionResource,
};
use common::{Backend, TOKEN};

#[tokio::test]
async fn empty_filters_send_no_query() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let mut books = ListController::new(BookResource::new(common::client(&url, Session::in_memory())));

    assert!(books.mount().await);
    assert_eq!(books.items().len(), 10);

    books.set_filter(book_filters::QUERY, Some(FilterValue::Text("   ".to_string())));
    books.apply_filters().await;

    let seen = backend.lock().unwrap().requests_to("GET", "/books");
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|s| s.query.is_none()));
}

#[tokio::test]
async fn in_stock_is_only_sent_when_checked() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let mut books = ListController::new(BookResource::new(common::client(&url, Session::in_memory())));

    books.toggle_filter(book_filters::IN_STOCK, true).await;
    assert!(books.items().iter().all(|b| b.in_stock()));
    assert_eq!(books.items().len(), 7);

    books.toggle_filter(book_filters::IN_STOCK, false).await;
    assert_eq!(books.items().len(), 10);

    let queries: Vec<Option<String>> = backend
        .lock()
        .unwrap()
        .requests_to("GET", "/books")
        .into_iter()
        .map(|s| s.query)
        .collect();
    assert_eq!(queries, vec![Some("inStock=true".to_string()), None]);
}

#[tokio::test]
async fn price_range_narrows_catalogue() {
    let (url, _backend) = common::spawn(Backend::seeded()).await;
    let mut books = ListController::new(BookResource::new(common::client(&url, Session::in_memory())));

    books.set_filter(book_filters::MIN_PRICE, Some(FilterValue::Number(50.0)));
    books.set_filter(book_filters::MAX_PRICE, Some(FilterValue::Number(200.0)));
    assert!(books.apply_filters().await);

    let prices: Vec<f64> = books.items().iter().map(|b| b.price).collect();
    assert_eq!(prices, vec![50.0, 75.0, 100.0, 125.0, 150.0, 175.0, 200.0]);

    books.reset_filters().await;
    assert_eq!(books.items().len(), 10);
    assert!(books.filters().is_empty());
}

#[tokio::test]
async fn referenced_genre_stays_listed_after_failed_delete() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let mut genres = ListController::new(GenreResource::new(common::client(&url, Session::in_memory())));
    genres.mount().await;

    genres.request_delete("g1");
    assert!(!genres.confirm_delete().await);
    assert!(genres.find("g1").is_some());
    assert_eq!(genres.notice(), Some(&Notice::error("Genre is still used by books")));
    assert_eq!(backend.lock().unwrap().requests_to("GET", "/genre").len(), 1);

    genres.request_delete("g3");
    assert!(genres.confirm_delete().await);
    assert!(genres.find("g3").is_none());
    assert_eq!(genres.notice(), Some(&Notice::success("Genre deleted")));
}

#[tokio::test]
async fn failed_update_leaves_snapshot() {
    let (url, _backend) = common::spawn(Backend::seeded()).await;
    let mut books = ListController::new(BookResource::new(common::client(&url, Session::in_memory())));
    books.mount().await;
    let before = books.items().to_vec();

    let mut draft = BookDraft::from_book(&before[0]);
    draft.title = "Renamed".to_string();
    assert!(!books.update("missing", draft.to_payload().unwrap()).await);
    assert_eq!(books.items(), before.as_slice());
    assert_eq!(books.notice(), Some(&Notice::error("Book not found")));
}

#[tokio::test]
async fn created_book_shows_after_refetch() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let mut books = ListController::new(BookResource::new(common::client(&url, Session::in_memory())));
    books.mount().await;

    let draft = BookDraft {
        title: "New Book".to_string(),
        publication_year: "2020".to_string(),
        price: "42".to_string(),
        stock_quantity: "1".to_string(),
        genre_id: "g2".to_string(),
        ..Default::default()
    };
    assert!(books.create(draft.to_payload().unwrap()).await);
    assert_eq!(books.items().len(), 11);
    assert_eq!(books.items(), backend.lock().unwrap().books.as_slice());
    assert_eq!(books.state(), ControllerState::Idle);
}

#[tokio::test]
async fn bad_numeric_field_sends_nothing() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let mut books = ListController::new(BookResource::new(common::client(&url, Session::in_memory())));

    let draft = BookDraft {
        title: "New Book".to_string(),
        publication_year: "twenty".to_string(),
        price: "42".to_string(),
        stock_quantity: "1".to_string(),
        genre_id: "g2".to_string(),
        ..Default::default()
    };
    let err = draft.to_payload().unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { ref field, .. } if field == "publication_year"));
    books.reject(&err);

    assert!(books.notice().unwrap().is_error());
    assert!(backend.lock().unwrap().seen.is_empty());
}

#[tokio::test]
async fn paging_stays_within_total_pages() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let mut transactions = ListController::paginated(TransactionResource::new(common::client(&url, Session::in_memory())), 10);

    transactions.mount().await;
    assert_eq!(transactions.cursor().unwrap().total_pages(), 3);
    assert!(!transactions.prev_page().await);
    while transactions.next_page().await {}
    assert_eq!(transactions.cursor().unwrap().page(), 3);
    assert_eq!(transactions.items().len(), 3);
    assert!(!transactions.go_to_page(4).await);
    assert!(!transactions.go_to_page(0).await);

    let queries: Vec<String> = backend
        .lock()
        .unwrap()
        .requests_to("GET", "/transactions")
        .into_iter()
        .filter_map(|s| s.query)
        .collect();
    assert_eq!(queries, vec!["page=1&limit=10", "page=2&limit=10", "page=3&limit=10"]);
}

#[tokio::test]
async fn checkout_posts_items_and_refetches_current_page() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let client = common::client(&url, Session::in_memory());
    let mut transactions = ListController::paginated(TransactionResource::new(client.clone()), 10);
    transactions.mount().await;
    transactions.next_page().await;

    let mut composer = CheckoutComposer::new();
    assert!(!composer.submit(&mut transactions).await);
    assert!(backend.lock().unwrap().requests_to("POST", "/transactions").is_empty());

    assert!(composer.open(&BookResource::new(client)).await);
    assert_eq!(composer.catalogue().len(), 10);
    composer.set_quantity("b1", "2").unwrap();
    composer.set_quantity("b2", "1").unwrap();
    assert!(composer.submit(&mut transactions).await);
    assert!(!composer.is_open());

    let backend = backend.lock().unwrap();
    assert_eq!(backend.transactions.len(), 24);
    assert_eq!(backend.transactions[23].quantity, 3);
    let last = backend.seen.last().unwrap();
    assert_eq!(last.path, "/transactions");
    assert_eq!(last.query.as_deref(), Some("page=2&limit=10"));
}

#[tokio::test]
async fn login_stores_token_and_sends_bearer() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let session = Session::in_memory();
    let client = common::client(&url, session.clone());

    let form = LoginForm {
        email: "reader@example.com".to_string(),
        password: "wrong".to_string(),
    };
    let err = client.login(&form.into_request().unwrap()).await.unwrap_err();
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    assert!(!session.is_authenticated());

    let form = LoginForm {
        email: "reader@example.com".to_string(),
        password: "secret".to_string(),
    };
    let response = client.login(&form.into_request().unwrap()).await.unwrap();
    assert_eq!(response.message, "Login successful");
    assert_eq!(session.token().as_deref(), Some(TOKEN));

    let mut genres = ListController::new(GenreResource::new(client.clone()));
    genres.mount().await;
    let seen = backend.lock().unwrap().requests_to("GET", "/genre");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer token-abc"));

    client.logout().unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn register_returns_server_message_without_signing_in() {
    let (url, backend) = common::spawn(Backend::seeded()).await;
    let session = Session::in_memory();
    let client = common::client(&url, session.clone());

    let form = RegisterForm {
        username: "reader".to_string(),
        email: "reader@example.com".to_string(),
        password: "secret".to_string(),
    };
    let response = client.register(&form.into_request().unwrap()).await.unwrap();
    assert_eq!(response.message, "User registered");
    assert_eq!(response.data.email, "reader@example.com");
    assert!(response.data.updated_at.is_none());
    assert!(!session.is_authenticated());
    assert_eq!(backend.lock().unwrap().requests_to("POST", "/auth/register").len(), 1);
}

#[tokio::test]
async fn unreachable_backend_shows_transport_error() {
    let client = common::client("http://127.0.0.1:9", Session::in_memory());
    let mut genres = ListController::new(GenreResource::new(client));

    assert!(!genres.mount().await);
    assert_eq!(genres.state(), ControllerState::ErrorShown);
    let notice = genres.notice().unwrap();
    assert!(notice.is_error());
    assert!(!notice.text.is_empty());
}
