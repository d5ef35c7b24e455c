//! HTMX back office for the bookstore REST API
//!
//! Routes are organized into modules:
//! - routes::auth: Register, login, logout
//! - routes::books: Book catalogue with filters, create/edit/delete
//! - routes::genres: Genre list, create/edit/delete
//! - routes::transactions: Paginated transactions and checkout
//! - routes::session: Guard in front of every protected page

pub mod error;
pub mod routes;

use axum::{
    http::HeaderMap,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use bookweb_config::Config;
use bookweb_core::{
    ApiClient, CheckoutComposer, GenreResource, ListController, Notice, NoticeKind, TransactionResource,
};
use bookweb_utils::escape_html;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub use error::ApiError;
use routes::books::BooksView;

/// Application state
///
/// One controller per list view. Each sits behind its own lock; handlers
/// that need two locks take the checkout composer before the transactions
/// controller.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: ApiClient,
    pub books: Arc<RwLock<BooksView>>,
    pub genres: Arc<RwLock<ListController<GenreResource>>>,
    pub transactions: Arc<RwLock<ListController<TransactionResource>>>,
    pub checkout: Arc<RwLock<CheckoutComposer>>,
}

impl AppState {
    pub fn new(config: Config, client: ApiClient) -> Self {
        let per_page = config.pagination.transactions_per_page;
        Self {
            books: Arc::new(RwLock::new(BooksView::new(&client))),
            genres: Arc::new(RwLock::new(ListController::new(GenreResource::new(client.clone())))),
            transactions: Arc::new(RwLock::new(ListController::paginated(
                TransactionResource::new(client.clone()),
                per_page,
            ))),
            checkout: Arc::new(RwLock::new(CheckoutComposer::new())),
            config: Arc::new(config),
            client,
        }
    }

    pub fn genres_controller(&self) -> ListController<GenreResource> {
        ListController::new(GenreResource::new(self.client.clone()))
    }

    pub fn transactions_controller(&self) -> ListController<TransactionResource> {
        ListController::paginated(
            TransactionResource::new(self.client.clone()),
            self.config.pagination.transactions_per_page,
        )
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::auth::{htmx_login, htmx_register, logout, page_login, page_register};
    use routes::books::{
        htmx_book_create, htmx_book_delete_cancel, htmx_book_delete_confirm, htmx_book_delete_request,
        htmx_book_edit_form, htmx_book_new_form, htmx_book_update, htmx_books_filter_apply, htmx_books_filter_reset,
        htmx_books_filter_set, htmx_books_filter_toggle, htmx_books_list, page_books,
    };
    use routes::genres::{
        htmx_genre_create, htmx_genre_delete_cancel, htmx_genre_delete_confirm, htmx_genre_delete_request,
        htmx_genre_edit_form, htmx_genre_update, htmx_genres_list, page_genres,
    };
    use routes::transactions::{
        htmx_checkout_cancel, htmx_checkout_open, htmx_checkout_quantity, htmx_checkout_submit,
        htmx_transactions_goto, htmx_transactions_list, htmx_transactions_next, htmx_transactions_prev,
        page_transactions,
    };

    let protected = Router::new()
        .route("/home", get(page_home))
        // Books
        .route("/books", get(page_books).post(htmx_book_create))
        .route("/books/list", get(htmx_books_list))
        .route("/books/new", get(htmx_book_new_form))
        .route("/books/filters/set", post(htmx_books_filter_set))
        .route("/books/filters/apply", post(htmx_books_filter_apply))
        .route("/books/filters/toggle/:key", post(htmx_books_filter_toggle))
        .route("/books/filters/reset", post(htmx_books_filter_reset))
        .route("/books/item/:id", post(htmx_book_update))
        .route("/books/item/:id/edit", get(htmx_book_edit_form))
        .route("/books/item/:id/delete", get(htmx_book_delete_request))
        .route("/books/delete/confirm", post(htmx_book_delete_confirm))
        .route("/books/delete/cancel", post(htmx_book_delete_cancel))
        // Genres
        .route("/genres", get(page_genres).post(htmx_genre_create))
        .route("/genres/list", get(htmx_genres_list))
        .route("/genres/item/:id", post(htmx_genre_update))
        .route("/genres/item/:id/edit", get(htmx_genre_edit_form))
        .route("/genres/item/:id/delete", get(htmx_genre_delete_request))
        .route("/genres/delete/confirm", post(htmx_genre_delete_confirm))
        .route("/genres/delete/cancel", post(htmx_genre_delete_cancel))
        // Transactions
        .route("/transactions", get(page_transactions))
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/page/next", post(htmx_transactions_next))
        .route("/transactions/page/prev", post(htmx_transactions_prev))
        .route("/transactions/page", post(htmx_transactions_goto))
        .route("/transactions/checkout", get(htmx_checkout_open).post(htmx_checkout_submit))
        .route("/transactions/checkout/quantity", post(htmx_checkout_quantity))
        .route("/transactions/checkout/cancel", post(htmx_checkout_cancel))
        .route_layer(middleware::from_fn_with_state(state.clone(), routes::session::require_session));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/", get(page_register))
        .route("/register", get(page_register).post(htmx_register))
        .route("/login", get(page_login).post(htmx_login))
        .route("/logout", get(logout).post(logout))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Bookweb</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
    <div id='modal'></div>
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/home", "Home", "🏠"),
        ("/books", "Books", "📚"),
        ("/transactions", "Transactions", "🧾"),
        ("/genres", "Genres", "🏷️"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Bookweb</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, icon) in &links {
        let active_class = if current_path.starts_with(path) {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str(
        r#"</ul><div class='p-2 border-t'><form method='post' action='/logout'><button type='submit' class='w-full px-3 py-2 text-left text-red-600 rounded-lg hover:bg-red-50'>Logout</button></form></div></div>"#,
    );
    nav
}

/// Check if request is from HTMX (partial page update)
pub(crate) fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(
            r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#,
            inner_content
        )
    } else {
        base_html(
            title,
            &format!(
                r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
                nav_sidebar(current_path),
                inner_content
            ),
        )
    }
}

/// Centered card without navigation, for the public pages
pub fn card_page(title: &str, inner_content: &str) -> String {
    base_html(
        title,
        &format!(
            r#"<div class='min-h-screen flex items-center justify-center'>
    <div class='bg-white rounded-xl shadow-sm p-8 w-full max-w-md'>{}</div>
</div>"#,
            inner_content
        ),
    )
}

/// Inline status line
pub fn notice_html(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Success => "bg-green-50 border-green-200 text-green-700",
        NoticeKind::Error => "bg-red-50 border-red-200 text-red-700",
    };
    format!(
        r#"<div class='border rounded-lg px-4 py-2 mb-4 {}' role='status'>{}</div>"#,
        class,
        escape_html(&notice.text)
    )
}

pub(crate) fn maybe_notice(notice: Option<&Notice>) -> String {
    notice.map(notice_html).unwrap_or_default()
}

/// Modal overlay rendered into `#modal`
pub(crate) fn modal_html(title: &str, body: &str) -> String {
    format!(
        r#"<div class='fixed inset-0 bg-black bg-opacity-50 z-50 flex items-center justify-center'>
    <div class='bg-white rounded-xl shadow-2xl w-full max-w-2xl max-h-[90vh] overflow-y-auto p-6'>
        <h3 class='text-lg font-semibold mb-4'>{}</h3>
        {}
    </div>
</div>"#,
        escape_html(title),
        body
    )
}

/// Second step of a delete: cancel or confirm the pending item
pub(crate) fn delete_confirm_html(kind: &str, name: &str, area: &str) -> String {
    let body = format!(
        r#"<p class='mb-6'>Delete {} <strong>{}</strong>? This cannot be undone.</p>
        <div class='flex justify-end gap-2'>
            <button hx-post='/{}/delete/cancel' hx-target='#modal'
                class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Cancel</button>
            <button hx-post='/{}/delete/confirm' hx-target='#modal'
                class='px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700'>Delete</button>
        </div>"#,
        kind,
        escape_html(name),
        area,
        area
    );
    modal_html("Confirm delete", &body)
}

/// Replace an element elsewhere on the page alongside the main swap
pub(crate) fn oob(id: &str, content: &str) -> String {
    format!("<div id='{}' hx-swap-oob='true'>{}</div>", id, content)
}

/// Redirect that works for both plain and HTMX requests
pub(crate) fn redirect_to(headers: &HeaderMap, to: &str) -> Response {
    if is_htmx_request(headers) {
        ([("HX-Redirect", to.to_string())], "").into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

/// Landing page after login
async fn page_home(headers: HeaderMap) -> Html<String> {
    let cards = [
        ("/books", "Books", "Browse, filter and maintain the catalogue."),
        ("/genres", "Genres", "Manage the genres books are filed under."),
        ("/transactions", "Transactions", "Review purchases and check out new orders."),
    ];
    let links: String = cards
        .iter()
        .map(|(path, title, text)| {
            format!(
                r#"<a href='{}' class='block bg-white rounded-xl shadow-sm p-6 hover:shadow-md'><h3 class='text-lg font-semibold text-indigo-600'>{}</h3><p class='text-gray-500 mt-1'>{}</p></a>"#,
                path, title, text
            )
        })
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Bookstore Dashboard</h2>
        <p class='text-gray-500 mt-1'>Welcome to the book management system.</p></div>
        <div class='grid grid-cols-1 md:grid-cols-3 gap-4'>{}</div>"#,
        links
    );

    Html(page_response(&headers, "Home", "/home", &inner_content))
}

/// Start the HTTP server
pub async fn start_server(config: Config, client: ApiClient) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let upstream = client.base_url().to_string();
    let state = AppState::new(config, client);

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Bookweb server on http://{}", addr);
    log::info!("Upstream API: {}", upstream);
    log::info!("Available routes:");
    log::info!("  - /register, /login (Authentication)");
    log::info!("  - /books (Catalogue)");
    log::info!("  - /genres (Genres)");
    log::info!("  - /transactions (Transactions and checkout)");
    log::info!("  - /api/health");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
