//! Books page rendering
//!
//! Endpoints:
//! - page_books: Mounts a fresh view and renders the whole page
//!
//! Helper functions:
//! - render_books_section: Filter bar plus list, the target of a reset
//! - render_books_list: Status line and table
//! - render_book_form: Create/edit form for the modal

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use bookweb_core::{
    book_filters, ApiClient, BookDraft, BookResource, ControllerState, Genre, GenreResource, ListController,
    ListQuery, Notice, Resource,
};
use bookweb_utils::{escape_html, format_number, format_price};

use crate::AppState;

const GENRES_FAILED: &str = "Failed to load genres";
const INPUT_CLASS: &str = "px-3 py-2 border rounded-lg";

/// Everything the books page keeps between requests
pub struct BooksView {
    pub list: ListController<BookResource>,
    /// Reference data for the genre filter and the form select
    pub genres: Vec<Genre>,
    pub genre_notice: Option<Notice>,
}

impl BooksView {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            list: ListController::new(BookResource::new(client.clone())),
            genres: Vec::new(),
            genre_notice: None,
        }
    }

    /// Fresh filters and draft state, genres and books fetched again
    pub async fn mount(client: &ApiClient) -> Self {
        let mut view = Self::new(client);
        view.load_genres(client).await;
        view.list.mount().await;
        view
    }

    async fn load_genres(&mut self, client: &ApiClient) {
        match GenreResource::new(client.clone()).fetch(&ListQuery::default()).await {
            Ok(page) => {
                self.genres = page.items;
                self.genre_notice = None;
            }
            Err(e) => {
                log::warn!(target: "bookweb::books", "Loading genres failed: {}", e);
                self.genre_notice = Some(Notice::error(e.user_message(GENRES_FAILED)));
            }
        }
    }
}

/// Books page - filters, table and the add button
pub async fn page_books(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    let fresh = BooksView::mount(&state.client).await;
    let mut view = state.books.write().await;
    *view = fresh;

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Books</h2>
            <button hx-get='/books/new' hx-target='#modal'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Add book</button>
        </div>
        {}"#,
        render_books_section(&view)
    );

    Html(crate::page_response(&headers, "Books", "/books", &inner_content))
}

pub(crate) fn render_books_section(view: &BooksView) -> String {
    format!(
        r#"<div id='books-section'>{}<div id='books-content' class='bg-white rounded-xl shadow-sm p-6'>{}</div></div>"#,
        render_filter_bar(view),
        render_books_list(view)
    )
}

fn render_filter_bar(view: &BooksView) -> String {
    let filters = view.list.filters();
    let selected_genre = filters.display(book_filters::GENRE_ID);
    let genre_options: String = view
        .genres
        .iter()
        .map(|g| {
            format!(
                "<option value='{}' {}>{}</option>",
                escape_html(&g.id),
                if g.id == selected_genre { "selected" } else { "" },
                escape_html(&g.name)
            )
        })
        .collect();

    let number_input = |key: &str, placeholder: &str| {
        format!(
            r#"<input type='number' step='any' name='{}' placeholder='{}' value='{}' class='{} w-32'
                hx-post='/books/filters/set' hx-trigger='change' hx-target='#filter-notice'>"#,
            key,
            placeholder,
            escape_html(&filters.display(key)),
            INPUT_CLASS
        )
    };

    format!(
        r#"<form id='book-filters' class='bg-white rounded-xl shadow-sm p-4 mb-4 space-y-3' onsubmit='return false'>
            <div class='flex flex-wrap items-center gap-3'>
                <input type='text' name='{q}' placeholder='Search title or writer...' value='{q_value}' class='{input} w-64'
                    hx-post='/books/filters/set' hx-trigger='change' hx-target='#filter-notice'>
                <select name='{genre}' class='{input}' hx-post='/books/filters/set' hx-trigger='change' hx-target='#filter-notice'>
                    <option value=''>All genres</option>{genre_options}
                </select>
                {min_price}{max_price}{year_from}{year_to}
                <label class='flex items-center gap-2 text-sm'>
                    <input type='checkbox' name='{in_stock}' value='true' {checked}
                        hx-post='/books/filters/toggle/{in_stock}' hx-trigger='change' hx-target='#books-content'>
                    In stock only
                </label>
            </div>
            <div class='flex gap-2'>
                <button type='button' hx-post='/books/filters/apply' hx-target='#books-content'
                    class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Apply filters</button>
                <button type='button' hx-post='/books/filters/reset' hx-target='#books-section' hx-swap='outerHTML'
                    class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Reset</button>
                <span class='htmx-indicator text-sm text-gray-500 self-center'>Loading...</span>
            </div>
            <div id='filter-notice'></div>
        </form>"#,
        q = book_filters::QUERY,
        q_value = escape_html(&filters.display(book_filters::QUERY)),
        input = INPUT_CLASS,
        genre = book_filters::GENRE_ID,
        genre_options = genre_options,
        min_price = number_input(book_filters::MIN_PRICE, "Min price"),
        max_price = number_input(book_filters::MAX_PRICE, "Max price"),
        year_from = number_input(book_filters::YEAR_FROM, "Year from"),
        year_to = number_input(book_filters::YEAR_TO, "Year to"),
        in_stock = book_filters::IN_STOCK,
        checked = if filters.is_set(book_filters::IN_STOCK) { "checked" } else { "" },
    )
}

pub(crate) fn render_books_list(view: &BooksView) -> String {
    let list = &view.list;
    let mut html = crate::maybe_notice(view.genre_notice.as_ref());
    html.push_str(&crate::maybe_notice(list.notice()));

    if list.state() == ControllerState::ErrorShown {
        html.push_str(
            r#"<button hx-get='/books/list' hx-target='#books-content' class='mb-4 px-3 py-1 border rounded hover:bg-gray-100'>Retry</button>"#,
        );
    }

    if list.items().is_empty() {
        html.push_str(r#"<div class='text-center py-12 text-gray-500'><p>No books found</p></div>"#);
        return html;
    }

    html.push_str(
        r#"<div class='overflow-x-auto'>
        <table class='w-full'>
            <thead class='bg-gray-50'>
                <tr>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Title</th>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Writer</th>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Publisher</th>
                    <th class='px-4 py-3 text-right text-sm font-medium text-gray-600'>Year</th>
                    <th class='px-4 py-3 text-right text-sm font-medium text-gray-600'>Price</th>
                    <th class='px-4 py-3 text-right text-sm font-medium text-gray-600'>Stock</th>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Genre</th>
                    <th class='px-4 py-3'></th>
                </tr>
            </thead>
            <tbody class='divide-y divide-gray-100'>"#,
    );

    for book in list.items() {
        let id = urlencoding::encode(&book.id);
        let stock_class = if book.in_stock() { "" } else { "text-red-600" };
        html.push_str(&format!(
            r#"<tr class='hover:bg-gray-50'>
                <td class='px-4 py-3 font-medium'>{}</td>
                <td class='px-4 py-3'>{}</td>
                <td class='px-4 py-3 text-gray-500'>{}</td>
                <td class='px-4 py-3 text-right'>{}</td>
                <td class='px-4 py-3 text-right'>{}</td>
                <td class='px-4 py-3 text-right {}'>{}</td>
                <td class='px-4 py-3'>{}</td>
                <td class='px-4 py-3 text-right whitespace-nowrap'>
                    <button hx-get='/books/item/{}/edit' hx-target='#modal' class='px-2 py-1 text-sm text-indigo-600 hover:underline'>Edit</button>
                    <button hx-get='/books/item/{}/delete' hx-target='#modal' class='px-2 py-1 text-sm text-red-600 hover:underline'>Delete</button>
                </td>
            </tr>"#,
            escape_html(&book.title),
            escape_html(&book.writer),
            escape_html(&book.publisher),
            book.publication_year,
            format_price(book.price),
            stock_class,
            format_number(book.stock_quantity),
            escape_html(book.genre_name()),
            id,
            id
        ));
    }

    html.push_str("</tbody></table></div>");
    html
}

/// Create form when `editing` is `None`, edit form otherwise
pub(crate) fn render_book_form(genres: &[Genre], draft: &BookDraft, editing: Option<&str>, notice: Option<&Notice>) -> String {
    let (title, action) = match editing {
        Some(id) => ("Edit book", format!("/books/item/{}", urlencoding::encode(id))),
        None => ("Add book", "/books".to_string()),
    };
    let genre_options: String = genres
        .iter()
        .map(|g| {
            format!(
                "<option value='{}' {}>{}</option>",
                escape_html(&g.id),
                if g.id == draft.genre_id { "selected" } else { "" },
                escape_html(&g.name)
            )
        })
        .collect();

    let text_input = |name: &str, label: &str, value: &str, kind: &str| {
        format!(
            r#"<label class='block'><span class='text-sm text-gray-600'>{}</span>
                <input type='{}' name='{}' value='{}' class='{} w-full'></label>"#,
            label,
            kind,
            name,
            escape_html(value),
            INPUT_CLASS
        )
    };

    let body = format!(
        r#"{}
        <form hx-post='{}' hx-target='#modal' class='grid grid-cols-2 gap-3'>
            {}{}{}{}{}{}
            <label class='block'><span class='text-sm text-gray-600'>Genre</span>
                <select name='genre_id' class='{} w-full'><option value=''>Choose a genre</option>{}</select></label>
            <label class='block col-span-2'><span class='text-sm text-gray-600'>Description</span>
                <textarea name='description' rows='3' class='{} w-full'>{}</textarea></label>
            <div class='col-span-2 flex justify-end gap-2 mt-2'>
                <button type='button' onclick="document.getElementById('modal').innerHTML=''"
                    class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Cancel</button>
                <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save</button>
            </div>
        </form>"#,
        crate::maybe_notice(notice),
        action,
        text_input("title", "Title", &draft.title, "text"),
        text_input("writer", "Writer", &draft.writer, "text"),
        text_input("publisher", "Publisher", &draft.publisher, "text"),
        text_input("publication_year", "Publication year", &draft.publication_year, "text"),
        text_input("price", "Price", &draft.price, "text"),
        text_input("stock_quantity", "Stock", &draft.stock_quantity, "text"),
        INPUT_CLASS,
        genre_options,
        INPUT_CLASS,
        escape_html(&draft.description)
    );

    crate::modal_html(title, &body)
}
