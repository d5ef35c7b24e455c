//! Books HTMX endpoints
//!
//! Endpoints:
//! - htmx_books_list: Refetch and render the list (also the retry target)
//! - htmx_books_filter_set: Record filter inputs, no fetch
//! - htmx_books_filter_apply: Record filter inputs and fetch
//! - htmx_books_filter_toggle: Flip a checkbox filter and fetch
//! - htmx_books_filter_reset: Clear every filter and fetch
//! - htmx_book_new_form / htmx_book_edit_form: Form modal
//! - htmx_book_create / htmx_book_update: Submit the form
//! - htmx_book_delete_request / _confirm / _cancel: Two-step delete

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use bookweb_core::{book_filters, BookDraft, BookResource, CoreResult, FilterKind, FilterValue, ListController, Notice};
use std::collections::HashMap;

use super::page::{render_book_form, render_books_list, render_books_section};
use crate::routes::field;
use crate::{ApiError, AppState};

const SAVE_FAILED: &str = "Failed to save book";

/// Parse every deferred filter input first, then record them all
fn record_filters(list: &mut ListController<BookResource>, form: &HashMap<String, String>) -> CoreResult<()> {
    let mut parsed: Vec<(&str, Option<FilterValue>)> = Vec::new();
    for (key, kind) in book_filters::ALL {
        if kind == FilterKind::Flag || !form.contains_key(key) {
            continue;
        }
        parsed.push((key, kind.parse(key, field(form, key))?));
    }
    for (key, value) in parsed {
        list.set_filter(key, value);
    }
    Ok(())
}

pub async fn htmx_books_list(state: State<AppState>) -> Html<String> {
    let mut view = state.books.write().await;
    view.list.refresh().await;
    Html(render_books_list(&view))
}

/// Pure state update; only a parse failure is rendered
pub async fn htmx_books_filter_set(state: State<AppState>, Form(form): Form<HashMap<String, String>>) -> Html<String> {
    let mut view = state.books.write().await;
    match record_filters(&mut view.list, &form) {
        Ok(()) => Html(String::new()),
        Err(e) => Html(crate::notice_html(&Notice::error(e.user_message("Invalid filter")))),
    }
}

pub async fn htmx_books_filter_apply(state: State<AppState>, Form(form): Form<HashMap<String, String>>) -> Html<String> {
    let mut view = state.books.write().await;
    match record_filters(&mut view.list, &form) {
        Ok(()) => {
            view.list.apply_filters().await;
        }
        Err(e) => view.list.reject(&e),
    }
    Html(render_books_list(&view))
}

/// Checkbox filters: a checked box posts its value, an unchecked one posts nothing
pub async fn htmx_books_filter_toggle(
    state: State<AppState>,
    Path(key): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if book_filters::kind_of(&key) != Some(FilterKind::Flag) {
        return ApiError::BadRequest {
            message: format!("'{}' is not a checkbox filter", key),
        }
        .into_response();
    }
    let checked = field(&form, &key) == "true";

    let mut view = state.books.write().await;
    view.list.toggle_filter(&key, checked).await;
    Html(render_books_list(&view)).into_response()
}

pub async fn htmx_books_filter_reset(state: State<AppState>) -> Html<String> {
    let mut view = state.books.write().await;
    view.list.reset_filters().await;
    Html(render_books_section(&view))
}

pub async fn htmx_book_new_form(state: State<AppState>) -> Html<String> {
    let view = state.books.read().await;
    Html(render_book_form(&view.genres, &BookDraft::default(), None, None))
}

/// Prefilled from the current snapshot; no fetch
pub async fn htmx_book_edit_form(state: State<AppState>, Path(id): Path<String>) -> Result<Html<String>, ApiError> {
    let view = state.books.read().await;
    let book = view.list.find(&id).ok_or_else(|| ApiError::NotFound {
        resource: format!("book {}", id),
    })?;
    Ok(Html(render_book_form(&view.genres, &BookDraft::from_book(book), Some(&id), None)))
}

pub async fn htmx_book_create(state: State<AppState>, Form(draft): Form<BookDraft>) -> Html<String> {
    submit(state, None, draft).await
}

pub async fn htmx_book_update(
    state: State<AppState>,
    Path(id): Path<String>,
    Form(draft): Form<BookDraft>,
) -> Html<String> {
    submit(state, Some(id), draft).await
}

/// Success closes the modal and swaps in the refetched list; failure keeps
/// the form open with the message and the typed values
async fn submit(state: State<AppState>, id: Option<String>, draft: BookDraft) -> Html<String> {
    let mut view = state.books.write().await;

    let payload = match draft.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            let notice = Notice::error(e.user_message(SAVE_FAILED));
            return Html(render_book_form(&view.genres, &draft, id.as_deref(), Some(&notice)));
        }
    };

    let saved = match &id {
        Some(id) => view.list.update(id, payload).await,
        None => view.list.create(payload).await,
    };

    if saved {
        Html(crate::oob("books-content", &render_books_list(&view)))
    } else {
        Html(render_book_form(&view.genres, &draft, id.as_deref(), view.list.notice()))
    }
}

pub async fn htmx_book_delete_request(state: State<AppState>, Path(id): Path<String>) -> Html<String> {
    let mut view = state.books.write().await;
    let title = view.list.find(&id).map(|b| b.title.clone()).unwrap_or_else(|| id.clone());
    view.list.request_delete(&id);
    Html(crate::delete_confirm_html("book", &title, "books"))
}

pub async fn htmx_book_delete_confirm(state: State<AppState>) -> Html<String> {
    let mut view = state.books.write().await;
    view.list.confirm_delete().await;
    Html(crate::oob("books-content", &render_books_list(&view)))
}

pub async fn htmx_book_delete_cancel(state: State<AppState>) -> Html<String> {
    state.books.write().await.list.cancel_delete();
    Html(String::new())
}
