//! Transactions HTMX endpoints
//!
//! Lock order is always checkout before transactions.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use bookweb_core::{BookResource, CheckoutComposer};

use super::page::{render_checkout, render_transactions_list};
use crate::routes::field;
use crate::AppState;

const QUANTITY_PREFIX: &str = "qty_";

pub async fn htmx_transactions_list(state: State<AppState>) -> Html<String> {
    let mut transactions = state.transactions.write().await;
    transactions.refresh().await;
    Html(render_transactions_list(&transactions))
}

pub async fn htmx_transactions_next(state: State<AppState>) -> Html<String> {
    let mut transactions = state.transactions.write().await;
    transactions.next_page().await;
    Html(render_transactions_list(&transactions))
}

pub async fn htmx_transactions_prev(state: State<AppState>) -> Html<String> {
    let mut transactions = state.transactions.write().await;
    transactions.prev_page().await;
    Html(render_transactions_list(&transactions))
}

/// Jump to a page; unparseable or out-of-range input leaves the list as is
pub async fn htmx_transactions_goto(state: State<AppState>, Form(form): Form<HashMap<String, String>>) -> Html<String> {
    let raw = field(&form, "page");
    let mut transactions = state.transactions.write().await;
    match raw.trim().parse::<u32>() {
        Ok(page) => {
            transactions.go_to_page(page).await;
        }
        Err(_) => log::debug!(target: "bookweb::transactions", "Ignoring page jump to '{}'", raw),
    }
    Html(render_transactions_list(&transactions))
}

pub async fn htmx_checkout_open(state: State<AppState>) -> Html<String> {
    let mut checkout = state.checkout.write().await;
    checkout.open(&BookResource::new(state.client.clone())).await;
    Html(render_checkout(&checkout))
}

/// Feed every `qty_<book id>` field to the composer, stopping at the first bad one
fn record_quantities(checkout: &mut CheckoutComposer, form: &HashMap<String, String>) -> bool {
    let mut fields: Vec<(&str, &str)> = form
        .iter()
        .filter_map(|(key, value)| key.strip_prefix(QUANTITY_PREFIX).map(|id| (id, value.as_str())))
        .collect();
    fields.sort();

    fields
        .into_iter()
        .all(|(book_id, raw)| checkout.set_quantity(book_id, raw).is_ok())
}

/// One quantity input changed; answers with the notice area
pub async fn htmx_checkout_quantity(state: State<AppState>, Form(form): Form<HashMap<String, String>>) -> Html<String> {
    let mut checkout = state.checkout.write().await;
    record_quantities(&mut checkout, &form);
    Html(crate::maybe_notice(checkout.notice()))
}

/// Send the whole selection as one transaction.
///
/// Success closes the modal and swaps the refetched list in; failure keeps
/// the composer open with the selection intact.
pub async fn htmx_checkout_submit(state: State<AppState>, Form(form): Form<HashMap<String, String>>) -> Html<String> {
    let mut checkout = state.checkout.write().await;
    if !record_quantities(&mut checkout, &form) {
        return Html(render_checkout(&checkout));
    }

    let mut transactions = state.transactions.write().await;
    if checkout.submit(&mut transactions).await {
        Html(crate::oob("transactions-content", &render_transactions_list(&transactions)))
    } else {
        Html(render_checkout(&checkout))
    }
}

pub async fn htmx_checkout_cancel(state: State<AppState>) -> Html<String> {
    state.checkout.write().await.cancel();
    Html(String::new())
}
