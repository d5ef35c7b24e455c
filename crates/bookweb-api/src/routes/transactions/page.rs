//! Transactions page rendering
//!
//! Helper functions:
//! - render_transactions_list: Status line, table and pager
//! - render_pager: Previous/next buttons and page jump
//! - render_checkout: Checkout composer modal

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use bookweb_core::{CheckoutComposer, ControllerState, ListController, PageCursor, Transaction, TransactionResource};
use bookweb_utils::{escape_html, format_number, format_price};

use crate::AppState;

/// Transactions page - mounts a fresh list and discards any checkout draft
pub async fn page_transactions(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    let mut fresh = state.transactions_controller();
    fresh.mount().await;

    *state.checkout.write().await = CheckoutComposer::new();
    let mut transactions = state.transactions.write().await;
    *transactions = fresh;

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>My Transactions</h2>
            <button hx-get='/transactions/checkout' hx-target='#modal'
                class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>New transaction</button>
        </div>
        <div id='transactions-content' class='bg-white rounded-xl shadow-sm p-6'>{}</div>"#,
        render_transactions_list(&transactions)
    );

    Html(crate::page_response(&headers, "Transactions", "/transactions", &inner_content))
}

fn render_order_items(tx: &Transaction) -> String {
    if tx.order_items.is_empty() {
        return "<span class='text-gray-400'>-</span>".to_string();
    }
    let mut html = String::from("<ul class='space-y-1 text-sm'>");
    for item in &tx.order_items {
        let (title, price, genre) = match &item.book {
            Some(book) => (
                book.title.as_str(),
                format_price(book.price),
                book.genre.as_ref().map(|g| g.name.as_str()).unwrap_or("N/A"),
            ),
            None => ("N/A", "N/A".to_string(), "N/A"),
        };
        html.push_str(&format!(
            "<li><strong>{}</strong> <span class='text-gray-500'>x{} at {} ({})</span></li>",
            escape_html(title),
            item.quantity,
            price,
            escape_html(genre)
        ));
    }
    html.push_str("</ul>");
    html
}

pub(crate) fn render_transactions_list(list: &ListController<TransactionResource>) -> String {
    let mut html = crate::maybe_notice(list.notice());

    if list.state() == ControllerState::ErrorShown {
        html.push_str(
            r#"<button hx-get='/transactions/list' hx-target='#transactions-content' class='mb-4 px-3 py-1 border rounded hover:bg-gray-100'>Retry</button>"#,
        );
    }

    if list.items().is_empty() {
        html.push_str(r#"<div class='text-center py-12 text-gray-500'><p>No transactions yet</p></div>"#);
    } else {
        html.push_str(
            r#"<div class='overflow-x-auto'>
        <table class='w-full'>
            <thead class='bg-gray-50'>
                <tr>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Transaction</th>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Date</th>
                    <th class='px-4 py-3 text-right text-sm font-medium text-gray-600'>Items</th>
                    <th class='px-4 py-3 text-right text-sm font-medium text-gray-600'>Total</th>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Details</th>
                </tr>
            </thead>
            <tbody class='divide-y divide-gray-100'>"#,
        );
        for tx in list.items() {
            html.push_str(&format!(
                r#"<tr class='hover:bg-gray-50 align-top'>
                <td class='px-4 py-3 font-mono text-sm'>{}</td>
                <td class='px-4 py-3 text-sm'>{}</td>
                <td class='px-4 py-3 text-right'>{}</td>
                <td class='px-4 py-3 text-right font-medium'>{}</td>
                <td class='px-4 py-3'>{}</td>
            </tr>"#,
                escape_html(&tx.id),
                tx.created_at.format("%Y-%m-%d %H:%M"),
                format_number(tx.quantity),
                format_price(tx.total_price()),
                render_order_items(tx)
            ));
        }
        html.push_str("</tbody></table></div>");
    }

    if let Some(cursor) = list.cursor() {
        html.push_str(&render_pager(cursor));
    }
    html
}

/// Buttons are disabled outside the known range, so no such request is made
fn render_pager(cursor: &PageCursor) -> String {
    let target = "#transactions-content";
    format!(
        r#"<div class='mt-6 flex items-center justify-between flex-wrap gap-4'>
            <span class='text-sm text-gray-500'>{} transactions, page {} of {}</span>
            <div class='flex items-center gap-2'>
                <button {} hx-post='/transactions/page/prev' hx-target='{}' class='px-3 py-1 border rounded hover:bg-gray-100'>Previous</button>
                <form hx-post='/transactions/page' hx-target='{}' class='flex items-center gap-1'>
                    <input type='number' name='page' min='1' max='{}' value='{}' class='w-16 text-center border rounded px-2 py-1'>
                    <button type='submit' class='px-3 py-1 border rounded bg-blue-50 hover:bg-blue-100 text-blue-600'>Go</button>
                </form>
                <button {} hx-post='/transactions/page/next' hx-target='{}' class='px-3 py-1 border rounded hover:bg-gray-100'>Next</button>
            </div>
        </div>
        <style>button[disabled]{{cursor:not-allowed;opacity:0.5}}</style>"#,
        format_number(cursor.total_items()),
        cursor.page(),
        cursor.total_pages().max(1),
        if cursor.can_prev() { "" } else { "disabled" },
        target,
        target,
        cursor.total_pages().max(1),
        cursor.page(),
        if cursor.can_next() { "" } else { "disabled" },
        target
    )
}

pub(crate) fn render_checkout(composer: &CheckoutComposer) -> String {
    let mut rows = String::new();
    for book in composer.catalogue() {
        let quantity = composer.quantity(&book.id).map(|q| q.to_string()).unwrap_or_default();
        rows.push_str(&format!(
            r#"<li class='flex items-center justify-between gap-4 p-3 border rounded-lg'>
                <div>
                    <strong>{}</strong>
                    <div class='text-sm text-gray-500'>{} &middot; stock {} &middot; {}</div>
                </div>
                <input type='number' name='qty_{}' min='0' max='{}' placeholder='Qty' value='{}'
                    hx-post='/transactions/checkout/quantity' hx-include='this' hx-trigger='change' hx-target='#checkout-notice'
                    class='w-20 px-2 py-1 border rounded'>
            </li>"#,
            escape_html(&book.title),
            format_price(book.price),
            format_number(book.stock_quantity),
            escape_html(book.genre_name()),
            escape_html(&book.id),
            book.stock_quantity.max(0),
            quantity
        ));
    }
    if rows.is_empty() {
        rows.push_str("<li class='text-center py-6 text-gray-500'>No books available</li>");
    }

    let body = format!(
        r#"<div id='checkout-notice'>{}</div>
        <form hx-post='/transactions/checkout' hx-target='#modal'>
            <ul class='space-y-2 mb-4'>{}</ul>
            <div class='flex justify-end gap-2'>
                <button type='button' hx-post='/transactions/checkout/cancel' hx-target='#modal'
                    class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Cancel</button>
                <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Checkout</button>
            </div>
        </form>"#,
        crate::maybe_notice(composer.notice()),
        rows
    );
    crate::modal_html("Select books to check out", &body)
}
