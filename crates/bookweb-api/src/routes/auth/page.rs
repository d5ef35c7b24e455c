//! Authentication page rendering

use axum::extract::Query;
use axum::response::Html;
use bookweb_core::Notice;
use bookweb_utils::escape_html;
use std::collections::HashMap;

const INPUT_CLASS: &str = "w-full px-3 py-2 border rounded-lg";
const BUTTON_CLASS: &str = "w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700";

pub async fn page_register() -> Html<String> {
    Html(crate::card_page("Register", &render_register_form(None, "", "")))
}

/// Login page; `?notice=` carries the message from a finished registration
pub async fn page_login(params: Query<HashMap<String, String>>) -> Html<String> {
    let notice = params
        .get("notice")
        .filter(|n| !n.trim().is_empty())
        .map(|n| Notice::success(n.as_str()));
    Html(crate::card_page("Login", &render_login_form(notice.as_ref(), "")))
}

pub(crate) fn render_register_form(notice: Option<&Notice>, username: &str, email: &str) -> String {
    format!(
        r#"<div id='auth-card'>
        <h2 class='text-2xl font-bold mb-6 text-center'>Create an account</h2>
        {}
        <form method='post' action='/register' hx-post='/register' hx-target='#auth-card' hx-swap='outerHTML' class='space-y-4'>
            <input type='text' name='username' placeholder='Username' value='{}' required class='{}'>
            <input type='email' name='email' placeholder='Email' value='{}' required class='{}'>
            <input type='password' name='password' placeholder='Password' required class='{}'>
            <button type='submit' class='{}'>Register</button>
        </form>
        <p class='text-sm text-gray-500 mt-4 text-center'>Already registered? <a href='/login' class='text-indigo-600 hover:underline'>Log in</a></p>
    </div>"#,
        crate::maybe_notice(notice),
        escape_html(username),
        INPUT_CLASS,
        escape_html(email),
        INPUT_CLASS,
        INPUT_CLASS,
        BUTTON_CLASS
    )
}

pub(crate) fn render_login_form(notice: Option<&Notice>, email: &str) -> String {
    format!(
        r#"<div id='auth-card'>
        <h2 class='text-2xl font-bold mb-6 text-center'>Log in</h2>
        {}
        <form method='post' action='/login' hx-post='/login' hx-target='#auth-card' hx-swap='outerHTML' class='space-y-4'>
            <input type='email' name='email' placeholder='Email' value='{}' required class='{}'>
            <input type='password' name='password' placeholder='Password' required class='{}'>
            <button type='submit' class='{}'>Log in</button>
        </form>
        <p class='text-sm text-gray-500 mt-4 text-center'>No account yet? <a href='/register' class='text-indigo-600 hover:underline'>Register</a></p>
    </div>"#,
        crate::maybe_notice(notice),
        escape_html(email),
        INPUT_CLASS,
        INPUT_CLASS,
        BUTTON_CLASS
    )
}
