//! Genres page rendering

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use bookweb_core::{ControllerState, GenreDraft, GenreResource, ListController, Notice};
use bookweb_utils::escape_html;

use crate::AppState;

const INPUT_CLASS: &str = "px-3 py-2 border rounded-lg";

/// Genres page - Add form on top, table below
pub async fn page_genres(state: State<AppState>, headers: HeaderMap) -> Html<String> {
    let mut fresh = state.genres_controller();
    fresh.mount().await;
    let mut genres = state.genres.write().await;
    *genres = fresh;

    let inner_content = format!(
        r#"<div class='mb-4'><h2 class='text-2xl font-bold'>Genres</h2></div>
        {}"#,
        render_genres_section(&genres, &GenreDraft::default())
    );

    Html(crate::page_response(&headers, "Genres", "/genres", &inner_content))
}

/// Add form and list; the add form keeps `draft` so a rejected entry is not lost
pub(crate) fn render_genres_section(list: &ListController<GenreResource>, draft: &GenreDraft) -> String {
    format!(
        r#"<div id='genres-section'>
        <form hx-post='/genres' hx-target='#genres-section' hx-swap='outerHTML'
            class='bg-white rounded-xl shadow-sm p-4 mb-4 flex flex-wrap items-center gap-3'>
            <input type='text' name='name' placeholder='Genre name' value='{}' class='{} w-48'>
            <input type='text' name='description' placeholder='Description' value='{}' class='{} flex-1'>
            <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Add genre</button>
        </form>
        <div id='genres-content' class='bg-white rounded-xl shadow-sm p-6'>{}</div>
    </div>"#,
        escape_html(&draft.name),
        INPUT_CLASS,
        escape_html(&draft.description),
        INPUT_CLASS,
        render_genres_list(list)
    )
}

pub(crate) fn render_genres_list(list: &ListController<GenreResource>) -> String {
    let mut html = crate::maybe_notice(list.notice());

    if list.state() == ControllerState::ErrorShown {
        html.push_str(
            r#"<button hx-get='/genres/list' hx-target='#genres-content' class='mb-4 px-3 py-1 border rounded hover:bg-gray-100'>Retry</button>"#,
        );
    }

    if list.items().is_empty() {
        html.push_str(r#"<div class='text-center py-12 text-gray-500'><p>No genres yet</p></div>"#);
        return html;
    }

    html.push_str(
        r#"<table class='w-full'>
            <thead class='bg-gray-50'>
                <tr>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Name</th>
                    <th class='px-4 py-3 text-left text-sm font-medium text-gray-600'>Description</th>
                    <th class='px-4 py-3'></th>
                </tr>
            </thead>
            <tbody class='divide-y divide-gray-100'>"#,
    );

    for genre in list.items() {
        let id = urlencoding::encode(&genre.id);
        html.push_str(&format!(
            r#"<tr class='hover:bg-gray-50'>
                <td class='px-4 py-3 font-medium'>{}</td>
                <td class='px-4 py-3 text-gray-500'>{}</td>
                <td class='px-4 py-3 text-right whitespace-nowrap'>
                    <button hx-get='/genres/item/{}/edit' hx-target='#modal' class='px-2 py-1 text-sm text-indigo-600 hover:underline'>Edit</button>
                    <button hx-get='/genres/item/{}/delete' hx-target='#modal' class='px-2 py-1 text-sm text-red-600 hover:underline'>Delete</button>
                </td>
            </tr>"#,
            escape_html(&genre.name),
            escape_html(genre.description.as_deref().unwrap_or("-")),
            id,
            id
        ));
    }

    html.push_str("</tbody></table>");
    html
}

pub(crate) fn render_genre_form(id: &str, draft: &GenreDraft, notice: Option<&Notice>) -> String {
    let body = format!(
        r#"{}
        <form hx-post='/genres/item/{}' hx-target='#modal' class='space-y-3'>
            <label class='block'><span class='text-sm text-gray-600'>Name</span>
                <input type='text' name='name' value='{}' class='{} w-full'></label>
            <label class='block'><span class='text-sm text-gray-600'>Description</span>
                <textarea name='description' rows='3' class='{} w-full'>{}</textarea></label>
            <div class='flex justify-end gap-2'>
                <button type='button' onclick="document.getElementById('modal').innerHTML=''"
                    class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200'>Cancel</button>
                <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Save</button>
            </div>
        </form>"#,
        crate::maybe_notice(notice),
        urlencoding::encode(id),
        escape_html(&draft.name),
        INPUT_CLASS,
        INPUT_CLASS,
        escape_html(&draft.description)
    );
    crate::modal_html("Edit genre", &body)
}
