//! Genres HTMX endpoints

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Form;
use bookweb_core::{GenreDraft, Notice};

use super::page::{render_genre_form, render_genres_list, render_genres_section};
use crate::{ApiError, AppState};

const UPDATE_FAILED: &str = "Failed to update genre";

pub async fn htmx_genres_list(state: State<AppState>) -> Html<String> {
    let mut genres = state.genres.write().await;
    genres.refresh().await;
    Html(render_genres_list(&genres))
}

/// Add a genre; the form is cleared only when the genre was created
pub async fn htmx_genre_create(state: State<AppState>, Form(draft): Form<GenreDraft>) -> Html<String> {
    let mut genres = state.genres.write().await;
    let created = match draft.to_payload() {
        Ok(payload) => genres.create(payload).await,
        Err(e) => {
            genres.reject(&e);
            false
        }
    };
    let keep = if created { GenreDraft::default() } else { draft };
    Html(render_genres_section(&genres, &keep))
}

pub async fn htmx_genre_edit_form(state: State<AppState>, Path(id): Path<String>) -> Result<Html<String>, ApiError> {
    let genres = state.genres.read().await;
    let genre = genres.find(&id).ok_or_else(|| ApiError::NotFound {
        resource: format!("genre {}", id),
    })?;
    Ok(Html(render_genre_form(&id, &GenreDraft::from_genre(genre), None)))
}

pub async fn htmx_genre_update(
    state: State<AppState>,
    Path(id): Path<String>,
    Form(draft): Form<GenreDraft>,
) -> Html<String> {
    let mut genres = state.genres.write().await;
    let payload = match draft.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            let notice = Notice::error(e.user_message(UPDATE_FAILED));
            return Html(render_genre_form(&id, &draft, Some(&notice)));
        }
    };

    if genres.update(&id, payload).await {
        Html(crate::oob("genres-content", &render_genres_list(&genres)))
    } else {
        Html(render_genre_form(&id, &draft, genres.notice()))
    }
}

pub async fn htmx_genre_delete_request(state: State<AppState>, Path(id): Path<String>) -> Html<String> {
    let mut genres = state.genres.write().await;
    let name = genres.find(&id).map(|g| g.name.clone()).unwrap_or_else(|| id.clone());
    genres.request_delete(&id);
    Html(crate::delete_confirm_html("genre", &name, "genres"))
}

/// A genre still referenced by books fails here and stays listed
pub async fn htmx_genre_delete_confirm(state: State<AppState>) -> Html<String> {
    let mut genres = state.genres.write().await;
    genres.confirm_delete().await;
    Html(crate::oob("genres-content", &render_genres_list(&genres)))
}

pub async fn htmx_genre_delete_cancel(state: State<AppState>) -> Html<String> {
    state.genres.write().await.cancel_delete();
    Html(String::new())
}
