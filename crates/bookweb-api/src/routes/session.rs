//! Session guard for protected pages
//!
//! Only token presence is checked. A missing token sends the browser to the
//! login page; HTMX requests get an `HX-Redirect` header instead so the whole
//! page navigates rather than a fragment being swapped.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use bookweb_core::{GuardDecision, SessionGuard};

use crate::AppState;

pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match SessionGuard::check(state.client.session()) {
        GuardDecision::Render => next.run(request).await,
        GuardDecision::Redirect(to) => {
            log::debug!(target: "bookweb::session", "No session for {}, redirecting", request.uri().path());
            crate::redirect_to(request.headers(), to)
        }
    }
}
