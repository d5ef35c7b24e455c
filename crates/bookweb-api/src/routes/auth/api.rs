//! Authentication endpoints
//!
//! Failures re-render the form with the message in place; the typed values
//! other than the password are kept.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use bookweb_core::{LoginForm, Notice, RegisterForm};

use super::page::{render_login_form, render_register_form};
use crate::{ApiError, AppState};

const REGISTER_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Login failed";

/// Full page for plain form posts, the card alone for HTMX
fn respond(headers: &HeaderMap, title: &str, card: String) -> Response {
    if crate::is_htmx_request(headers) {
        Html(card).into_response()
    } else {
        Html(crate::card_page(title, &card)).into_response()
    }
}

pub async fn htmx_register(
    state: State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Response {
    let (username, email) = (form.username.clone(), form.email.clone());
    let result = match form.into_request() {
        Ok(request) => state.client.register(&request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => {
            log::info!("Registered {}", response.data.email);
            let to = format!("/login?notice={}", urlencoding::encode(&response.message));
            crate::redirect_to(&headers, &to)
        }
        Err(e) => {
            log::warn!("Registration failed: {}", e);
            let notice = Notice::error(e.user_message(REGISTER_FAILED));
            respond(&headers, "Register", render_register_form(Some(&notice), &username, &email))
        }
    }
}

pub async fn htmx_login(state: State<AppState>, headers: HeaderMap, Form(form): Form<LoginForm>) -> Response {
    let email = form.email.clone();
    let result = match form.into_request() {
        Ok(request) => state.client.login(&request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => crate::redirect_to(&headers, "/home"),
        Err(e) => {
            log::warn!("Login failed: {}", e);
            let notice = Notice::error(e.user_message(LOGIN_FAILED));
            respond(&headers, "Login", render_login_form(Some(&notice), &email))
        }
    }
}

/// Drop the stored token and go back to the login page
pub async fn logout(state: State<AppState>, headers: HeaderMap) -> Response {
    match state.client.logout() {
        Ok(()) => crate::redirect_to(&headers, "/login"),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{get, htmx_post, send, state, upstream};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};

    #[tokio::test]
    async fn test_root_shows_register() {
        let (status, _, body) = send(state(false), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Create an account"));
    }

    #[tokio::test]
    async fn test_login_page_shows_registration_notice() {
        let (_, _, body) = send(state(false), get("/login?notice=User%20registered")).await;
        assert!(body.contains("User registered"));
        assert!(body.contains("bg-green-50"));
    }

    #[tokio::test]
    async fn test_login_with_missing_password_stays_on_form() {
        let (status, headers, body) = send(state(false), htmx_post("/login", "email=a%40b.c&password=")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get("hx-redirect").is_none());
        assert!(body.contains("Password is required"));
        assert!(body.contains("value='a@b.c'"));
    }

    #[tokio::test]
    async fn test_login_transport_failure_is_shown() {
        let (_, _, body) = send(state(false), htmx_post("/login", "email=a%40b.c&password=pw")).await;
        assert!(body.contains("bg-red-50"));
        assert!(!body.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let app = state(true);
        let (_, headers, _) = send(app.clone(), htmx_post("/logout", "")).await;
        assert_eq!(headers.get("hx-redirect").unwrap(), "/login");
        assert!(!app.client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_sends_to_login_with_server_message() {
        let (app, seen) = upstream(false).await;
        let (status, headers, _) =
            send(app.clone(), htmx_post("/register", "username=ann&email=a%40b.c&password=pw")).await;
        assert_eq!(status, StatusCode::OK);
        let to = headers.get("hx-redirect").unwrap().to_str().unwrap().to_string();
        assert_eq!(to, "/login?notice=User%20registered%20successfully");
        assert_eq!(seen.count_method("POST", "/auth/register"), 1);
        assert!(!app.client.session().is_authenticated());

        let (_, _, body) = send(app, get(&to)).await;
        assert!(body.contains("User registered successfully"));
        assert!(body.contains("bg-green-50"));
    }

    #[tokio::test]
    async fn test_login_stores_token_and_opens_home() {
        let (app, seen) = upstream(false).await;
        let (_, headers, _) = send(app.clone(), htmx_post("/login", "email=a%40b.c&password=secret")).await;
        assert_eq!(headers.get("hx-redirect").unwrap(), "/home");
        assert_eq!(app.client.session().token().as_deref(), Some("tok-1"));
        assert_eq!(seen.count_method("POST", "/auth/login"), 1);

        let (status, _, body) = send(app, get("/home")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Bookstore Dashboard"));
    }

    #[tokio::test]
    async fn test_plain_form_login_redirects_with_see_other() {
        let (app, _) = upstream(false).await;
        let request = Request::post("/login")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("email=a%40b.c&password=secret"))
            .unwrap();
        let (status, headers, _) = send(app, request).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/home");
    }

    #[tokio::test]
    async fn test_rejected_login_shows_server_message() {
        let (app, _) = upstream(false).await;
        let (_, headers, body) = send(app.clone(), htmx_post("/login", "email=a%40b.c&password=nope")).await;
        assert!(headers.get("hx-redirect").is_none());
        assert!(body.contains("Invalid credentials"));
        assert!(!app.client.session().is_authenticated());
    }
}
