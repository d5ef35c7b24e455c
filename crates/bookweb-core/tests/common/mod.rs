//! In-process stand-in for the bookstore REST API

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use bookweb_config::ApiConfig;
use bookweb_core::models::{GenreRef, OrderItem, OrderedBook};
use bookweb_core::{ApiClient, Book, Genre, Session, Transaction};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

pub const TOKEN: &str = "token-abc";

/// One request as the backend saw it
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct Backend {
    pub books: Vec<Book>,
    pub genres: Vec<Genre>,
    pub transactions: Vec<Transaction>,
    pub seen: Vec<Seen>,
}

pub type Shared = Arc<Mutex<Backend>>;

impl Backend {
    /// Ten books priced 25..=250 in steps of 25, two genres, 23 transactions
    pub fn seeded() -> Self {
        let genres = vec![genre("g1", "Fantasy"), genre("g2", "Poetry")];
        let books = (1..=10)
            .map(|i| {
                let genre = &genres[(i % 2) as usize];
                Book {
                    id: format!("b{}", i),
                    title: format!("Book {}", i),
                    writer: "Writer".to_string(),
                    publisher: "Publisher".to_string(),
                    publication_year: 1990 + i,
                    description: None,
                    price: f64::from(i * 25),
                    stock_quantity: if i % 3 == 0 { 0 } else { i64::from(i) },
                    genre_id: genre.id.clone(),
                    genre: Some(GenreRef {
                        id: genre.id.clone(),
                        name: genre.name.clone(),
                    }),
                }
            })
            .collect();
        let transactions = (1..=23)
            .map(|i| Transaction {
                id: format!("t{}", i),
                quantity: 1,
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
                order_items: vec![OrderItem {
                    id: format!("o{}", i),
                    quantity: 1,
                    book: Some(OrderedBook {
                        id: "b1".to_string(),
                        title: "Book 1".to_string(),
                        price: 25.0,
                        stock_quantity: Some(1),
                        genre: None,
                    }),
                }],
            })
            .collect();
        Self {
            books,
            genres: genres.into_iter().chain([genre("g3", "Unused")]).collect(),
            transactions,
            seen: Vec::new(),
        }
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Seen> {
        self.seen
            .iter()
            .filter(|s| s.method == method && s.path == path)
            .cloned()
            .collect()
    }
}

fn genre(id: &str, name: &str) -> Genre {
    Genre {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let seen = Seen {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization: request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.lock().unwrap().seen.push(seen);
    next.run(request).await
}

async fn list_books(State(state): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Response {
    let number = |key: &str| params.get(key).and_then(|v| v.parse::<f64>().ok());
    let min_price = number("minPrice");
    let max_price = number("maxPrice");
    let in_stock = params.get("inStock").map(String::as_str) == Some("true");
    let q = params.get("q").map(|q| q.to_lowercase());

    let backend = state.lock().unwrap();
    let data: Vec<&Book> = backend
        .books
        .iter()
        .filter(|b| min_price.map_or(true, |min| b.price >= min))
        .filter(|b| max_price.map_or(true, |max| b.price <= max))
        .filter(|b| !in_stock || b.stock_quantity > 0)
        .filter(|b| q.as_ref().map_or(true, |q| b.title.to_lowercase().contains(q)))
        .filter(|b| params.get("genre_id").map_or(true, |g| &b.genre_id == g))
        .collect();
    Json(json!({ "data": data })).into_response()
}

async fn create_book(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    let id = format!("b{}", backend.books.len() + 1);
    let book = Book {
        id,
        title: body["title"].as_str().unwrap_or_default().to_string(),
        writer: body["writer"].as_str().unwrap_or_default().to_string(),
        publisher: body["publisher"].as_str().unwrap_or_default().to_string(),
        publication_year: body["publication_year"].as_i64().unwrap_or_default() as i32,
        description: body["description"].as_str().map(str::to_string),
        price: body["price"].as_f64().unwrap_or_default(),
        stock_quantity: body["stock_quantity"].as_i64().unwrap_or_default(),
        genre_id: body["genre_id"].as_str().unwrap_or_default().to_string(),
        genre: None,
    };
    backend.books.push(book);
    message(StatusCode::CREATED, "Book created")
}

async fn update_book(State(state): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    match backend.books.iter_mut().find(|b| b.id == id) {
        Some(book) => {
            if let Some(title) = body["title"].as_str() {
                book.title = title.to_string();
            }
            message(StatusCode::OK, "Book updated")
        }
        None => message(StatusCode::NOT_FOUND, "Book not found"),
    }
}

async fn list_genres(State(state): State<Shared>) -> Response {
    let backend = state.lock().unwrap();
    Json(json!({ "data": backend.genres })).into_response()
}

async fn delete_genre(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut backend = state.lock().unwrap();
    if backend.books.iter().any(|b| b.genre_id == id) {
        return message(StatusCode::BAD_REQUEST, "Genre is still used by books");
    }
    backend.genres.retain(|g| g.id != id);
    message(StatusCode::OK, "Genre deleted")
}

async fn list_transactions(State(state): State<Shared>, Query(params): Query<HashMap<String, String>>) -> Response {
    let page: usize = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(10);
    let backend = state.lock().unwrap();
    let total = backend.transactions.len();
    let data: Vec<&Transaction> = backend.transactions.iter().skip((page - 1) * limit).take(limit).collect();
    Json(json!({
        "data": data,
        "meta": { "page": page, "limit": limit, "totalItems": total, "totalPages": (total + limit - 1) / limit },
    }))
    .into_response()
}

async fn create_transaction(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    let id = format!("t{}", backend.transactions.len() + 1);
    let quantity = body["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["quantity"].as_i64()).sum())
        .unwrap_or_default();
    backend.transactions.push(Transaction {
        id,
        quantity,
        created_at: Utc::now(),
        order_items: Vec::new(),
    });
    message(StatusCode::CREATED, "Transaction created")
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(json!({ "message": "Login successful", "token": TOKEN })).into_response()
    } else {
        message(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    Json(json!({
        "message": "User registered",
        "data": {
            "id": "u1",
            "email": body["email"],
            "username": body["username"],
            "created_at": "2024-01-01 00:00:00",
        }
    }))
    .into_response()
}

/// Start the fake backend on an ephemeral port
pub async fn spawn(backend: Backend) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/:id", patch(update_book))
        .route("/genre", get(list_genres))
        .route("/genre/:id", axum::routing::delete(delete_genre))
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}

pub fn client(base_url: &str, session: Session) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: Some(5),
    };
    ApiClient::new(&config, session).unwrap()
}
