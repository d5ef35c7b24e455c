//! Form drafts
//!
//! Drafts hold the raw text of every input exactly as submitted. Parsing and
//! validation happen once, when the draft is turned into a request payload,
//! so a bad field never reaches the API.

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::models::{Book, BookPayload, Genre, GenrePayload, LoginRequest, RegisterRequest};

fn required_text(field: &str, label: &str, raw: &str) -> CoreResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CoreError::InvalidInput {
            field: field.to_string(),
            message: format!("{} is required", label),
        });
    }
    Ok(value.to_string())
}

/// Parse a required numeric field, naming it in the error
fn parse_required_number<T: std::str::FromStr>(field: &str, label: &str, raw: &str) -> CoreResult<T> {
    let value = required_text(field, label, raw)?;
    value.parse::<T>().map_err(|_| CoreError::InvalidInput {
        field: field.to_string(),
        message: format!("{} must be a number, got '{}'", label, value),
    })
}

// ==================== Books ====================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub writer: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub publication_year: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock_quantity: String,
    #[serde(default)]
    pub genre_id: String,
}

impl BookDraft {
    /// Prefill for the edit form
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            writer: book.writer.clone(),
            publisher: book.publisher.clone(),
            publication_year: book.publication_year.to_string(),
            description: book.description.clone().unwrap_or_default(),
            price: book.price.to_string(),
            stock_quantity: book.stock_quantity.to_string(),
            genre_id: book.genre_id.clone(),
        }
    }

    pub fn to_payload(&self) -> CoreResult<BookPayload> {
        let price: f64 = parse_required_number("price", "Price", &self.price)?;
        if !price.is_finite() {
            return Err(CoreError::InvalidInput {
                field: "price".to_string(),
                message: "Price must be a number".to_string(),
            });
        }

        Ok(BookPayload {
            title: required_text("title", "Title", &self.title)?,
            writer: self.writer.trim().to_string(),
            publisher: self.publisher.trim().to_string(),
            publication_year: parse_required_number("publication_year", "Publication year", &self.publication_year)?,
            description: self.description.trim().to_string(),
            price,
            stock_quantity: parse_required_number("stock_quantity", "Stock", &self.stock_quantity)?,
            genre_id: required_text("genre_id", "Genre", &self.genre_id)?,
        })
    }
}

// ==================== Genres ====================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenreDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl GenreDraft {
    pub fn from_genre(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
            description: genre.description.clone().unwrap_or_default(),
        }
    }

    pub fn to_payload(&self) -> CoreResult<GenrePayload> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError {
                message: "Genre name is required".to_string(),
            });
        }
        Ok(GenrePayload {
            name: name.to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

// ==================== Authentication ====================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn into_request(self) -> CoreResult<LoginRequest> {
        Ok(LoginRequest {
            email: required_text("email", "Email", &self.email)?,
            password: required_password(self.password)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterForm {
    pub fn into_request(self) -> CoreResult<RegisterRequest> {
        Ok(RegisterRequest {
            username: required_text("username", "Username", &self.username)?,
            email: required_text("email", "Email", &self.email)?,
            password: required_password(self.password)?,
        })
    }
}

// Passwords are sent as typed, surrounding whitespace included.
fn required_password(password: String) -> CoreResult<String> {
    if password.is_empty() {
        return Err(CoreError::InvalidInput {
            field: "password".to_string(),
            message: "Password is required".to_string(),
        });
    }
    Ok(password)
}
