//! HTTP client for the bookstore REST API
//!
//! One configured `reqwest::Client` per process. Every request gets the base
//! URL prepended and, when the session holds one, a bearer token attached.

use crate::error::{CoreError, CoreResult};
use crate::models::{LoginRequest, LoginResponse, MessageBody, RegisterRequest, RegisterResponse};
use crate::session::Session;
use bookweb_config::ApiConfig;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> CoreResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| CoreError::ConfigError {
            message: format!("cannot build HTTP client: {}", e),
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> CoreResult<Response> {
        let request = builder.build().map_err(CoreError::from)?;
        log::debug!(target: "bookweb::client", "{} {}", request.method(), request.url());

        let response = self.http.execute(request).await.map_err(CoreError::from)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort: the message field if it parses, else nothing.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(|b| b.message);
        log::debug!(target: "bookweb::client", "-> {} {:?}", status, message);
        Err(CoreError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> CoreResult<T> {
        let bytes = response.bytes().await.map_err(CoreError::from)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET with query parameters, decoding a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> CoreResult<T> {
        let mut builder = self.request(Method::GET, path);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = self.execute(builder).await?;
        Self::decode(response).await
    }

    /// Send a JSON body and decode the JSON answer
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> CoreResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(method, path).json(body)).await?;
        Self::decode(response).await
    }

    /// Send an optional JSON body, ignoring whatever comes back
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> CoreResult<()>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder).await.map(|_| ())
    }

    // ==================== Authentication ====================

    pub async fn register(&self, request: &RegisterRequest) -> CoreResult<RegisterResponse> {
        self.send_json(Method::POST, "auth/register", request).await
    }

    /// Log in and keep the returned token in the session
    pub async fn login(&self, request: &LoginRequest) -> CoreResult<LoginResponse> {
        let response: LoginResponse = self.send_json(Method::POST, "auth/login", request).await?;
        self.session.sign_in(&response.token)?;
        Ok(response)
    }

    pub fn logout(&self) -> CoreResult<()> {
        self.session.sign_out()
    }
}

/// Path segment for an item id
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, urlencoding::encode(id))
}
