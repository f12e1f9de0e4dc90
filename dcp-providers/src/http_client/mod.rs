//! Outbound HTTP used for did:web resolution, status list fetches, credential delivery and
//! presentation queries. Only the request/response contract is exposed so every caller can be
//! tested against [`MockHttpClient`].

pub mod imp;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> RequestBuilder;
    fn post(&self, url: &str) -> RequestBuilder;

    async fn send(&self, request: Request) -> Result<Response, Error>;
}

pub type Headers = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub fn is_error(&self) -> bool {
        self.0 >= 400
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Invalid header `{0}`")]
    InvalidHeader(String),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl Response {
    /// Turns a 4xx/5xx response into [`Error::Status`] carrying the body text.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if !self.status.is_error() {
            return Ok(self);
        }

        Err(Error::Status {
            status: self.status,
            body: String::from_utf8_lossy(&self.body).trim().to_owned(),
        })
    }

    /// `true` for an empty body or a literal JSON `null`.
    pub fn is_empty(&self) -> bool {
        let body = String::from_utf8_lossy(&self.body);
        matches!(body.trim(), "" | "null")
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

pub struct RequestBuilder {
    client: Arc<dyn HttpClient>,
    request: Request,
}

impl RequestBuilder {
    pub fn new(client: Arc<dyn HttpClient>, method: Method, url: &str) -> Self {
        Self {
            client,
            request: Request {
                method,
                url: url.to_owned(),
                headers: Headers::new(),
                body: None,
            },
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.request.headers.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {token}"))
    }

    pub fn json<T: Serialize>(mut self, value: T) -> Result<Self, Error> {
        self.request.body = Some(serde_json::to_vec(&value)?);
        Ok(self.header("Content-Type", "application/json"))
    }

    pub async fn send(self) -> Result<Response, Error> {
        self.client.send(self.request).await
    }
}
