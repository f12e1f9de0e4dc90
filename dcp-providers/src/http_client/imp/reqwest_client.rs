use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::http_client::{
    Error, Headers, HttpClient, Method, Request, RequestBuilder, Response, StatusCode,
};

/// [`HttpClient`] over a shared `reqwest` connection pool.
#[derive(Clone, Default)]
pub struct ReqwestClient {
    pub client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(Arc::new(self.clone()), Method::Get, url)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(Arc::new(self.clone()), Method::Post, url)
    }

    async fn send(&self, request: Request) -> Result<Response, Error> {
        let method = request.method;
        let url = request.url.clone();

        let result = self.execute(request).await;
        match &result {
            Ok(response) => tracing::debug!(?method, %url, status = %response.status, "HTTP request completed"),
            Err(error) => tracing::debug!(?method, %url, %error, "HTTP request failed"),
        }
        result
    }
}

impl ReqwestClient {
    async fn execute(&self, request: Request) -> Result<Response, Error> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        }
        .headers(header_map(request.headers)?);

        let builder = match request.body {
            Some(body) => builder.body(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = StatusCode(response.status().as_u16());
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_owned())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Response {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn header_map(headers: Headers) -> Result<HeaderMap, Error> {
    headers
        .into_iter()
        .map(|(name, value)| {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::try_from(value.as_str()).map_err(|_| Error::InvalidHeader(name))?;
            Ok((header_name, header_value))
        })
        .collect()
}
