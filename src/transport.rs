use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::{Level, event};

use crate::constants::USER_AGENT;
use crate::proto::{HttpMethod, HttpQuery, HttpResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout(error)
        } else {
            TransportError::Http(error)
        }
    }
}

/// Carries a [`HttpQuery`] to the device and brings back its response.
pub trait Transport {
    fn execute(
        &self,
        query: &HttpQuery,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, query: &HttpQuery) -> Result<HttpResponse, TransportError> {
        let method = match query.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, query.uri.clone());

        if let Some(content_type) = query.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }

        if let Some(body) = &query.body {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send().await.inspect_err(|error| {
            if error.is_timeout() {
                event!(Level::WARN, uri = %query.uri, "request timed out");
            } else {
                event!(Level::WARN, ?error, uri = %query.uri, "request failed");
            }
        })?;

        let status = response.status().as_u16();

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(Box::from);

        let body = response.bytes().await?;

        event!(
            Level::TRACE,
            uri = %query.uri,
            status,
            body = %String::from_utf8_lossy(&body).as_ref(),
            "response received"
        );

        Ok(HttpResponse {
            status,
            content_type,
            body: Box::from(&*body),
        })
    }
}
