//! client::http
//!
//! Authenticated request plumbing shared by both API versions.
//!
//! # Design
//!
//! Every request names the error statuses it is prepared to handle. Anything
//! else at or above 400 is logged together with the response body and turned
//! into [`MetaxError::Http`], so operations only deal with the statuses that
//! carry meaning for them (typically 404).
//!
//! Response bodies are read in full before being handed back. Metax
//! responses are JSON documents of bounded size, and buffering lets the
//! transport log the body of a failed request.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::MetaxError;

/// A request to be sent through [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    allowed: Vec<u16>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
            allowed: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Append a query parameter. Repeated keys are sent repeatedly.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when a value is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Send a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Accept an error status instead of failing the request.
    pub fn allow(mut self, status: u16) -> Self {
        self.allowed.push(status);
        self
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Final request URL including the query string
    pub url: String,
    /// Raw response body
    pub body: String,
}

impl Response {
    pub fn is(&self, status: u16) -> bool {
        self.status == status
    }

    /// Parse the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, MetaxError> {
        serde_json::from_str(&self.body).map_err(|e| {
            MetaxError::Decode(format!("invalid JSON from {}: {}", self.url, e))
        })
    }

    /// Parse the body as JSON, treating an empty body as `null`.
    pub fn value(&self) -> Result<Value, MetaxError> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        self.json()
    }

    /// Build the error for a status the caller did not expect to handle.
    pub fn into_error(self) -> MetaxError {
        MetaxError::Http {
            status: self.status,
            url: self.url,
            body: self.body,
        }
    }
}

/// Credentials and connection settings for Metax.
pub struct HttpTransport {
    /// HTTP client for making requests
    client: Client,
    /// Username for HTTP Basic authentication
    user: Option<String>,
    /// Password for HTTP Basic authentication
    password: Option<String>,
    /// Bearer token, preferred over Basic authentication when set
    token: Option<String>,
}

// Custom Debug to avoid exposing credentials
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("user", &self.user)
            .field("has_password", &self.password.is_some())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport.
    ///
    /// # Errors
    ///
    /// - `MissingCredentials` if neither a user nor a token is given
    /// - `Network` if the HTTP client cannot be built
    pub fn new(
        user: Option<String>,
        password: Option<String>,
        token: Option<String>,
        verify: bool,
    ) -> Result<Self, MetaxError> {
        let user = user.filter(|u| !u.is_empty());
        let token = token.filter(|t| !t.is_empty());
        if user.is_none() && token.is_none() {
            return Err(MetaxError::MissingCredentials);
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(!verify)
            .build()
            .map_err(|e| MetaxError::Network(e.to_string()))?;

        Ok(Self {
            client,
            user,
            password,
            token,
        })
    }

    /// Send a request and read the response.
    ///
    /// # Errors
    ///
    /// - `Network` if the request could not be sent or the body not read
    /// - `Http` if the status is an error not listed by [`Request::allow`]
    pub async fn send(&self, request: Request) -> Result<Response, MetaxError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder = match (&self.token, &self.user) {
            (Some(token), _) => builder.bearer_auth(token),
            (None, Some(user)) => builder.basic_auth(user, self.password.as_ref()),
            (None, None) => builder,
        };

        tracing::debug!(method = %request.method, url = %request.url, query = ?request.query, "sending request");
        if let Some(body) = &request.body {
            tracing::trace!(%body, "request body");
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await?;

        let response = Response { status, url, body };
        if status >= 400 && !request.allowed.contains(&status) {
            tracing::error!(
                "HTTP request to {} failed. Response from server was: {}",
                response.url,
                response.body
            );
            return Err(response.into_error());
        }
        Ok(response)
    }

    /// Send a request and parse the JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: Request) -> Result<T, MetaxError> {
        self.send(request).await?.json()
    }

    /// Follow `next` links and collect the `results` member of every page.
    ///
    /// Returns `None` if the first page answers 404 and the request allows
    /// it. Later pages must succeed.
    pub async fn collect_pages(&self, request: Request) -> Result<Option<Vec<Value>>, MetaxError> {
        let first = self.send(request).await?;
        if first.is(404) {
            return Ok(None);
        }

        let mut page: Value = first.json()?;
        let mut results = Vec::new();
        loop {
            let next = page["next"].as_str().map(str::to_string);
            results.push(page.get_mut("results").map(Value::take).unwrap_or_default());
            match next {
                Some(url) => page = self.send_json(Request::get(url)).await?,
                None => break,
            }
        }
        Ok(Some(results))
    }

    /// [`HttpTransport::collect_pages`] for list endpoints: concatenate the
    /// result arrays of every page.
    pub async fn collect_list(&self, request: Request) -> Result<Option<Vec<Value>>, MetaxError> {
        Ok(self.collect_pages(request).await?.map(|pages| {
            pages
                .into_iter()
                .flat_map(|page| match page {
                    Value::Array(items) => items,
                    _ => Vec::new(),
                })
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_user_or_token() {
        let err = HttpTransport::new(None, None, None, true).unwrap_err();
        assert!(matches!(err, MetaxError::MissingCredentials));

        let err = HttpTransport::new(Some(String::new()), None, None, true).unwrap_err();
        assert!(matches!(err, MetaxError::MissingCredentials));

        assert!(HttpTransport::new(Some("tpas".into()), Some("pw".into()), None, true).is_ok());
        assert!(HttpTransport::new(None, None, Some("token".into()), false).is_ok());
    }

    #[test]
    fn debug_hides_secrets() {
        let transport =
            HttpTransport::new(Some("tpas".into()), Some("hunter2".into()), Some("tok".into()), true)
                .unwrap();
        let debug = format!("{:?}", transport);
        assert!(debug.contains("tpas"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("tok\""));
    }

    #[test]
    fn request_builder_collects_query_and_allowed() {
        let request = Request::get("https://metax/v3/datasets")
            .query("limit", 10)
            .query_opt("search", None::<&str>)
            .query_opt("ordering", Some("created"))
            .allow(404);
        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("ordering".to_string(), "created".to_string()),
            ]
        );
        assert_eq!(request.allowed, vec![404]);
    }

    #[test]
    fn empty_body_is_null() {
        let response = Response {
            status: 204,
            url: "https://metax/v3/datasets/x".into(),
            body: String::new(),
        };
        assert_eq!(response.value().unwrap(), Value::Null);
    }
}
