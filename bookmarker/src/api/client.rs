use std::sync::Arc;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::{Method, StatusCode};
use reqwest::cookie::{CookieStore, Jar};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::errors::HttpError;
use crate::config::ClientConfig;

/// HTTP adapter over the Bookmarker REST API.
///
/// Holds the cookie jar shared with the backend session, so the session
/// cookie and the CSRF cookie set by `set-cookie/` survive across calls.
/// Cloning is cheap and every clone shares the same jar.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
    csrf_header: HeaderName,
}

impl ApiClient {
    /// Creates a client with the following settings:
    ///
    /// - `timeout`: taken from the configuration, applied to every request
    ///   unless the request overrides it.
    /// - `cookie_provider`: an in-memory jar, which is also where the CSRF
    ///   token is read back from.
    /// - `pool_idle_timeout`: 90 seconds (reqwest's default, made explicit).
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {e}", config.api_url)))?;
        let csrf_header = HeaderName::from_bytes(config.csrf_header_name.as_bytes())
            .map_err(|e| HttpError::Config(format!("CSRF header name: {e}")))?;

        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| HttpError::Config(e.to_string()))?;

        tracing::debug!("API client created for {}", base_url);

        Ok(Self {
            http,
            jar,
            base_url,
            csrf_header,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path such as `bookmarks/5/` against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, HttpError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Value of a cookie the backend has set for the API origin.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let raw = header.to_str().ok()?;
        find_cookie(raw, name)
    }

    pub fn request(&self, method: Method, path: &str) -> ApiRequest<'_> {
        ApiRequest {
            client: self,
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: RequestBody::Empty,
            csrf_token: None,
            timeout: None,
        }
    }

    pub fn get(&self, path: &str) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn patch(&self, path: &str) -> ApiRequest<'_> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> ApiRequest<'_> {
        self.request(Method::DELETE, path)
    }
}

fn find_cookie(raw: &str, name: &str) -> Option<String> {
    raw.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[derive(Debug)]
enum RequestBody {
    Empty,
    Form(Vec<(String, String)>),
    Json(Value),
    Unserializable(String),
}

/// A request under construction. Nothing is sent until [`ApiRequest::send`].
#[derive(Debug)]
pub struct ApiRequest<'a> {
    client: &'a ApiClient,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    csrf_token: Option<String>,
    timeout: Option<Duration>,
}

impl ApiRequest<'_> {
    /// Appends query parameters, keeping their order.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Form-encoded body (`application/x-www-form-urlencoded`).
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = match serde_json::to_value(body) {
            Ok(value) => RequestBody::Json(value),
            Err(e) => RequestBody::Unserializable(e.to_string()),
        };
        self
    }

    /// Attaches the CSRF header when a token is known. Without one the
    /// request is still sent; the backend then answers 403.
    pub fn csrf(mut self, token: Option<&str>) -> Self {
        self.csrf_token = token.map(str::to_string);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn send(self) -> Result<ApiResponse, HttpError> {
        let url = self.client.url(&self.path)?;
        let mut builder = self.client.http.request(self.method.clone(), url);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }

        builder = match self.body {
            RequestBody::Empty => builder,
            RequestBody::Form(pairs) => builder.form(&pairs),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Unserializable(msg) => {
                return Err(HttpError::Malformed(format!("request body: {msg}")));
            }
        };

        if let Some(token) = &self.csrf_token {
            let value = HeaderValue::from_str(token)
                .map_err(|e| HttpError::Config(format!("CSRF token is not a valid header: {e}")))?;
            builder = builder.header(self.client.csrf_header.clone(), value);
        }

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!("{} {}", self.method, self.path);

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!("{} {} -> {}", self.method, self.path, status);

        ApiResponse::from_parts(status, &text)
    }
}

/// A successful (2xx) response with its decoded JSON body, if any.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    fn from_parts(status: StatusCode, text: &str) -> Result<Self, HttpError> {
        let body = if text.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<Value>(text) {
                Ok(value) => Some(value),
                Err(e) if status.is_success() => {
                    return Err(HttpError::Malformed(format!(
                        "expected JSON body with status {status}: {e}"
                    )));
                }
                Err(_) => {
                    tracing::debug!("Discarding non-JSON error body for status {}", status);
                    None
                }
            }
        };

        if status.is_success() {
            Ok(Self { status, body })
        } else {
            Err(HttpError::from_status(status, body))
        }
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = self
            .body
            .ok_or_else(|| HttpError::Malformed("empty response body".to_string()))?;
        serde_json::from_value(body).map_err(|e| HttpError::Malformed(e.to_string()))
    }
}
