use crate::{
    error::Error,
    http_client::{HttpClient, ReqwestHttpClient},
    util, RequestData, ResponseData,
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://reqres.in";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The public key reqres.in expects on every call.
pub const DEFAULT_API_KEY_HEADER: (&str, &str) = ("x-api-key", "reqres-free-v1");

/// Immutable settings a [`Session`] is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfiguration {
    base_url: String,
    default_headers: HashMap<String, String>,
    timeout: Duration,
}

impl SessionConfiguration {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder used to build a Session instance
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
}

impl SessionBuilder {
    /// Create a builder preloaded with the reqres defaults.
    pub fn new() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(String::from("accept"), String::from("application/json"));
        default_headers.insert(
            String::from(DEFAULT_API_KEY_HEADER.0),
            String::from(DEFAULT_API_KEY_HEADER.1),
        );

        Self {
            base_url: None,
            default_headers,
            timeout: None,
            http_client: None,
        }
    }

    /// Use the given origin, e.g. `https://reqres.in`. A trailing slash is dropped.
    pub fn with_base_url<T: Into<String>>(mut self, base_url: T) -> Self {
        self.set_base_url(base_url);
        self
    }

    pub fn set_base_url<T: Into<String>>(&mut self, base_url: T) {
        self.base_url = Some(base_url.into().trim_end_matches('/').into());
    }

    /// Send `name: value` with every request. Names are case-insensitive.
    pub fn with_default_header<N: AsRef<str>, V: Into<String>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.set_default_header(name, value);
        self
    }

    pub fn set_default_header<N: AsRef<str>, V: Into<String>>(&mut self, name: N, value: V) {
        self.default_headers
            .insert(name.as_ref().to_lowercase(), value.into());
    }

    pub fn without_default_header<N: AsRef<str>>(mut self, name: N) -> Self {
        self.remove_default_header(name);
        self
    }

    pub fn remove_default_header<N: AsRef<str>>(&mut self, name: N) {
        self.default_headers.remove(&name.as_ref().to_lowercase());
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Send requests through `http_client` instead of a fresh reqwest client.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient + Send + Sync>) -> Self {
        self.set_http_client(http_client);
        self
    }

    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient + Send + Sync>) {
        self.http_client = Some(http_client);
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// The client set with [`SessionBuilder::set_http_client`], if any.
    pub fn http_client(&self) -> Option<Arc<dyn HttpClient + Send + Sync>> {
        self.http_client.clone()
    }

    /// Consume the builder. No request is sent here.
    pub fn build(mut self) -> Result<Session, Error> {
        let timeout = self.timeout();
        let configuration = SessionConfiguration {
            base_url: self
                .base_url
                .take()
                .unwrap_or_else(|| String::from(DEFAULT_BASE_URL)),
            default_headers: self.default_headers,
            timeout,
        };

        let http_client = match self.http_client.take() {
            Some(http_client) => http_client,
            None => Arc::new(ReqwestHttpClient::new(configuration.timeout)?),
        };

        Ok(Session {
            configuration,
            http_client,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a session bound to `base_url` with `default_headers` added to the defaults.
pub fn create_session<T, I, N, V>(base_url: T, default_headers: I) -> Result<Session, Error>
where
    T: Into<String>,
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: Into<String>,
{
    default_headers
        .into_iter()
        .fold(SessionBuilder::new().with_base_url(base_url), |builder, (name, value)| {
            builder.with_default_header(name, value)
        })
        .build()
}

/// A request-issuing context bound to one origin. Every call is a single
/// blocking request with no retries.
#[derive(Debug, Clone)]
pub struct Session {
    configuration: SessionConfiguration,
    http_client: Arc<dyn HttpClient + Send + Sync>,
}

impl Session {
    pub fn configuration(&self) -> &SessionConfiguration {
        &self.configuration
    }

    pub fn get<K: AsRef<str>, V: AsRef<str>>(
        &self,
        path: &str,
        query: &[(K, V)],
    ) -> Result<ResponseData, Error> {
        self.send("GET", util::append_query(path, query), None)
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ResponseData, Error> {
        self.send("POST", path.into(), Some(Self::serialize(body)?))
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ResponseData, Error> {
        self.send("PUT", path.into(), Some(Self::serialize(body)?))
    }

    pub fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ResponseData, Error> {
        self.send("PATCH", path.into(), Some(Self::serialize(body)?))
    }

    fn serialize<B: Serialize + ?Sized>(body: &B) -> Result<String, Error> {
        serde_json::to_string(body).map_err(|e| Error::InvalidRequestBody(e.to_string()))
    }

    fn send(&self, method: &str, uri: String, body: Option<String>) -> Result<ResponseData, Error> {
        let mut headers = self.configuration.default_headers.clone();
        if body.is_some() {
            headers.insert(String::from("content-type"), String::from("application/json"));
        }

        let request_data = RequestData {
            uri,
            method: method.into(),
            headers,
            body: body.unwrap_or_default(),
        };

        self.http_client
            .make_request(&self.configuration.base_url, &request_data)
    }
}
