use crate::{error::Error, markdown, util, InteractionData, RequestData, ResponseData};
use reqwest::{blocking::Client, header::HeaderMap, Method};
use std::{
    collections::HashMap,
    fmt::Debug,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing::{debug, info};

/// Transport seam used by [`Session`](crate::Session).
pub trait HttpClient: Debug {
    fn make_request(&self, base_url: &str, request_data: &RequestData)
        -> Result<ResponseData, Error>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn make_request(
        &self,
        base_url: &str,
        request_data: &RequestData,
    ) -> Result<ResponseData, Error> {
        let url = format!("{}{}", base_url, request_data.uri);
        let method = Method::from_bytes(request_data.method.as_bytes())
            .map_err(|e| Error::Http(e.into()))?;

        debug!(%method, %url, "sending request");

        let mut header_map = HeaderMap::new();
        util::put_headers(
            &mut header_map,
            request_data
                .headers
                .iter()
                .filter(|(header_name, _)| !header_name.eq_ignore_ascii_case("host")),
        )?;

        let mut request_builder = self
            .client
            .request(method, url.as_str())
            .headers(header_map);

        if !request_data.body.is_empty() {
            request_builder = request_builder.body(request_data.body.clone());
        }

        let response = request_builder.send()?;

        let status_code = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let body = response.bytes()?;
        let body: String = String::from_utf8_lossy(&body).into();

        debug!(status_code, %url, "received response");

        Ok(ResponseData {
            status_code,
            body,
            headers,
        })
    }
}

/// Headers that change on every call and would make recordings noisy.
pub const VOLATILE_HEADERS: &[&str] = &[
    "date",
    "etag",
    "age",
    "cf-ray",
    "cf-cache-status",
    "nel",
    "report-to",
    "server-timing",
    "set-cookie",
    "x-powered-by",
    "via",
];

/// Forwards requests to an inner client and keeps every interaction.
#[derive(Debug)]
pub struct RecordingHttpClient {
    inner: Arc<dyn HttpClient + Send + Sync>,
    interactions: Mutex<Vec<InteractionData>>,
    ignored_headers: Vec<String>,
}

impl RecordingHttpClient {
    pub fn new(inner: Arc<dyn HttpClient + Send + Sync>) -> Self {
        Self {
            inner,
            interactions: Mutex::new(Vec::new()),
            ignored_headers: VOLATILE_HEADERS.iter().map(|h| String::from(*h)).collect(),
        }
    }

    pub fn ignore_header<S: Into<String>>(&mut self, header_name: S) {
        self.ignored_headers.push(header_name.into().to_lowercase());
    }

    pub fn interactions(&self) -> Result<Vec<InteractionData>, Error> {
        Ok(self.interactions.lock()?.clone())
    }

    /// Writes every recorded interaction to `markdown_path`, leaving the file
    /// untouched when it already holds the same interactions.
    pub fn save<P: AsRef<Path>>(&self, markdown_path: P) -> Result<(), Error> {
        let markdown_path = markdown_path.as_ref();
        let interactions = self.interactions.lock()?;

        if markdown_path.exists()
            && markdown::check_markdown_data_unchanged(markdown_path, interactions.iter())
                .unwrap_or(false)
        {
            info!(path = %markdown_path.display(), "recording unchanged");
            return Ok(());
        }

        markdown::save_interactions(markdown_path, interactions.iter())?;

        info!(
            path = %markdown_path.display(),
            count = interactions.len(),
            "saved recorded interactions"
        );

        Ok(())
    }

    fn strip_headers(&self, headers: &HashMap<String, String>) -> HashMap<String, String> {
        headers
            .iter()
            .filter(|(key, _)| {
                !self
                    .ignored_headers
                    .iter()
                    .any(|ignored| key.eq_ignore_ascii_case(ignored))
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl HttpClient for RecordingHttpClient {
    fn make_request(
        &self,
        base_url: &str,
        request_data: &RequestData,
    ) -> Result<ResponseData, Error> {
        let response_data = self.inner.make_request(base_url, request_data)?;

        let mut interactions = self.interactions.lock()?;
        let interaction_number = interactions.len();
        interactions.push(InteractionData {
            interaction_number,
            request_data: RequestData {
                headers: self.strip_headers(&request_data.headers),
                ..request_data.clone()
            },
            response_data: ResponseData {
                headers: self.strip_headers(&response_data.headers),
                ..response_data.clone()
            },
        });

        Ok(response_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EchoHttpClient;

    impl HttpClient for EchoHttpClient {
        fn make_request(
            &self,
            _base_url: &str,
            request_data: &RequestData,
        ) -> Result<ResponseData, Error> {
            let mut headers = HashMap::new();
            headers.insert("Date".into(), "Mon, 19 Oct 2026 10:00:00 GMT".into());
            headers.insert("content-type".into(), "application/json".into());

            Ok(ResponseData {
                status_code: 201,
                headers,
                body: request_data.body.clone(),
            })
        }
    }

    fn request(body: &str) -> RequestData {
        let mut headers = HashMap::new();
        headers.insert("x-api-key".into(), "reqres-free-v1".into());

        RequestData {
            uri: "/api/users".into(),
            method: "POST".into(),
            headers,
            body: body.into(),
        }
    }

    #[test]
    fn recording_client_keeps_interactions_in_order() {
        let client = RecordingHttpClient::new(Arc::new(EchoHttpClient));

        client
            .make_request("http://localhost", &request(r#"{"name":"first"}"#))
            .unwrap();
        client
            .make_request("http://localhost", &request(r#"{"name":"second"}"#))
            .unwrap();

        let interactions = client.interactions().unwrap();
        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[0].interaction_number, 0);
        assert_eq!(interactions[1].interaction_number, 1);
        assert_eq!(interactions[1].response_data.body, r#"{"name":"second"}"#);
    }

    #[test]
    fn recording_client_strips_volatile_and_ignored_headers() {
        let mut client = RecordingHttpClient::new(Arc::new(EchoHttpClient));
        client.ignore_header("X-Api-Key");

        let response = client
            .make_request("http://localhost", &request("{}"))
            .unwrap();

        let interaction = &client.interactions().unwrap()[0];
        assert!(response.headers.contains_key("Date"));
        assert!(!interaction.response_data.headers.contains_key("Date"));
        assert!(interaction.response_data.headers.contains_key("content-type"));
        assert!(interaction.request_data.headers.is_empty());
    }

    #[test]
    fn save_writes_a_replayable_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("create.md");
        let client = RecordingHttpClient::new(Arc::new(EchoHttpClient));
        client
            .make_request("http://localhost", &request(r#"{"name":"Kristina","job":"QA"}"#))
            .unwrap();

        client.save(&path).unwrap();
        client.save(&path).unwrap();

        let loaded = markdown::load_markdown(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].request_data.method, "POST");
        assert_eq!(loaded[0].response_data.status_code, 201);
        assert_eq!(
            loaded[0].response_data.body,
            r#"{"name":"Kristina","job":"QA"}"#
        );
    }

    #[test]
    fn long_recordings_keep_their_interaction_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.md");
        let client = RecordingHttpClient::new(Arc::new(EchoHttpClient));
        for page in 0..300 {
            client
                .make_request(
                    "http://localhost",
                    &RequestData {
                        uri: format!("/api/users?page={}", page),
                        method: "GET".into(),
                        headers: HashMap::new(),
                        body: String::new(),
                    },
                )
                .unwrap();
        }

        client.save(&path).unwrap();
        let loaded = markdown::load_markdown(&path).unwrap();

        assert_eq!(loaded.len(), 300);
        for (number, interaction) in loaded.iter().enumerate() {
            assert_eq!(interaction.interaction_number, number);
            assert_eq!(
                interaction.request_data.uri,
                format!("/api/users?page={}", number)
            );
        }
    }
}
