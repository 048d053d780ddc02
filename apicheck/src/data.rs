use crate::error::Error;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct InteractionData {
    pub interaction_number: usize,
    pub request_data: RequestData,
    pub response_data: ResponseData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestData {
    /// Path and query relative to the session's base URL.
    pub uri: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ResponseData {
    /// Parses the body as JSON.
    pub fn json(&self) -> Result<Value, Error> {
        serde_json::from_str(&self.body).map_err(|e| Error::InvalidJsonBody(e, self.body.clone()))
    }

    pub fn header<S: AsRef<str>>(&self, name: S) -> Option<&str> {
        let name = name.as_ref();
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
