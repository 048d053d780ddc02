use crate::error::Error;
use hyper::{
    header::{HeaderName, HeaderValue},
    HeaderMap,
};
use std::collections::HashMap;

pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    // it currently ignores header values with opaque characters
    header_map
        .iter()
        .map(|(k, v)| (String::from(k.as_str()), v.to_str()))
        .filter_map(|(key, value)| value.ok().map(|v| (key, String::from(v))))
        .collect::<HashMap<_, _>>()
}

pub fn put_headers<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value)?;
        header_map.append(header_name, header_value);
    }

    Ok(())
}

/// Appends `query` to `path` as a percent-encoded query string.
pub fn append_query<K: AsRef<str>, V: AsRef<str>>(path: &str, query: &[(K, V)]) -> String {
    if query.is_empty() {
        return path.into();
    }

    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish();
    let separator = if path.contains('?') { '&' } else { '?' };

    format!("{}{}{}", path, separator, encoded)
}

/// Compares two bodies as JSON when both parse, as trimmed text otherwise.
pub fn bodies_equal(lhs: &str, rhs: &str) -> bool {
    match (
        serde_json::from_str::<serde_json::Value>(lhs),
        serde_json::from_str::<serde_json::Value>(rhs),
    ) {
        (Ok(lhs), Ok(rhs)) => lhs == rhs,
        _ => lhs.trim() == rhs.trim(),
    }
}
