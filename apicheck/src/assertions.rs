use crate::{error::Error, ResponseData};
use serde_json::Value;

pub fn expect_status(response: &ResponseData, expected: u16) -> Result<(), Error> {
    if response.status_code == expected {
        Ok(())
    } else {
        Err(Error::UnexpectedStatus {
            expected,
            actual: response.status_code,
        })
    }
}

/// Compares the value at JSON pointer `pointer` (e.g. `/data/id`) with `expected`.
pub fn expect_field<T: Into<Value>>(body: &Value, pointer: &str, expected: T) -> Result<(), Error> {
    let expected = expected.into();

    match body.pointer(pointer) {
        Some(actual) if *actual == expected => Ok(()),
        actual => Err(Error::UnexpectedValue {
            pointer: pointer.into(),
            expected: expected.to_string(),
            actual: actual
                .map(Value::to_string)
                .unwrap_or_else(|| String::from("<missing>")),
        }),
    }
}
