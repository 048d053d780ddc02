use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserPayload {
    pub name: String,
    pub job: String,
}

impl UserPayload {
    pub fn new<N: Into<String>, J: Into<String>>(name: N, job: J) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
        }
    }
}

/// Body of `/api/register` and `/api/login`. The password is left out of the
/// JSON entirely when absent.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new<E: Into<String>, P: Into<String>>(email: E, password: P) -> Self {
        Self {
            email: email.into(),
            password: Some(password.into()),
        }
    }

    pub fn without_password<E: Into<String>>(email: E) -> Self {
        Self {
            email: email.into(),
            password: None,
        }
    }
}
