mod payloads;

pub use payloads::{Credentials, UserPayload};
