//! Building blocks for checking a JSON HTTP API from `cargo test`.
//!
//! A [`Session`] issues blocking requests against one origin, a
//! [`SchemaStore`] resolves JSON Schema fixtures, and the functions in
//! [`assertions`] compare status codes and fields. Interactions can be
//! recorded to markdown and replayed by a local [`PlaybackServer`], which is
//! what the `apicheck_playback_test` and `apicheck_record_test` attributes
//! wire together.

pub mod assertions;
mod data;
mod error;
mod http_client;
pub mod logging;
pub mod markdown;
mod playback_server;
mod schema;
mod session;
mod util;

pub use apicheck_codegen::apicheck_playback_test;
pub use apicheck_codegen::apicheck_record_test;
pub use assertions::{expect_field, expect_status};
pub use data::{InteractionData, RequestData, ResponseData};
pub use error::{Error, Violation};
pub use http_client::{HttpClient, RecordingHttpClient, ReqwestHttpClient, VOLATILE_HEADERS};
pub use playback_server::PlaybackServer;
pub use schema::{validate, SchemaName, SchemaStore};
pub use session::{
    create_session, Session, SessionBuilder, SessionConfiguration, DEFAULT_API_KEY_HEADER,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
