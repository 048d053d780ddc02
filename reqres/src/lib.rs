//! Checks against the reqres.in mock REST service.
//!
//! Every scenario in [`scenarios`] issues one call, validates the body
//! against its schema fixture and asserts the status code and a few fields.
//! The tests replay the recordings in `playback_data/`; run
//! `cargo test -- --ignored` to check the live service and refresh them.

pub mod data;
pub mod scenarios;
pub mod schemas;

pub use schemas::{schema_store, ReqresSchema};
