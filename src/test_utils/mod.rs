//! Test doubles shared by unit and integration tests.
//!
//! Compiled for unit tests and, through the `test-util` feature, for the
//! integration tests under `tests/`.

mod collecting_handler;
mod recording_client;

pub use collecting_handler::CollectingHandler;
pub use recording_client::RecordingClient;
