//! Generation backend adapters.
//!
//! The HTTP adapter speaks the backend's JSON API; the mock adapter
//! serves scripted responses for tests. Both implement the
//! `GenerationClient` port.

mod dto;
mod http_client;
mod mock_client;

pub use http_client::{HttpClientConfig, HttpGenerationClient};
pub use mock_client::{MockCall, MockGenerationClient};
