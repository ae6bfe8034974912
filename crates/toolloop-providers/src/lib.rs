//! Model gateway layer for Toolloop.
//!
//! # Architecture
//!
//! - [`traits::ModelGateway`]: trait the orchestration loop calls
//! - [`registry`]: static specs for supported providers + matching logic
//! - [`http_gateway::HttpGateway`]: generic OpenAI-compatible HTTP client
//! - [`retry::RetryingGateway`]: caller-side retry with capped backoff

pub mod http_gateway;
pub mod registry;
pub mod retry;
pub mod traits;

pub use http_gateway::{create_gateway, HttpGateway};
pub use registry::{ProviderConfig, ProviderSpec, PROVIDERS};
pub use retry::{RetryPolicy, RetryingGateway};
pub use traits::{LlmRequestConfig, ModelGateway};
