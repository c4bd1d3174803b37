//! Google Gemini REST integration.
//!
//! [`GeminiClient`] implements [`storyboard_interface::GenerativeDriver`] over
//! plain HTTPS with `reqwest`. It performs one request per call; retries are
//! applied by the orchestration layer.

mod client;
mod conversion;
mod credentials;
pub mod protocol;

pub use client::GeminiClient;
pub use conversion::{
    from_generate_content, from_predict, parse_error_body, to_generate_content, to_predict,
};
pub use credentials::{API_KEY_VARS, resolve_api_key, resolve_api_key_from};
