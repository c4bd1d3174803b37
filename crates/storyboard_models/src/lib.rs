//! Provider integrations for Storyboard.
//!
//! # Example
//!
//! ```no_run
//! use storyboard_core::GenerateRequest;
//! use storyboard_interface::GenerativeDriver;
//! use storyboard_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(None)?;
//! let request = GenerateRequest::text("gemini-2.5-flash", "Hello");
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod gemini;

pub use gemini::{
    API_KEY_VARS, GeminiClient, from_generate_content, from_predict, parse_error_body, protocol,
    resolve_api_key, resolve_api_key_from, to_generate_content, to_predict,
};
