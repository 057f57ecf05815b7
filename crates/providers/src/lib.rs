//! Model client implementations for rummage.
//!
//! All clients implement the `rummage_core::ModelClient` trait. The loop
//! controller only ever sees the trait object, so swapping the backend (or
//! mocking it in tests) never touches the turn logic.

pub mod gemini;

pub use gemini::GeminiClient;
