//! Storage abstractions for service layer
//!
//! File-backed documents that persist whole collections as JSON.

pub mod json_document;

pub use json_document::JsonDocument;
