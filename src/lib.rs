#![deny(missing_docs)]

//! Core library for the NoteCraft study backend.

/// HTTP routing and request handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction and handwriting image preparation.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Normalization of provider output into front-end records.
pub mod normalize;
/// Generative provider gateway.
pub mod provider;
/// Per-operation orchestration of extraction, generation, and normalization.
pub mod service;
/// Transient upload storage.
pub mod storage;
/// Audio transcription seam.
pub mod transcription;
