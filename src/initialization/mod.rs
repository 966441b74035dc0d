//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a crawl:
//! - Logger (plain or JSON)
//! - DNS resolver used for remote classification
//! - HTTP client with spoofing, redirect policy and certificate capture
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod resolver;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
pub use resolver::init_resolver;
