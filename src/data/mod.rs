//! Data fetching and caching
//!
//! Handles:
//! - Yahoo Finance options API
//! - Local HTTP response caching

pub mod cache;
pub mod source;
pub mod yahoo;

pub use cache::*;
pub use source::*;
pub use yahoo::*;
