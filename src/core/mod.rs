//! Core data types for the screener
//!
//! Defines:
//! - OptionType: chain side (calls/puts)
//! - OptionRow: one raw option-chain record as fetched
//! - ScreenerError: crate-wide error type

pub mod error;
pub mod option;

pub use error::*;
pub use option::*;
