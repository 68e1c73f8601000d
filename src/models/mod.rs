//! Data models

pub mod scenario;

pub use scenario::*;
