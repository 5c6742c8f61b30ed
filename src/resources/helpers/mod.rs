//! Helpers shared by resource implementations.
pub mod download;
pub mod fs;
