//! Common utilities for the tagmark pipeline.
//!
//! This crate provides shared infrastructure used by all tagmark components:
//! - **Warning System** - colored, deduplicated terminal output for
//!   irregular input that the pipeline recovered from

pub mod warning;
