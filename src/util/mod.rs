//! Utility functions and helpers
//!
//! - [`retry`] - Transient-error retry and bounded existence polling

pub mod retry;
