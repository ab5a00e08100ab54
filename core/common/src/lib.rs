//! Common utilities and types shared across Tricrypt modules.
//!
//! This module provides the error taxonomy used by every layer of the
//! envelope protocol and a wiping byte buffer for sensitive intermediates.

pub mod error;
pub mod types;

pub use error::{DecryptError, Error, Result};
pub use types::SensitiveBytes;
