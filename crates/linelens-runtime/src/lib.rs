#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod clipboard;
mod espeak;
mod which;

// ============================================================================
// Public API
// ============================================================================

// Speech engine
pub use espeak::{EspeakConfig, EspeakEngine};

// Clipboard
pub use clipboard::SystemClipboard;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
