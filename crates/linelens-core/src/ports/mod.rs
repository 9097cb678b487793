//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the core expects from infrastructure: the
//! generation service, the speech engine, and the host clipboard. Adapter
//! crates implement them; tests substitute in-process fakes.
//!
//! # Design Rules
//!
//! - No HTTP, process, or host-facility types in any signature
//! - Only domain types and plain data cross a port
//! - Errors are port-owned enums; adapters map their internals into them

pub mod clipboard;
pub mod generation;
pub mod speech;

pub use clipboard::{ClipboardError, ClipboardPort};
pub use generation::{GenerationError, GenerationPort};
pub use speech::{SpeakOutcome, SpeechEngineError, SpeechEnginePort, Utterance};
