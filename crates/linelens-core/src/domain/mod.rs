//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (HTTP, speech engines, clipboards).
//!
//! # Structure
//!
//! - `content` - Explanation results and their rendering classification
//! - `render` - The inert display tree handed to an embedding UI
//! - `language` - Supported languages and their speech profiles
//! - `chat` - Conversation transcript types
//! - `voice` - Installed-voice catalog snapshots

pub mod chat;
pub mod content;
pub mod language;
pub mod render;
pub mod voice;

// Re-export domain types at the domain level for convenience
pub use chat::{Message, Sender};
pub use content::{ContentKind, Explanation};
pub use language::{LanguageId, LanguageProfile};
pub use render::{ElementNode, RenderNode};
pub use voice::{SpeechAvailability, VoiceCatalog, VoiceInfo};
