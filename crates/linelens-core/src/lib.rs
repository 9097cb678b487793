#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod render;
pub mod services;
pub mod telemetry;

// Re-export commonly used types for convenience
pub use domain::{
    ContentKind, ElementNode, Explanation, LanguageId, LanguageProfile, Message, RenderNode,
    Sender, SpeechAvailability, VoiceCatalog, VoiceInfo,
};
pub use ports::{
    ClipboardError, ClipboardPort, GenerationError, GenerationPort, SpeakOutcome,
    SpeechEngineError, SpeechEnginePort, Utterance,
};
pub use render::{
    ContentClassifier, DEFAULT_STYLE_CLASS_KEY, LeadingTagClassifier, build_markup_tree,
    build_narrative_tree, readable_text, render_explanation, render_tree,
};
pub use services::{
    ExplainerSession, ExplainerSessionBuilder, Notice, NoticeKind, PROMPT_TEMPLATE,
    PlaybackController, PlaybackEvent, PlaybackState, VoiceMatch, VoiceRegistry, build_prompt,
    resolve_voice,
};

// Silence unused dev-dependency warnings until we add mock-based tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
