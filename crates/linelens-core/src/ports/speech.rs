//! Port for the speech engine.
//!
//! The engine is the only component that touches real audio. Everything
//! above it (the playback controller, the session) works purely in terms
//! of this trait, so tests drive the whole speech path with an in-process
//! fake.

use async_trait::async_trait;

use crate::domain::VoiceCatalog;

/// One utterance handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Listener-ready text (already extracted and whitespace-normalized).
    pub text: String,

    /// Resolved voice, when one matched the language. `None` lets the
    /// engine pick its default voice for the language tag.
    pub voice_id: Option<String>,

    /// BCP 47 tag of the explanation language.
    pub language_tag: String,
}

/// How an utterance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Playback reached the end of the text.
    Completed,
    /// Playback was cut off by [`SpeechEnginePort::cancel`].
    Interrupted,
}

/// Errors the speech engine can report.
#[derive(Debug, thiserror::Error)]
pub enum SpeechEngineError {
    /// The engine is missing or unusable on this host.
    #[error("speech engine unavailable: {message}")]
    EngineUnavailable { message: String },

    /// Text could not be synthesized.
    #[error("speech synthesis failed: {message}")]
    SynthesisFailed { message: String },

    /// Synthesized audio could not be played.
    #[error("speech playback failed: {message}")]
    PlaybackFailed { message: String },
}

/// Engine abstraction for speaking one utterance at a time.
#[async_trait]
pub trait SpeechEnginePort: Send + Sync {
    /// Snapshot of the installed voices.
    ///
    /// May legitimately be empty — engines populate their lists
    /// asynchronously, and callers tolerate an empty catalog.
    async fn voices(&self) -> Result<VoiceCatalog, SpeechEngineError>;

    /// Speak an utterance to completion.
    ///
    /// Resolves when playback finishes naturally (`Completed`) or was cut
    /// off by [`cancel`](Self::cancel) (`Interrupted`). Implementations
    /// must not keep playing after a cancel.
    async fn speak(&self, utterance: &Utterance) -> Result<SpeakOutcome, SpeechEngineError>;

    /// Cut off any current playback immediately.
    ///
    /// Synchronous so teardown paths can call it without a runtime.
    /// Idempotent and safe to call while idle.
    fn cancel(&self);
}
