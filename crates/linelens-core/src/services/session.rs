//! Explainer session — the stateful façade over ports and services.
//!
//! One session owns the current explanation, the conversation transcript,
//! the active language, and the speech playback controller. Every failure
//! is recorded as a non-fatal [`Notice`] in session state; no operation
//! returns an error to the caller and none retries on its own.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::domain::{Explanation, LanguageId, Message, SpeechAvailability};
use crate::ports::{ClipboardPort, GenerationError, GenerationPort, SpeechEnginePort, Utterance};
use crate::render::{
    ContentClassifier, DEFAULT_STYLE_CLASS_KEY, LeadingTagClassifier, readable_text,
    render_explanation,
};

use super::playback::{PlaybackController, PlaybackEvent};
use super::voices::{VoiceMatch, VoiceRegistry};

/// Instruction template wrapped around every explanation request.
///
/// `{language}` takes the lowercase language id, `{code}` the raw source.
pub const PROMPT_TEMPLATE: &str = "Please provide a detailed line-by-line explanation of the following code in {language}, covering its functionality, logic, and purpose. Explain it like a friendly coding buddy who speaks {language}. Make it fun, point out any bugs, suggest improvements, and wrap up with helpful tips. Act like a supportive friend! {code}";

/// Build the outgoing prompt for one source submission.
#[must_use]
pub fn build_prompt(language: LanguageId, code: &str) -> String {
    PROMPT_TEMPLATE.replace("{language}", language.as_str()).replace("{code}", code)
}

/// Non-fatal, user-visible condition recorded in session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// What went wrong, for callers that branch on more than the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    RequestFailed,
    MalformedResponse,
    NoSpeechEngine,
    VoiceUnavailable,
    PlaybackFailed,
    ClipboardFailed,
    NothingToSpeak,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    fn request_failed() -> Self {
        Self::new(NoticeKind::RequestFailed, "Oops! An error occurred. Please try again.")
    }

    fn malformed_response() -> Self {
        Self::new(NoticeKind::MalformedResponse, "Oops! An error occurred. Please try again.")
    }

    fn no_speech_engine() -> Self {
        Self::new(NoticeKind::NoSpeechEngine, "Text-to-speech is not available on this system.")
    }

    fn voice_unavailable(display_name: &str) -> Self {
        Self::new(
            NoticeKind::VoiceUnavailable,
            format!("No {display_name} voice is installed for text-to-speech."),
        )
    }

    fn playback_failed() -> Self {
        Self::new(NoticeKind::PlaybackFailed, "Text-to-speech failed. Please try again.")
    }

    fn clipboard_failed() -> Self {
        Self::new(NoticeKind::ClipboardFailed, "Failed to copy to clipboard")
    }

    fn nothing_to_speak() -> Self {
        Self::new(NoticeKind::NothingToSpeak, "There is nothing to read aloud yet.")
    }
}

struct SessionState {
    explanation: Option<Explanation>,
    notice: Option<Notice>,
    transcript: Vec<Message>,
    language: LanguageId,
    /// Bumped per request and by `clear()`; responses carrying an older
    /// number are discarded.
    request_seq: u64,
    in_flight: bool,
}

/// Builder for [`ExplainerSession`]. Speech and clipboard are optional
/// capabilities; leaving one out removes that affordance instead of
/// failing at call time.
pub struct ExplainerSessionBuilder {
    generation: Arc<dyn GenerationPort>,
    speech: Option<Arc<dyn SpeechEnginePort>>,
    clipboard: Option<Arc<dyn ClipboardPort>>,
    classifier: Arc<dyn ContentClassifier>,
    voice_match: VoiceMatch,
    language: LanguageId,
    style_class_key: String,
}

impl ExplainerSessionBuilder {
    #[must_use]
    pub fn with_speech(mut self, engine: Arc<dyn SpeechEnginePort>) -> Self {
        self.speech = Some(engine);
        self
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardPort>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    #[must_use]
    pub fn with_voice_match(mut self, strategy: VoiceMatch) -> Self {
        self.voice_match = strategy;
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: LanguageId) -> Self {
        self.language = language;
        self
    }

    /// Attribute key the markup parser renames `class` to.
    #[must_use]
    pub fn with_style_class_key(mut self, key: impl Into<String>) -> Self {
        self.style_class_key = key.into();
        self
    }

    /// Assemble the session. Must be called within a Tokio runtime; the
    /// playback event pump is spawned here.
    #[must_use]
    pub fn build(self) -> ExplainerSession {
        let state = Arc::new(Mutex::new(SessionState {
            explanation: None,
            notice: None,
            transcript: Vec::new(),
            language: self.language,
            request_seq: 0,
            in_flight: false,
        }));

        let voices = VoiceRegistry::new(self.speech.clone(), self.voice_match);
        let playback = self.speech.map(|engine| {
            let (controller, mut events) = PlaybackController::new(engine);
            let pump_state = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    if let PlaybackEvent::Failed { .. } = event {
                        let mut state =
                            pump_state.lock().unwrap_or_else(PoisonError::into_inner);
                        state.notice = Some(Notice::playback_failed());
                    }
                }
            });
            controller
        });

        ExplainerSession {
            generation: self.generation,
            clipboard: self.clipboard,
            classifier: self.classifier,
            voices,
            playback,
            state,
            style_class_key: self.style_class_key,
        }
    }
}

/// The explainer workflow: request, render, speak, copy, clear.
pub struct ExplainerSession {
    generation: Arc<dyn GenerationPort>,
    clipboard: Option<Arc<dyn ClipboardPort>>,
    classifier: Arc<dyn ContentClassifier>,
    voices: VoiceRegistry,
    playback: Option<PlaybackController>,
    state: Arc<Mutex<SessionState>>,
    style_class_key: String,
}

impl ExplainerSession {
    /// Start building a session around a generation backend.
    #[must_use]
    pub fn builder(generation: Arc<dyn GenerationPort>) -> ExplainerSessionBuilder {
        ExplainerSessionBuilder {
            generation,
            speech: None,
            clipboard: None,
            classifier: Arc::new(LeadingTagClassifier),
            voice_match: VoiceMatch::default(),
            language: LanguageId::English,
            style_class_key: DEFAULT_STYLE_CLASS_KEY.to_owned(),
        }
    }

    /// Submit source code for explanation.
    ///
    /// Empty or whitespace-only source does nothing. A response that
    /// arrives after a newer request or after [`clear`](Self::clear) is
    /// discarded. Failures set a notice and leave the previous
    /// explanation in place.
    pub async fn request_explanation(&self, source: &str) {
        if source.trim().is_empty() {
            return;
        }
        self.stop_speaking();

        let (seq, language, history) = {
            let mut state = self.lock();
            state.request_seq += 1;
            state.in_flight = true;
            (state.request_seq, state.language, state.transcript.clone())
        };
        let prompt = build_prompt(language, source);
        tracing::debug!(chars = source.len(), language = %language, "requesting explanation");

        let result = self.generation.generate(&prompt, &history).await;

        let mut state = self.lock();
        if state.request_seq != seq {
            tracing::debug!("discarding stale explanation response");
            return;
        }
        state.in_flight = false;
        match result {
            Ok(text) => {
                let explanation =
                    render_explanation(text, self.classifier.as_ref(), &self.style_class_key);
                tracing::debug!(kind = %explanation.kind, "explanation received");
                state.transcript.push(Message::user(prompt));
                state.transcript.push(Message::agent(&explanation.text));
                state.explanation = Some(explanation);
                state.notice = None;
            }
            Err(error) => {
                tracing::warn!(%error, "explanation request failed");
                state.notice = Some(match error {
                    GenerationError::MalformedResponse { .. } => Notice::malformed_response(),
                    GenerationError::RequestFailed { .. } => Notice::request_failed(),
                });
            }
        }
    }

    /// Read the current explanation aloud.
    ///
    /// No-op without a result. Records a notice instead of speaking when
    /// no engine is configured, when the displayed tree has no readable
    /// text, or when no installed voice matches the active language.
    pub fn speak(&self) {
        let Some(playback) = &self.playback else {
            self.set_notice(Notice::no_speech_engine());
            return;
        };

        let text = {
            let state = self.lock();
            let Some(explanation) = &state.explanation else {
                return;
            };
            readable_text(&explanation.tree)
        };
        if text.is_empty() {
            self.set_notice(Notice::nothing_to_speak());
            return;
        }

        let profile = self.language().profile();
        let Some(voice) = self.voices.resolve(profile.id) else {
            tracing::debug!(language = %profile.id, "no installed voice matches");
            self.set_notice(Notice::voice_unavailable(profile.display_name));
            return;
        };

        playback.speak(Utterance {
            text,
            voice_id: Some(voice.id),
            language_tag: profile.primary_voice_tag.to_owned(),
        });
    }

    /// Stop any active playback. Safe when idle.
    pub fn stop_speaking(&self) {
        if let Some(playback) = &self.playback {
            playback.stop();
        }
    }

    /// Speak when idle, stop when speaking.
    pub fn toggle_speech(&self) {
        if self.is_speaking() {
            self.stop_speaking();
        } else {
            self.speak();
        }
    }

    /// Forced playback cancellation for a view that became hidden.
    pub fn on_hidden(&self) {
        if let Some(playback) = &self.playback {
            playback.on_hidden();
        }
    }

    /// Switch the language used for subsequent requests and speech.
    pub fn set_language(&self, language: LanguageId) {
        self.lock().language = language;
    }

    /// Reset the session: explanation, notice, transcript, and any
    /// in-flight request are all discarded, and playback stops.
    pub fn clear(&self) {
        {
            let mut state = self.lock();
            state.request_seq += 1;
            state.in_flight = false;
            state.explanation = None;
            state.notice = None;
            state.transcript.clear();
        }
        self.stop_speaking();
        tracing::debug!("session cleared");
    }

    /// Copy the raw explanation text to the clipboard.
    ///
    /// No-op without a result or without a clipboard capability; failure
    /// records a notice and nothing else changes.
    pub async fn copy_explanation(&self) {
        let Some(clipboard) = &self.clipboard else {
            return;
        };
        let text = {
            let state = self.lock();
            match &state.explanation {
                Some(explanation) => explanation.text.clone(),
                None => return,
            }
        };
        if let Err(error) = clipboard.copy_text(&text).await {
            tracing::warn!(%error, "clipboard copy failed");
            self.set_notice(Notice::clipboard_failed());
        }
    }

    /// Re-query the speech engine and replace the voice catalog snapshot.
    pub async fn refresh_voices(&self) {
        self.voices.refresh().await;
    }

    // ── observable state ──────────────────────────────────────────────

    #[must_use]
    pub fn explanation(&self) -> Option<Explanation> {
        self.lock().explanation.clone()
    }

    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.lock().notice.clone()
    }

    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.lock().in_flight
    }

    #[must_use]
    pub fn language(&self) -> LanguageId {
        self.lock().language
    }

    #[must_use]
    pub fn transcript(&self) -> Vec<Message> {
        self.lock().transcript.clone()
    }

    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.playback.as_ref().is_some_and(PlaybackController::is_speaking)
    }

    /// Whether the active language can be spoken right now.
    #[must_use]
    pub fn speech_availability(&self) -> SpeechAvailability {
        self.voices.availability(self.language())
    }

    fn set_notice(&self, notice: Notice) {
        self.lock().notice = Some(notice);
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
