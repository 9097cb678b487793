//! Installed speech voices.

use serde::{Deserialize, Serialize};

/// One installed voice as reported by the speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInfo {
    /// Engine identifier handed back when requesting this voice.
    pub id: String,

    /// Human-readable display name.
    pub name: String,

    /// BCP 47-style language tag (`en-US`, `ta`). Casing is whatever the
    /// engine reports; matching is case-insensitive.
    pub language_tag: String,
}

/// Immutable snapshot of the installed voices.
///
/// Engines populate their voice lists asynchronously, so a catalog may be
/// empty at any time. Refreshes replace the whole snapshot; a catalog is
/// never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCatalog {
    voices: Vec<VoiceInfo>,
}

impl VoiceCatalog {
    #[must_use]
    pub const fn new(voices: Vec<VoiceInfo>) -> Self {
        Self { voices }
    }

    #[must_use]
    pub fn voices(&self) -> &[VoiceInfo] {
        &self.voices
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.voices.len()
    }
}

/// Whether speech can be offered for a language right now.
///
/// Drives the speak affordance of an embedding UI: hidden when there is no
/// engine, amended when no voice matches, fully live when a voice resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechAvailability {
    /// The runtime has no speech engine at all.
    NoEngine,
    /// An engine exists but no installed voice matches the language.
    NoVoice,
    /// Speech is available through this voice.
    Ready(VoiceInfo),
}

impl SpeechAvailability {
    /// True when a speech engine exists at all.
    ///
    /// `NoVoice` keeps the affordance visible so the UI can explain the
    /// missing voice, but playback is only attempted from `Ready`.
    #[must_use]
    pub const fn engine_present(&self) -> bool {
        !matches!(self, Self::NoEngine)
    }
}
