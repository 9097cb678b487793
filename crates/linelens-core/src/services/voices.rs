//! Voice registry — catalog snapshots and voice resolution.
//!
//! Speech engines report their installed voices asynchronously, so the
//! registry holds an immutable snapshot that refreshes replace wholesale.
//! Resolution never waits: it answers from whatever snapshot is current,
//! and an empty snapshot simply resolves nothing.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{LanguageId, LanguageProfile, SpeechAvailability, VoiceCatalog, VoiceInfo};
use crate::ports::SpeechEnginePort;

/// How a language profile is matched against installed voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceMatch {
    /// Only the exact primary tag counts.
    Exact,
    /// Exact primary tag first, then the bare language prefix.
    #[default]
    ExactThenPrefix,
}

/// Pick the best installed voice for a language.
///
/// Matching is case-insensitive throughout. Returns `None` on an empty
/// catalog or when nothing matches; the caller decides what that means.
#[must_use]
pub fn resolve_voice(
    profile: &LanguageProfile,
    catalog: &VoiceCatalog,
    strategy: VoiceMatch,
) -> Option<VoiceInfo> {
    let exact = catalog
        .voices()
        .iter()
        .find(|voice| voice.language_tag.eq_ignore_ascii_case(profile.primary_voice_tag));
    if exact.is_some() || strategy == VoiceMatch::Exact {
        return exact.cloned();
    }

    let prefix = profile.fallback_voice_tag.to_ascii_lowercase();
    catalog
        .voices()
        .iter()
        .find(|voice| voice.language_tag.to_ascii_lowercase().starts_with(&prefix))
        .cloned()
}

/// Holds the current voice catalog and resolves voices against it.
///
/// Constructed with or without an engine; without one, every lookup
/// reports [`SpeechAvailability::NoEngine`] and refreshes are no-ops.
pub struct VoiceRegistry {
    engine: Option<Arc<dyn SpeechEnginePort>>,
    strategy: VoiceMatch,
    catalog_tx: watch::Sender<Arc<VoiceCatalog>>,
}

impl VoiceRegistry {
    /// Create a registry over an engine (or none).
    #[must_use]
    pub fn new(engine: Option<Arc<dyn SpeechEnginePort>>, strategy: VoiceMatch) -> Self {
        let (catalog_tx, _) = watch::channel(Arc::new(VoiceCatalog::default()));
        Self { engine, strategy, catalog_tx }
    }

    /// Whether a speech engine is present at all.
    #[must_use]
    pub const fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// The current catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> Arc<VoiceCatalog> {
        self.catalog_tx.borrow().clone()
    }

    /// Subscribe to catalog replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<VoiceCatalog>> {
        self.catalog_tx.subscribe()
    }

    /// Re-query the engine and replace the snapshot.
    ///
    /// A failed refresh keeps the previous snapshot; voice listing is not
    /// worth failing a session over.
    pub async fn refresh(&self) {
        let Some(engine) = &self.engine else {
            return;
        };
        match engine.voices().await {
            Ok(catalog) => {
                tracing::debug!(voices = catalog.len(), "voice catalog refreshed");
                self.catalog_tx.send_replace(Arc::new(catalog));
            }
            Err(error) => {
                tracing::warn!(%error, "voice catalog refresh failed; keeping previous snapshot");
            }
        }
    }

    /// Resolve a voice for a language from the current snapshot.
    #[must_use]
    pub fn resolve(&self, language: LanguageId) -> Option<VoiceInfo> {
        resolve_voice(language.profile(), &self.catalog(), self.strategy)
    }

    /// Whether speech can be offered for a language right now.
    #[must_use]
    pub fn availability(&self, language: LanguageId) -> SpeechAvailability {
        if !self.has_engine() {
            return SpeechAvailability::NoEngine;
        }
        self.resolve(language)
            .map_or(SpeechAvailability::NoVoice, SpeechAvailability::Ready)
    }
}
