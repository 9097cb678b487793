//! Speech playback controller — the single-utterance state machine.
//!
//! ```text
//!   Idle ──speak──▶ Speaking ──engine done / stop / hide──▶ Idle
//! ```
//!
//! At most one utterance is ever live. Starting a new one cancels the
//! engine unconditionally, even when nothing is playing. Every utterance
//! carries a sequence number; an engine completion only counts if its
//! sequence is still current, so a superseded or cancelled utterance can
//! never flip the state or emit a late event.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::ports::{SpeechEnginePort, Utterance};

/// Current state of speech playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing is being spoken.
    Idle,
    /// An utterance is live.
    Speaking,
}

/// Events mirroring the engine's completion callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// An utterance was handed to the engine.
    Started,
    /// Playback ended — naturally or by cancellation.
    Finished,
    /// The engine reported an error; playback is back to idle.
    Failed { message: String },
}

struct Shared {
    state: PlaybackState,
    /// Bumped on every start, stop, and teardown; watchers compare
    /// against it to detect staleness.
    seq: u64,
}

/// Drives a speech engine one utterance at a time.
pub struct PlaybackController {
    engine: Arc<dyn SpeechEnginePort>,
    shared: Arc<Mutex<Shared>>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller over an engine, returning the event stream.
    #[must_use]
    pub fn new(
        engine: Arc<dyn SpeechEnginePort>,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(Shared { state: PlaybackState::Idle, seq: 0 }));
        (Self { engine, shared, events }, rx)
    }

    /// Begin speaking an utterance.
    ///
    /// Cancels any existing utterance first, unconditionally. Returns as
    /// soon as the utterance is handed off; completion arrives later as a
    /// [`PlaybackEvent`]. Must be called within a Tokio runtime.
    pub fn speak(&self, utterance: Utterance) {
        self.engine.cancel();

        let seq = {
            let mut shared = self.lock();
            shared.seq += 1;
            shared.state = PlaybackState::Speaking;
            shared.seq
        };
        tracing::debug!(chars = utterance.text.len(), lang = %utterance.language_tag, "speaking");
        let _ = self.events.send(PlaybackEvent::Started);

        let engine = Arc::clone(&self.engine);
        let shared = Arc::clone(&self.shared);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = engine.speak(&utterance).await;

            let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.seq != seq {
                // Superseded or cancelled while speaking; someone else
                // already owns the state.
                return;
            }
            guard.state = PlaybackState::Idle;
            drop(guard);

            match outcome {
                Ok(_) => {
                    tracing::debug!("playback finished");
                    let _ = events.send(PlaybackEvent::Finished);
                }
                Err(error) => {
                    tracing::warn!(%error, "playback failed");
                    let _ = events.send(PlaybackEvent::Failed { message: error.to_string() });
                }
            }
        });
    }

    /// Stop any active playback.
    ///
    /// Idempotent: stopping while idle does nothing and is not an error.
    pub fn stop(&self) {
        let was_speaking = {
            let mut shared = self.lock();
            let was_speaking = shared.state == PlaybackState::Speaking;
            if was_speaking {
                shared.seq += 1;
                shared.state = PlaybackState::Idle;
            }
            was_speaking
        };
        if was_speaking {
            self.engine.cancel();
            tracing::debug!("playback stopped");
            let _ = self.events.send(PlaybackEvent::Finished);
        }
    }

    /// Speak when idle, stop when speaking.
    pub fn toggle(&self, utterance: Utterance) {
        if self.is_speaking() {
            self.stop();
        } else {
            self.speak(utterance);
        }
    }

    /// Forced cancellation for a view that just became hidden.
    pub fn on_hidden(&self) {
        if self.is_speaking() {
            tracing::debug!("view hidden; cancelling playback");
        }
        self.stop();
    }

    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.lock().state == PlaybackState::Speaking
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        {
            let mut shared = self.lock();
            shared.seq += 1;
            shared.state = PlaybackState::Idle;
        }
        self.engine.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    use super::*;
    use crate::domain::VoiceCatalog;
    use crate::ports::{SpeakOutcome, SpeechEngineError};

    /// Engine whose utterances run until the test releases or cancels them.
    #[derive(Default)]
    struct ManualEngine {
        cancels: AtomicUsize,
        release: Notify,
        interrupt: Notify,
    }

    #[async_trait]
    impl SpeechEnginePort for ManualEngine {
        async fn voices(&self) -> Result<VoiceCatalog, SpeechEngineError> {
            Ok(VoiceCatalog::default())
        }

        async fn speak(&self, _utterance: &Utterance) -> Result<SpeakOutcome, SpeechEngineError> {
            tokio::select! {
                () = self.release.notified() => Ok(SpeakOutcome::Completed),
                () = self.interrupt.notified() => Ok(SpeakOutcome::Interrupted),
            }
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            self.interrupt.notify_waiters();
        }
    }

    /// Engine that completes every utterance immediately.
    struct InstantEngine;

    #[async_trait]
    impl SpeechEnginePort for InstantEngine {
        async fn voices(&self) -> Result<VoiceCatalog, SpeechEngineError> {
            Ok(VoiceCatalog::default())
        }

        async fn speak(&self, _utterance: &Utterance) -> Result<SpeakOutcome, SpeechEngineError> {
            Ok(SpeakOutcome::Completed)
        }

        fn cancel(&self) {}
    }

    /// Engine that fails every utterance.
    struct FailingEngine;

    #[async_trait]
    impl SpeechEnginePort for FailingEngine {
        async fn voices(&self) -> Result<VoiceCatalog, SpeechEngineError> {
            Ok(VoiceCatalog::default())
        }

        async fn speak(&self, _utterance: &Utterance) -> Result<SpeakOutcome, SpeechEngineError> {
            Err(SpeechEngineError::SynthesisFailed { message: "no phonemes".into() })
        }

        fn cancel(&self) {}
    }

    fn utterance() -> Utterance {
        Utterance { text: "hello".into(), voice_id: None, language_tag: "en-US".into() }
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<PlaybackEvent>) -> PlaybackEvent {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for playback event")
            .expect("event channel closed")
    }

    async fn assert_no_more_events(rx: &mut mpsc::UnboundedReceiver<PlaybackEvent>) {
        let outcome = timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(outcome.is_err(), "unexpected extra event: {outcome:?}");
    }

    #[test]
    fn initial_state_is_idle() {
        let (controller, _rx) = PlaybackController::new(Arc::new(InstantEngine));
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(!controller.is_speaking());
    }

    #[tokio::test]
    async fn natural_completion_returns_to_idle() {
        let (controller, mut rx) = PlaybackController::new(Arc::new(InstantEngine));
        controller.speak(utterance());

        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started);
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Finished);
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn speak_cancels_engine_even_when_idle() {
        let engine = Arc::new(ManualEngine::default());
        let (controller, mut rx) = PlaybackController::new(Arc::clone(&engine) as Arc<_>);

        controller.speak(utterance());
        assert_eq!(engine.cancels.load(Ordering::SeqCst), 1);
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started);
        assert!(controller.is_speaking());
    }

    #[tokio::test]
    async fn second_speak_supersedes_the_first() {
        let engine = Arc::new(ManualEngine::default());
        let (controller, mut rx) = PlaybackController::new(Arc::clone(&engine) as Arc<_>);

        controller.speak(utterance());
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started);
        // Let the first watcher reach the engine before superseding it.
        tokio::task::yield_now().await;

        controller.speak(utterance());
        assert_eq!(engine.cancels.load(Ordering::SeqCst), 2);
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started);
        assert!(controller.is_speaking());

        // The superseded utterance resolved as interrupted; that stale
        // completion must not emit anything or change state.
        assert!(controller.is_speaking());
        tokio::task::yield_now().await;
        engine.release.notify_waiters();
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Finished);
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_no_more_events(&mut rx).await;
    }

    #[tokio::test]
    async fn stop_cancels_and_is_idempotent() {
        let engine = Arc::new(ManualEngine::default());
        let (controller, mut rx) = PlaybackController::new(Arc::clone(&engine) as Arc<_>);

        controller.speak(utterance());
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started);
        tokio::task::yield_now().await;

        controller.stop();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(engine.cancels.load(Ordering::SeqCst), 2);
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Finished);

        // Second stop: no state change, no cancel, no event.
        controller.stop();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(engine.cancels.load(Ordering::SeqCst), 2);
        assert_no_more_events(&mut rx).await;
    }

    #[tokio::test]
    async fn hidden_view_forces_idle_without_late_events() {
        let engine = Arc::new(ManualEngine::default());
        let (controller, mut rx) = PlaybackController::new(Arc::clone(&engine) as Arc<_>);

        controller.speak(utterance());
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started);
        tokio::task::yield_now().await;

        controller.on_hidden();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Finished);

        // The interrupted utterance produces no further completion.
        assert_no_more_events(&mut rx).await;
    }

    #[tokio::test]
    async fn toggle_starts_then_stops() {
        let engine = Arc::new(ManualEngine::default());
        let (controller, mut rx) = PlaybackController::new(Arc::clone(&engine) as Arc<_>);

        controller.toggle(utterance());
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started);
        assert!(controller.is_speaking());
        tokio::task::yield_now().await;

        controller.toggle(utterance());
        assert!(!controller.is_speaking());
        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Finished);
    }

    #[tokio::test]
    async fn engine_failure_reports_and_returns_to_idle() {
        let (controller, mut rx) = PlaybackController::new(Arc::new(FailingEngine));
        controller.speak(utterance());

        assert_eq!(next_event(&mut rx).await, PlaybackEvent::Started);
        match next_event(&mut rx).await {
            PlaybackEvent::Failed { message } => assert!(message.contains("no phonemes")),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn drop_cancels_the_engine() {
        let engine = Arc::new(ManualEngine::default());
        {
            let (controller, _rx) = PlaybackController::new(Arc::clone(&engine) as Arc<_>);
            controller.speak(utterance());
            assert_eq!(engine.cancels.load(Ordering::SeqCst), 1);
        }
        assert_eq!(engine.cancels.load(Ordering::SeqCst), 2);
    }
}
