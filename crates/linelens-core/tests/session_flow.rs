//! Integration tests for the `ExplainerSession` workflow.
//!
//! These tests drive the session end to end using mock generation, speech,
//! and clipboard backends. No network access or audio hardware is required
//! — the mocks return canned responses and settle instantly.
//!
//! # What is tested
//!
//! - Tamil narrative flow: classify, render, extract, resolve, dispatch
//! - A failed request leaves the previous explanation visible
//! - Hiding the view cancels playback with no late-event corruption
//! - Rapid restarts never hand the engine two live utterances
//! - Overlapping requests: the newest issued request wins
//! - Canonical markup tree shape and raw-text clipboard copy

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use linelens_core::{
    ClipboardError, ClipboardPort, ContentKind, ExplainerSession, GenerationError, GenerationPort,
    LanguageId, Message, NoticeKind, SpeakOutcome, SpeechEngineError, SpeechEnginePort, Utterance,
    VoiceCatalog, VoiceInfo, readable_text,
};
use tokio::sync::Notify;
use tokio::time::timeout;

// ── Mock backends ──────────────────────────────────────────────────

/// Generation backend returning scripted responses in order.
struct ScriptedGeneration {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
}

impl ScriptedGeneration {
    fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self { responses: Mutex::new(responses.into()) }
    }
}

#[async_trait]
impl GenerationPort for ScriptedGeneration {
    async fn generate(
        &self,
        _message: &str,
        _history: &[Message],
    ) -> Result<String, GenerationError> {
        self.responses.lock().unwrap().pop_front().expect("script exhausted")
    }
}

/// Generation backend with one gate per call, so tests control which
/// response lands first.
struct GatedGeneration {
    calls: AtomicUsize,
    gates: Vec<(Arc<Notify>, Arc<Notify>, String)>,
}

impl GatedGeneration {
    fn new(answers: &[&str]) -> Self {
        let gates = answers
            .iter()
            .map(|a| (Arc::new(Notify::new()), Arc::new(Notify::new()), (*a).to_owned()))
            .collect();
        Self { calls: AtomicUsize::new(0), gates }
    }

    /// (started, release) notifies for the nth call.
    fn gate(&self, n: usize) -> (Arc<Notify>, Arc<Notify>) {
        (Arc::clone(&self.gates[n].0), Arc::clone(&self.gates[n].1))
    }
}

#[async_trait]
impl GenerationPort for GatedGeneration {
    async fn generate(
        &self,
        _message: &str,
        _history: &[Message],
    ) -> Result<String, GenerationError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let (started, release, answer) = &self.gates[n];
        started.notify_one();
        release.notified().await;
        Ok(answer.clone())
    }
}

#[derive(Default)]
struct ProbeCounters {
    live: usize,
    overlap: bool,
    speaks: usize,
    cancels: usize,
}

/// Speech engine that records utterances and flags any overlap: a second
/// `speak` arriving while a previous one is neither finished nor
/// cancelled trips the `overlap` flag.
struct ProbeEngine {
    voices: Vec<VoiceInfo>,
    counters: Mutex<ProbeCounters>,
    utterances: Mutex<Vec<Utterance>>,
    interrupt: Notify,
    finish: Notify,
}

impl ProbeEngine {
    fn new(voices: Vec<(&str, &str)>) -> Self {
        let voices = voices
            .into_iter()
            .map(|(id, tag)| VoiceInfo {
                id: id.to_owned(),
                name: id.to_owned(),
                language_tag: tag.to_owned(),
            })
            .collect();
        Self {
            voices,
            counters: Mutex::new(ProbeCounters::default()),
            utterances: Mutex::new(Vec::new()),
            interrupt: Notify::new(),
            finish: Notify::new(),
        }
    }

    fn counters(&self) -> (usize, usize, bool) {
        let c = self.counters.lock().unwrap();
        (c.speaks, c.cancels, c.overlap)
    }
}

#[async_trait]
impl SpeechEnginePort for ProbeEngine {
    async fn voices(&self) -> Result<VoiceCatalog, SpeechEngineError> {
        Ok(VoiceCatalog::new(self.voices.clone()))
    }

    async fn speak(&self, utterance: &Utterance) -> Result<SpeakOutcome, SpeechEngineError> {
        {
            let mut c = self.counters.lock().unwrap();
            if c.live > 0 {
                c.overlap = true;
            }
            c.live += 1;
            c.speaks += 1;
        }
        self.utterances.lock().unwrap().push(utterance.clone());

        let outcome = tokio::select! {
            () = self.finish.notified() => SpeakOutcome::Completed,
            () = self.interrupt.notified() => SpeakOutcome::Interrupted,
        };
        let mut c = self.counters.lock().unwrap();
        c.live = c.live.saturating_sub(1);
        Ok(outcome)
    }

    fn cancel(&self) {
        let mut c = self.counters.lock().unwrap();
        c.cancels += 1;
        // From the engine's view nothing is live past this point.
        c.live = 0;
        drop(c);
        self.interrupt.notify_waiters();
    }
}

/// Clipboard that records every copy.
#[derive(Default)]
struct RecordingClipboard {
    copies: Mutex<Vec<String>>,
}

#[async_trait]
impl ClipboardPort for RecordingClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.copies.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Poll until the session stops speaking or the deadline passes.
async fn wait_until_idle(session: &ExplainerSession) {
    let wait = async {
        while session.is_speaking() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    timeout(Duration::from_secs(1), wait).await.expect("playback never settled");
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn tamil_narrative_flows_from_request_to_utterance() {
    let narrative = "வணக்கம்! இந்த код ஒரு எண்ணை இரட்டிப்பாக்குகிறது.";
    let generation = Arc::new(ScriptedGeneration::new(vec![Ok(narrative.to_owned())]));
    let engine = Arc::new(ProbeEngine::new(vec![("ta-voice", "ta-IN"), ("en-voice", "en-US")]));

    let session = ExplainerSession::builder(generation)
        .with_speech(Arc::clone(&engine) as Arc<_>)
        .with_language(LanguageId::Tamil)
        .build();
    session.refresh_voices().await;

    session.request_explanation("fn double(x: i32) -> i32 { x * 2 }").await;

    let explanation = session.explanation().expect("explanation stored");
    assert_eq!(explanation.kind, ContentKind::Narrative, "no leading tag means narrative");
    let extracted = readable_text(&explanation.tree);
    assert_eq!(extracted, narrative, "plain narrative extracts unchanged");

    session.speak();
    assert!(session.is_speaking());
    tokio::task::yield_now().await;

    {
        let utterances = engine.utterances.lock().unwrap();
        assert_eq!(utterances.len(), 1, "exactly one utterance dispatched");
        assert_eq!(utterances[0].text, extracted);
        assert_eq!(utterances[0].voice_id.as_deref(), Some("ta-voice"));
        assert_eq!(utterances[0].language_tag, "ta-IN");
    }

    engine.finish.notify_waiters();
    wait_until_idle(&session).await;
    assert!(session.notice().is_none(), "clean run leaves no notice");
}

#[tokio::test]
async fn server_error_leaves_previous_explanation_visible() {
    let generation = Arc::new(ScriptedGeneration::new(vec![
        Ok("<p>the loop counts down</p>".to_owned()),
        Err(GenerationError::RequestFailed { status: Some(500), message: "internal".into() }),
    ]));
    let engine = Arc::new(ProbeEngine::new(vec![("en-voice", "en-US")]));
    let session = ExplainerSession::builder(generation)
        .with_speech(Arc::clone(&engine) as Arc<_>)
        .build();
    session.refresh_voices().await;

    session.request_explanation("while n > 0 {}").await;
    session.request_explanation("retry me").await;

    let explanation = session.explanation().expect("old result persists");
    assert_eq!(explanation.text, "<p>the loop counts down</p>");
    let notice = session.notice().expect("failure notice recorded");
    assert_eq!(notice.kind, NoticeKind::RequestFailed);
    assert_eq!(notice.message, "Oops! An error occurred. Please try again.");

    // The surviving result is still speakable.
    session.speak();
    assert!(session.is_speaking());
    session.stop_speaking();
    assert!(!session.is_speaking());
}

#[tokio::test]
async fn hiding_the_view_cancels_playback() {
    let generation =
        Arc::new(ScriptedGeneration::new(vec![Ok("reads the file line by line".to_owned())]));
    let engine = Arc::new(ProbeEngine::new(vec![("en-voice", "en-US")]));
    let session = ExplainerSession::builder(generation)
        .with_speech(Arc::clone(&engine) as Arc<_>)
        .build();
    session.refresh_voices().await;

    session.request_explanation("read_lines()").await;
    session.speak();
    assert!(session.is_speaking());
    tokio::task::yield_now().await;

    let (_, cancels_before, _) = engine.counters();
    session.on_hidden();
    assert!(!session.is_speaking());
    let (_, cancels_after, _) = engine.counters();
    assert!(cancels_after > cancels_before, "hide must cancel the engine");

    // A late engine settle must not resurrect the speaking state.
    engine.finish.notify_waiters();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!session.is_speaking());
    assert!(session.notice().is_none());
}

#[tokio::test]
async fn rapid_restarts_never_overlap_utterances() {
    let generation = Arc::new(ScriptedGeneration::new(vec![Ok("short answer".to_owned())]));
    let engine = Arc::new(ProbeEngine::new(vec![("en-voice", "en-US")]));
    let session = ExplainerSession::builder(generation)
        .with_speech(Arc::clone(&engine) as Arc<_>)
        .build();
    session.refresh_voices().await;
    session.request_explanation("code").await;

    for _ in 0..5 {
        session.speak();
        tokio::task::yield_now().await;
    }
    session.stop_speaking();
    tokio::task::yield_now().await;

    let (speaks, cancels, overlap) = engine.counters();
    assert_eq!(speaks, 5);
    assert!(cancels >= 5, "every speak is preceded by a cancel, got {cancels}");
    assert!(!overlap, "two utterances were live in the engine at once");
    assert!(!session.is_speaking());
}

#[tokio::test]
async fn newest_request_wins_the_race() {
    let generation = Arc::new(GatedGeneration::new(&["first answer", "second answer"]));
    let session =
        Arc::new(ExplainerSession::builder(Arc::clone(&generation) as Arc<_>).build());

    let (started_a, release_a) = generation.gate(0);
    let (started_b, release_b) = generation.gate(1);

    let task_a = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.request_explanation("old input").await })
    };
    timeout(Duration::from_secs(1), started_a.notified()).await.expect("first call started");

    let task_b = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.request_explanation("new input").await })
    };
    timeout(Duration::from_secs(1), started_b.notified()).await.expect("second call started");

    // The newer request resolves first and owns the session.
    release_b.notify_one();
    task_b.await.expect("second request task");
    assert_eq!(session.explanation().unwrap().text, "second answer");
    assert!(!session.in_flight());

    // The older response arrives late and is discarded.
    release_a.notify_one();
    task_a.await.expect("first request task");
    assert_eq!(session.explanation().unwrap().text, "second answer");
    assert!(!session.in_flight());

    // Only the winning exchange entered the transcript.
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert!(transcript[0].text.contains("new input"));
    assert_eq!(transcript[1].text, "second answer");
}

#[tokio::test]
async fn markup_result_renders_extracts_and_copies() {
    let generation =
        Arc::new(ScriptedGeneration::new(vec![Ok("<p>Hello <b>world</b></p>".to_owned())]));
    let clipboard = Arc::new(RecordingClipboard::default());
    let session = ExplainerSession::builder(generation)
        .with_clipboard(Arc::clone(&clipboard) as Arc<_>)
        .build();

    session.request_explanation("print(\"hi\")").await;

    let explanation = session.explanation().expect("explanation stored");
    assert_eq!(explanation.kind, ContentKind::Markup);

    let p = explanation.tree.as_element().expect("root element");
    assert_eq!(p.tag, "p");
    assert_eq!(p.children.len(), 2);
    assert_eq!(p.children[0].as_text(), Some("Hello "));
    let b = p.children[1].as_element().expect("nested element");
    assert_eq!(b.tag, "b");
    assert_eq!(b.children[0].as_text(), Some("world"));

    assert_eq!(readable_text(&explanation.tree), "Hello world");

    session.copy_explanation().await;
    assert_eq!(clipboard.copies.lock().unwrap().as_slice(), ["<p>Hello <b>world</b></p>"]);
    assert!(session.notice().is_none());
}
