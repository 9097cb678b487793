//! Speech engine adapter over the `espeak-ng` command-line synthesizer.
//!
//! An utterance runs as a two-phase child-process pipeline: synthesize the
//! text to a WAV file in the system temp directory, then hand the file to
//! an audio player (`aplay` and friends). Hosts without a player fall back
//! to espeak's own audio output in a single phase.
//!
//! Cancellation works on both phases. [`EspeakEngine::cancel`] notifies the
//! slot registered by the running [`speak`](SpeechEnginePort::speak) call,
//! which kills whichever child is live and resolves the utterance as
//! [`SpeakOutcome::Interrupted`]. The notify permit is sticky, so a cancel
//! that lands between process spawns still wins.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use linelens_core::{
    SpeakOutcome, SpeechEngineError, SpeechEnginePort, Utterance, VoiceCatalog, VoiceInfo,
};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::Notify;
use tracing::{debug, warn};

/// Engine binaries in order of preference.
const ENGINE_BINARIES: &[&str] = &["espeak-ng", "espeak"];

/// Audio players in order of preference.
const PLAYER_BINARIES: &[&str] = &["aplay", "paplay", "play", "afplay"];

const DEFAULT_WORDS_PER_MINUTE: u16 = 160;
const DEFAULT_AMPLITUDE: u16 = 100;

// espeak rejects rates outside this range.
const MIN_WORDS_PER_MINUTE: u16 = 80;
const MAX_WORDS_PER_MINUTE: u16 = 450;
const MAX_AMPLITUDE: u16 = 200;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for [`EspeakEngine`].
#[derive(Debug, Clone)]
pub struct EspeakConfig {
    binary: Option<PathBuf>,
    player: Option<PathBuf>,
    words_per_minute: u16,
    amplitude: u16,
}

impl Default for EspeakConfig {
    fn default() -> Self {
        Self {
            binary: None,
            player: None,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

impl EspeakConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific synthesizer binary instead of scanning `PATH`.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    /// Use a specific audio player instead of scanning `PATH`.
    #[must_use]
    pub fn with_player(mut self, player: impl Into<PathBuf>) -> Self {
        self.player = Some(player.into());
        self
    }

    /// Speaking rate in words per minute (clamped to espeak's 80..=450).
    #[must_use]
    pub const fn with_words_per_minute(mut self, words_per_minute: u16) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    /// Output amplitude, 0..=200 where 100 is normal volume.
    #[must_use]
    pub const fn with_amplitude(mut self, amplitude: u16) -> Self {
        self.amplitude = amplitude;
        self
    }
}

// ============================================================================
// Engine
// ============================================================================

/// [`SpeechEnginePort`] implementation backed by `espeak-ng`.
#[derive(Debug)]
pub struct EspeakEngine {
    binary: PathBuf,
    player: Option<PathBuf>,
    words_per_minute: u16,
    amplitude: u16,

    /// Monotonic counter so concurrent utterances never share a WAV path.
    wav_counter: AtomicU64,

    /// Cancel slot for the utterance currently running, if any.
    active: Mutex<Option<Arc<Notify>>>,
}

impl EspeakEngine {
    /// Detects espeak on `PATH` with default settings.
    ///
    /// Returns `None` when no synthesizer binary is installed; the
    /// embedding app then runs without speech.
    #[must_use]
    pub fn detect() -> Option<Self> {
        Self::with_config(EspeakConfig::default())
    }

    /// Builds the engine from explicit configuration, still returning
    /// `None` when no synthesizer binary can be found.
    #[must_use]
    pub fn with_config(config: EspeakConfig) -> Option<Self> {
        let binary = config
            .binary
            .or_else(|| crate::which::find_in_path(ENGINE_BINARIES))?;
        let player = config
            .player
            .or_else(|| crate::which::find_in_path(PLAYER_BINARIES));

        debug!(binary = %binary.display(), player = ?player, "espeak engine detected");

        Some(Self {
            binary,
            player,
            words_per_minute: config
                .words_per_minute
                .clamp(MIN_WORDS_PER_MINUTE, MAX_WORDS_PER_MINUTE),
            amplitude: config.amplitude.min(MAX_AMPLITUDE),
            wav_counter: AtomicU64::new(0),
            active: Mutex::new(None),
        })
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<Arc<Notify>>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn synth_command(&self, voice: &str) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-v")
            .arg(voice)
            .arg("-s")
            .arg(self.words_per_minute.to_string())
            .arg("-a")
            .arg(self.amplitude.to_string());
        command
    }

    fn wav_path(&self) -> PathBuf {
        let serial = self.wav_counter.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("linelens-{}-{serial}.wav", std::process::id()))
    }

    async fn run_utterance(
        &self,
        utterance: &Utterance,
        cancel: &Notify,
    ) -> Result<SpeakOutcome, SpeechEngineError> {
        let voice = utterance
            .voice_id
            .as_deref()
            .unwrap_or(&utterance.language_tag);

        let Some(player) = self.player.clone() else {
            // No player installed: espeak drives the audio device itself.
            let mut direct = self.synth_command(voice);
            direct.arg(&utterance.text);
            return run_cancellable(direct, cancel, Phase::Synthesis).await;
        };

        let wav = self.wav_path();
        let mut synth = self.synth_command(voice);
        synth.arg("-w").arg(&wav).arg(&utterance.text);
        match run_cancellable(synth, cancel, Phase::Synthesis).await {
            Ok(SpeakOutcome::Completed) => {}
            interrupted_or_failed => {
                let _ = std::fs::remove_file(&wav);
                return interrupted_or_failed;
            }
        }

        let mut play = Command::new(player);
        play.arg(&wav);
        let outcome = run_cancellable(play, cancel, Phase::Playback).await;
        let _ = std::fs::remove_file(&wav);
        outcome
    }
}

#[async_trait]
impl SpeechEnginePort for EspeakEngine {
    async fn voices(&self) -> Result<VoiceCatalog, SpeechEngineError> {
        let output = Command::new(&self.binary)
            .arg("--voices")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|error| SpeechEngineError::EngineUnavailable {
                message: format!("failed to run {}: {error}", self.binary.display()),
            })?;

        if !output.status.success() {
            return Err(SpeechEngineError::EngineUnavailable {
                message: format!(
                    "{} --voices exited with {}",
                    self.binary.display(),
                    output.status
                ),
            });
        }

        let voices = parse_voice_table(&String::from_utf8_lossy(&output.stdout));
        debug!(count = voices.len(), "listed espeak voices");
        Ok(VoiceCatalog::new(voices))
    }

    async fn speak(&self, utterance: &Utterance) -> Result<SpeakOutcome, SpeechEngineError> {
        let cancel = Arc::new(Notify::new());
        if let Some(previous) = self.lock_active().replace(Arc::clone(&cancel)) {
            // A racing speak also cuts off the previous utterance.
            previous.notify_one();
        }

        debug!(
            chars = utterance.text.len(),
            voice = utterance.voice_id.as_deref(),
            language = %utterance.language_tag,
            "speaking utterance"
        );
        let result = self.run_utterance(utterance, &cancel).await;

        // Clear only our own registration; a newer speak owns the slot now.
        let mut slot = self.lock_active();
        if slot
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &cancel))
        {
            *slot = None;
        }
        drop(slot);

        result
    }

    fn cancel(&self) {
        if let Some(active) = self.lock_active().take() {
            active.notify_one();
        }
    }
}

// ============================================================================
// Child process plumbing
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Phase {
    Synthesis,
    Playback,
}

impl Phase {
    fn error(self, message: String) -> SpeechEngineError {
        match self {
            Self::Synthesis => SpeechEngineError::SynthesisFailed { message },
            Self::Playback => SpeechEngineError::PlaybackFailed { message },
        }
    }
}

/// Runs one child process to completion, racing it against `cancel`.
async fn run_cancellable(
    mut command: Command,
    cancel: &Notify,
    phase: Phase,
) -> Result<SpeakOutcome, SpeechEngineError> {
    let program = command.as_std().get_program().to_string_lossy().to_string();
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|error| phase.error(format!("failed to start {program}: {error}")))?;

    let status = tokio::select! {
        status = child.wait() => status
            .map_err(|error| phase.error(format!("failed to wait for {program}: {error}")))?,
        () = cancel.notified() => {
            if let Err(error) = child.kill().await {
                warn!(%error, program, "failed to kill speech child");
            }
            return Ok(SpeakOutcome::Interrupted);
        }
    };

    if status.success() {
        return Ok(SpeakOutcome::Completed);
    }

    // espeak and the players only emit a line or two of diagnostics, so the
    // pipe buffer holds everything and reading after exit cannot stall.
    let detail = read_stderr(&mut child).await;
    let message = if detail.is_empty() {
        format!("{program} exited with {status}")
    } else {
        format!("{program}: {detail}")
    };
    warn!(program, %status, "speech child failed");
    Err(phase.error(message))
}

async fn read_stderr(child: &mut Child) -> String {
    let Some(mut stderr) = child.stderr.take() else {
        return String::new();
    };
    let mut text = String::new();
    let _ = stderr.read_to_string(&mut text).await;
    text.trim().to_string()
}

// ============================================================================
// Voice table parsing
// ============================================================================

/// Parses `espeak-ng --voices` output.
///
/// Data rows look like:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  ta              --/M      Tamil              dra/ta
///  2  en-us           --/M      English (America)  gmw/en-US            (en 3)
/// ```
///
/// The display name may contain spaces, so the file column is recovered as
/// the last slash-bearing token. Rows that do not fit the shape (including
/// the header) are skipped.
fn parse_voice_table(table: &str) -> Vec<VoiceInfo> {
    let mut voices = Vec::new();
    for line in table.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 5 || tokens[0].parse::<u32>().is_err() {
            continue;
        }
        let language_tag = tokens[1];
        let Some(file_index) = tokens[3..].iter().rposition(|token| token.contains('/')) else {
            continue;
        };
        let file_index = file_index + 3;
        let name = tokens[3..file_index].join(" ");
        if name.is_empty() {
            continue;
        }
        voices.push(VoiceInfo {
            id: tokens[file_index].to_string(),
            name,
            language_tag: language_tag.to_string(),
        });
    }
    voices
}
