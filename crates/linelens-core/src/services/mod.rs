//! Stateful services - the orchestration layer over ports and rendering.
//!
//! Services own session state and drive the ports; they never know which
//! concrete adapter sits behind a trait object. Rendering stays pure and
//! lives in [`crate::render`]; everything with a lifecycle lives here.

mod playback;
mod session;
mod voices;

pub use playback::{PlaybackController, PlaybackEvent, PlaybackState};
pub use session::{
    ExplainerSession, ExplainerSessionBuilder, Notice, NoticeKind, PROMPT_TEMPLATE, build_prompt,
};
pub use voices::{VoiceMatch, VoiceRegistry, resolve_voice};
