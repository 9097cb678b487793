//! Explanation languages and their speech profiles.
//!
//! The set of languages is fixed and known at startup. Each language
//! carries the voice tags used to pick an installed speech voice: an
//! exact BCP 47 tag tried first, then a bare language prefix.

use serde::{Deserialize, Serialize};

/// A language the explanation can be written and spoken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    English,
    Tamil,
    Hindi,
    Telugu,
}

impl LanguageId {
    /// Parse a language from its identifier string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "english" => Some(Self::English),
            "tamil" => Some(Self::Tamil),
            "hindi" => Some(Self::Hindi),
            "telugu" => Some(Self::Telugu),
            _ => None,
        }
    }

    /// Convert language to its identifier string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Tamil => "tamil",
            Self::Hindi => "hindi",
            Self::Telugu => "telugu",
        }
    }

    /// The speech profile for this language.
    #[must_use]
    pub const fn profile(&self) -> &'static LanguageProfile {
        match self {
            Self::English => &PROFILES[0],
            Self::Tamil => &PROFILES[1],
            Self::Hindi => &PROFILES[2],
            Self::Telugu => &PROFILES[3],
        }
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display metadata and voice tags for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProfile {
    pub id: LanguageId,
    /// Name shown in a language picker, in the language's own script.
    pub display_name: &'static str,
    /// BCP 47 tag tried first when resolving a voice (exact match).
    pub primary_voice_tag: &'static str,
    /// Bare language code tried second (prefix match).
    pub fallback_voice_tag: &'static str,
}

impl LanguageProfile {
    /// All supported languages in picker order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &PROFILES
    }
}

const PROFILES: [LanguageProfile; 4] = [
    LanguageProfile {
        id: LanguageId::English,
        display_name: "English",
        primary_voice_tag: "en-US",
        fallback_voice_tag: "en",
    },
    LanguageProfile {
        id: LanguageId::Tamil,
        display_name: "தமிழ்",
        primary_voice_tag: "ta-IN",
        fallback_voice_tag: "ta",
    },
    LanguageProfile {
        id: LanguageId::Hindi,
        display_name: "हिन्दी",
        primary_voice_tag: "hi-IN",
        fallback_voice_tag: "hi",
    },
    LanguageProfile {
        id: LanguageId::Telugu,
        display_name: "తెలుగు",
        primary_voice_tag: "te-IN",
        fallback_voice_tag: "te",
    },
];
