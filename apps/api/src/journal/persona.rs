//! Persona Extractor — turns the model's three labeled lines into a
//! `PersonaEntry`.
//!
//! Never fails: a field whose line is missing (or blank) keeps its default,
//! so even an empty reply yields a complete, renderable entry.

use serde::Serialize;

use crate::sanitize::sanitize;
use crate::transactions::aggregate::WeekStats;

pub const PERSONA_NAME_PREFIX: &str = "PERSONA_NAME:";
pub const EMOJI_PREFIX: &str = "EMOJI:";
pub const STORY_PREFIX: &str = "STORY:";

pub const DEFAULT_PERSONA_NAME: &str = "Financial Explorer";
pub const DEFAULT_EMOJI: &str = "📊";
pub const DEFAULT_STORY: &str = "Had an interesting week with your finances!";

pub const HERMIT_PERSONA_NAME: &str = "Financial Hermit";
pub const HERMIT_EMOJI: &str = "🏠";
pub const HERMIT_STORY: &str = "No spending this week! You stayed in and kept your wallet \
    closed. Enjoy the savings and plan something fun for next week.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaEntry {
    pub persona_name: String,
    pub emoji: String,
    pub story: String,
    pub stats: WeekStats,
}

impl PersonaEntry {
    fn new(persona_name: &str, emoji: &str, story: impl Into<String>, stats: WeekStats) -> Self {
        Self {
            persona_name: persona_name.to_string(),
            emoji: emoji.to_string(),
            story: story.into(),
            stats,
        }
    }

    /// Starting values before any line is parsed.
    fn defaults(stats: WeekStats) -> Self {
        if stats.transaction_count == 0 {
            no_activity_persona(stats)
        } else {
            Self::new(DEFAULT_PERSONA_NAME, DEFAULT_EMOJI, DEFAULT_STORY, stats)
        }
    }
}

/// Parses `PERSONA_NAME:` / `EMOJI:` / `STORY:` lines in any order.
///
/// Prefixes are case-sensitive; leading indentation is ignored. Name and story
/// go through the sanitizer, the emoji is kept verbatim. A repeated field
/// takes its last value.
pub fn extract_persona(raw: &str, stats: WeekStats) -> PersonaEntry {
    let mut entry = PersonaEntry::defaults(stats);

    for line in raw.lines().map(str::trim_start) {
        if let Some(value) = line.strip_prefix(PERSONA_NAME_PREFIX) {
            set_if_present(&mut entry.persona_name, sanitize(value));
        } else if let Some(value) = line.strip_prefix(EMOJI_PREFIX) {
            set_if_present(&mut entry.emoji, value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(STORY_PREFIX) {
            set_if_present(&mut entry.story, sanitize(value));
        }
    }

    entry
}

fn set_if_present(field: &mut String, value: String) {
    if !value.is_empty() {
        *field = value;
    }
}

/// Deterministic entry used when the completion call fails.
pub fn fallback_persona(stats: WeekStats) -> PersonaEntry {
    let story = format!(
        "This week you spent ${} across {} transactions. Keep up the tracking!",
        stats.total.round_dp(0),
        stats.transaction_count
    );
    PersonaEntry::new(DEFAULT_PERSONA_NAME, DEFAULT_EMOJI, story, stats)
}

pub fn no_activity_persona(stats: WeekStats) -> PersonaEntry {
    PersonaEntry::new(HERMIT_PERSONA_NAME, HERMIT_EMOJI, HERMIT_STORY, stats)
}
