// Shared prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Plain-text output rules. The sanitizer cleans up whatever slips through,
/// but asking first keeps replies readable.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    CRITICAL: Use only plain text. NO LaTeX, NO math symbols, NO equations, NO code fences. \
    Never use +, =, *, / or brackets to show calculations; state the final amounts only. \
    ALWAYS write money with a dollar sign, like \"$65\" or \"$12.50\", never as a bare number.";

/// Grounding rule for any prompt that embeds transaction data.
pub const DATA_GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every number you mention must come from the data above. \
    Do NOT invent, estimate, or extrapolate amounts, dates, merchants, or categories. \
    If the data does not answer the question, say so politely.";

/// Fills `{name}` placeholders in one scan over `template`.
///
/// Inserted values are never rescanned, so data containing `{...}` text comes
/// through verbatim. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern must compile"));

    re.replace_all(template, |caps: &Captures| {
        values
            .iter()
            .find(|(name, _)| *name == &caps[1])
            .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
    })
    .into_owned()
}
