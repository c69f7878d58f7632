//! Response Sanitizer — turns model free text into plain, chat-safe prose.
//!
//! Implemented as an ordered list of pure text-to-text passes. Order matters:
//! math spans go before LaTeX commands, which go before the symbol strip.
//! Leftover `$$` runs are removed only after that, since emptying a kept
//! `$…$` span can create one. Currency normalization runs last on
//! whitespace-collapsed text.
//!
//! This is a heuristic. Ambiguous numbers may or may not get a `$`; that is
//! accepted behavior. What is guaranteed: no `$$`, no `\command`, none of
//! `+ = * / \ [ ] { } ^ _`, and running the sanitizer twice changes nothing.

use std::sync::OnceLock;

use regex::{Captures, Regex};

pub type SanitizePass = fn(&str) -> String;

/// All passes, in the order `sanitize` applies them.
pub const SANITIZE_PASSES: &[(&str, SanitizePass)] = &[
    ("display_math", strip_display_math),
    ("inline_math", strip_inline_math),
    ("latex_commands", strip_latex_commands),
    ("math_symbols", strip_math_symbols),
    ("dollar_runs", strip_dollar_runs),
    ("whitespace", collapse_whitespace),
    ("amount_after_spend_word", amount_after_spend_word),
    ("amount_before_dollars_word", amount_before_dollars_word),
    ("amount_after_preposition", amount_after_preposition),
    ("amount_before_spend_context", amount_before_spend_context),
];

pub fn sanitize(text: &str) -> String {
    SANITIZE_PASSES
        .iter()
        .fold(text.to_string(), |acc, (_, pass)| pass(&acc))
}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("sanitizer pattern must compile"))
}

/// True when the character right before `start` already marks an amount
/// (`$20`, `12.50`, `1200`), so no `$` should be inserted there.
fn continues_amount(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_some_and(|c| c == '$' || c == '.' || c.is_ascii_digit())
}

/// Pass 1: `$$ … $$` display math.
pub fn strip_display_math(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"\$\$[^$]*\$\$")
        .replace_all(text, "")
        .into_owned()
}

/// Pass 2: `$ … $` inline math.
///
/// A `$` directly before a digit is a currency sign, never a delimiter: the
/// opener must not be followed by a digit or whitespace, and a match whose
/// closing `$` precedes a digit is left alone.
pub fn strip_inline_math(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();

    compiled(&RE, r"\$[^$\d\s][^$]*\$")
        .replace_all(text, |caps: &Captures| {
            let whole = &caps[0];
            let end = caps.get(0).map_or(0, |m| m.end());
            let closes_before_amount = text[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit());
            if closes_before_amount {
                whole.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Pass 3: `\command{…}` first, then bare `\command`.
pub fn strip_latex_commands(text: &str) -> String {
    static WITH_ARG: OnceLock<Regex> = OnceLock::new();
    static BARE: OnceLock<Regex> = OnceLock::new();

    let without_args = compiled(&WITH_ARG, r"\\[a-zA-Z]+\{[^}]*\}").replace_all(text, "");
    compiled(&BARE, r"\\[a-zA-Z]+")
        .replace_all(&without_args, "")
        .into_owned()
}

/// Pass 4: arithmetic and bracket symbols.
pub fn strip_math_symbols(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"[+=*/\\\[\]{}^_]")
        .replace_all(text, "")
        .into_owned()
}

/// Pass 5: any run of two or more `$`, including one left behind when the
/// earlier passes emptied a kept `$…$` span (`$+$5` → `$$5`).
pub fn strip_dollar_runs(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"\${2,}").replace_all(text, "").into_owned()
}

/// Pass 6.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pass 7a: "spent 20" → "spent $20".
pub fn amount_after_spend_word(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(
        &RE,
        r"(?i)\b(spending|spent|costs|cost|total of|totaling|total)\s+(\d+(?:\.\d+)?)\b",
    )
    .replace_all(text, |caps: &Captures| format!("{} ${}", &caps[1], &caps[2]))
    .into_owned()
}

/// Pass 7b: "20 dollars" → "$20".
pub fn amount_before_dollars_word(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?i)\b(\d+(?:\.\d+)?)\s*dollars?\b")
        .replace_all(text, |caps: &Captures| {
            let start = caps.get(0).map_or(0, |m| m.start());
            if continues_amount(text, start) {
                caps[1].to_string()
            } else {
                format!("${}", &caps[1])
            }
        })
        .into_owned()
}

/// Pass 7c: "at 45" / "for 120" / "of 60" → `$`, unless a unit word follows
/// ("for 10 years", "of 15 percent").
pub fn amount_after_preposition(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    static UNIT: OnceLock<Regex> = OnceLock::new();

    let unit = compiled(
        &UNIT,
        r"(?i)^\s*(?:%|(?:years?|months?|days?|times?|percent|people|items?)\b)",
    );

    compiled(&RE, r"(?i)\b(at|for|of)\s+(\d{2,4}(?:\.\d+)?)\b")
        .replace_all(text, |caps: &Captures| {
            let end = caps.get(0).map_or(0, |m| m.end());
            if unit.is_match(&text[end..]) {
                caps[0].to_string()
            } else {
                format!("{} ${}", &caps[1], &caps[2])
            }
        })
        .into_owned()
}

/// Pass 7d: "45 on groceries" / "30 at Target" → `$` prefix.
pub fn amount_before_spend_context(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"\b(\d{2,4}(?:\.\d{2})?)\s+(on\s+[a-z]+|at\s+[A-Z])")
        .replace_all(text, |caps: &Captures| {
            let start = caps.get(0).map_or(0, |m| m.start());
            if continues_amount(text, start) {
                caps[0].to_string()
            } else {
                format!("${} {}", &caps[1], &caps[2])
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORBIDDEN: &[char] = &['+', '=', '*', '/', '\\', '[', ']', '{', '}', '^', '_'];

    const NASTY: &[&str] = &[
        "You spent $$20 + 15 = 35$$ on food this week.",
        "Your total is $x + y$ which is about 35 dollars.",
        r"Use \frac{20}{3} and \times to compute [a] {b} ^ _ / *",
        "$$ unclosed display math",
        "A lone $ sign and $$",
        "Costs: 12.50 dollars at Target, 45 on groceries, for 3 years.",
        "**Bold** advice: save 10 percent of 2000 each month",
        r"$\alpha$ then $5 then \beta",
        "You spent $20 and $30 at Starbucks for a total of $50.",
        "$+$5 saved",
        r"$\alpha$5 saved",
        "x $*$20",
        "",
    ];

    #[test]
    fn test_display_math_removed() {
        assert_eq!(strip_display_math("a $$x^2$$ b"), "a  b");
    }

    #[test]
    fn test_inline_math_removed_but_currency_kept() {
        assert_eq!(strip_inline_math("a $x+y$ b"), "a  b");
        assert_eq!(strip_inline_math("spent $20 and $30"), "spent $20 and $30");
    }

    #[test]
    fn test_inline_math_closing_before_amount_is_kept() {
        assert_eq!(strip_inline_math("about $x or $20"), "about $x or $20");
    }

    #[test]
    fn test_leftover_dollar_runs_removed() {
        assert_eq!(strip_dollar_runs("a $$ b"), "a  b");
        assert_eq!(strip_dollar_runs("$$$5 saved"), "5 saved");
        assert_eq!(strip_dollar_runs("$5 and $6"), "$5 and $6");
    }

    #[test]
    fn test_emptied_span_before_amount_leaves_no_dollar_run() {
        assert_eq!(sanitize("$+$5 saved"), "5 saved");
        assert_eq!(sanitize(r"$\alpha$5 saved"), "5 saved");
        assert_eq!(sanitize("x $*$20"), "x 20");
    }

    #[test]
    fn test_for_only_marks_two_to_four_digit_amounts() {
        assert_eq!(sanitize("lunch for 5"), "lunch for 5");
        assert_eq!(sanitize("a car for 12000"), "a car for 12000");
        assert_eq!(sanitize("lunch for 15"), "lunch for $15");
    }

    #[test]
    fn test_latex_commands_removed() {
        assert_eq!(strip_latex_commands(r"\textbf{bold} and \times x"), " and  x");
    }

    #[test]
    fn test_math_symbols_removed() {
        assert_eq!(strip_math_symbols("1 + 2 = 3 * [4] / {5} ^ _ \\"), "1  2  3  4  5   ");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
    }

    #[test]
    fn test_amount_after_spend_word() {
        assert_eq!(amount_after_spend_word("you spent 20 on food"), "you spent $20 on food");
        assert_eq!(amount_after_spend_word("a Total of 150"), "a Total of $150");
        assert_eq!(amount_after_spend_word("spent $20"), "spent $20");
        assert_eq!(amount_after_spend_word("spending 12.50"), "spending $12.50");
    }

    #[test]
    fn test_amount_before_dollars_word() {
        assert_eq!(amount_before_dollars_word("about 20 dollars"), "about $20");
        assert_eq!(amount_before_dollars_word("1 dollar"), "$1");
        assert_eq!(amount_before_dollars_word("$20 dollars"), "$20");
        assert_eq!(amount_before_dollars_word("12.50 dollars"), "$12.50");
    }

    #[test]
    fn test_amount_after_preposition_respects_units() {
        assert_eq!(amount_after_preposition("lunch at 15"), "lunch at $15");
        assert_eq!(amount_after_preposition("a bill of 120"), "a bill of $120");
        assert_eq!(amount_after_preposition("for 10 years"), "for 10 years");
        assert_eq!(amount_after_preposition("of 15 percent"), "of 15 percent");
        assert_eq!(amount_after_preposition("of 15%"), "of 15%");
        assert_eq!(amount_after_preposition("for 12345"), "for 12345");
    }

    #[test]
    fn test_amount_before_spend_context() {
        assert_eq!(amount_before_spend_context("45 on groceries"), "$45 on groceries");
        assert_eq!(amount_before_spend_context("30 at Target"), "$30 at Target");
        assert_eq!(amount_before_spend_context("$30 at Target"), "$30 at Target");
        assert_eq!(amount_before_spend_context("30 at home"), "30 at home");
    }

    #[test]
    fn test_full_pipeline_example() {
        let raw = "You spent 65 dollars at Starbucks!\n\nThat's $$5 \\times 13$$ visits, \\textbf{wow}.";
        assert_eq!(
            sanitize(raw),
            "You spent $65 at Starbucks! That's visits, ."
        );
    }

    #[test]
    fn test_output_never_contains_forbidden_markup() {
        for input in NASTY {
            let out = sanitize(input);
            assert!(!out.contains("$$"), "{input:?} -> {out:?}");
            assert!(!out.chars().any(|c| FORBIDDEN.contains(&c)), "{input:?} -> {out:?}");
            assert_eq!(out, out.trim());
            assert!(!out.contains("  "), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in NASTY {
            let once = sanitize(input);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "input: {input:?}");
        }
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Nice work keeping your coffee budget in check this week!";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_passes_are_listed_in_order() {
        let names: Vec<_> = SANITIZE_PASSES.iter().map(|(n, _)| *n).collect();
        assert_eq!(names.first(), Some(&"display_math"));
        assert_eq!(names.get(4), Some(&"dollar_runs"));
        assert_eq!(names.get(5), Some(&"whitespace"));
        assert_eq!(names.len(), 10);
    }
}
