// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Reasoning trace extraction.
//!
//! Agents may embed their reasoning in a textual result between
//! [`TRACE_START`] and [`TRACE_END`]. The extractor separates that side
//! channel from the user-facing answer. Only the first marker pair is
//! honored; later pairs stay in the main text verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening marker of an embedded reasoning trace.
pub const TRACE_START: &str = "===REASONING_TRACE_START===";

/// Closing marker of an embedded reasoning trace.
pub const TRACE_END: &str = "===REASONING_TRACE_END===";

static TRACE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?s){}(.*?){}",
        regex::escape(TRACE_START),
        regex::escape(TRACE_END)
    ))
    .expect("reasoning trace pattern is valid")
});

/// Split `text` into its main output and optional reasoning.
///
/// Without a marker pair the trimmed text is returned with no reasoning.
/// With one, the reasoning is the trimmed text between the markers and the
/// main output is the trimmed concatenation of what surrounds them.
pub fn extract(text: &str) -> (String, Option<String>) {
    let Some(captures) = TRACE_PATTERN.captures(text) else {
        return (text.trim().to_string(), None);
    };

    // Group 0 always exists on a successful match.
    let whole = captures.get(0).expect("group 0");
    let reasoning = captures
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let mut main = String::with_capacity(text.len() - whole.len());
    main.push_str(&text[..whole.start()]);
    main.push_str(&text[whole.end()..]);

    (main.trim().to_string(), Some(reasoning))
}

/// An output that carries its reasoning explicitly instead of through markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Reasoned<T> {
    pub value: T,
    pub reasoning: Option<String>,
}

impl<T> Reasoned<T> {
    pub fn new(value: T, reasoning: impl Into<String>) -> Self {
        Self {
            value,
            reasoning: Some(reasoning.into()),
        }
    }

    /// An output with no reasoning attached.
    pub fn plain(value: T) -> Self {
        Self {
            value,
            reasoning: None,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wrap(reasoning: &str) -> String {
        format!("{}{}{}", TRACE_START, reasoning, TRACE_END)
    }

    #[test]
    fn test_no_markers_trims() {
        let (main, reasoning) = extract("  plain answer \n");
        assert_eq!(main, "plain answer");
        assert!(reasoning.is_none());
    }

    #[test]
    fn test_trailing_trace() {
        let (main, reasoning) = extract(&format!("ANSWER{}", wrap("R")));
        assert_eq!(main, "ANSWER");
        assert_eq!(reasoning.as_deref(), Some("R"));
    }

    #[test]
    fn test_leading_trace_and_multiline() {
        let text = format!("{}\n step one\n step two\n{}\n\nThe answer is 42.", TRACE_START, TRACE_END);
        let (main, reasoning) = extract(&text);
        assert_eq!(main, "The answer is 42.");
        assert_eq!(reasoning.as_deref(), Some("step one\n step two"));
    }

    #[test]
    fn test_surrounding_text_is_concatenated() {
        let (main, reasoning) = extract(&format!("before {} after", wrap(" why ")));
        assert_eq!(main, "before  after");
        assert_eq!(reasoning.as_deref(), Some("why"));
    }

    #[test]
    fn test_only_first_pair_is_honored() {
        let text = format!("A{}B{}C", wrap("one"), wrap("two"));
        let (main, reasoning) = extract(&text);
        assert_eq!(reasoning.as_deref(), Some("one"));
        assert_eq!(main, format!("AB{}C", wrap("two")));
    }

    #[test]
    fn test_unterminated_marker_is_not_a_match() {
        let text = format!("answer {} dangling", TRACE_START);
        let (main, reasoning) = extract(&text);
        assert_eq!(main, text.trim());
        assert!(reasoning.is_none());
    }

    #[test]
    fn test_empty_reasoning() {
        let (main, reasoning) = extract(&format!("x{}", wrap("   ")));
        assert_eq!(main, "x");
        assert_eq!(reasoning.as_deref(), Some(""));
    }

    #[test]
    fn test_reasoned_constructors() {
        let r = Reasoned::new(3, "because");
        assert_eq!(r.reasoning.as_deref(), Some("because"));
        assert_eq!(Reasoned::plain("v").into_value(), "v");
    }

    proptest! {
        #[test]
        fn prop_main_text_is_a_fixed_point(
            before in "[a-zA-Z0-9 \n]{0,40}",
            reasoning in "[a-zA-Z0-9 \n]{0,40}",
            after in "[a-zA-Z0-9 \n]{0,40}",
        ) {
            let text = format!("{}{}{}", before, wrap(&reasoning), after);
            let (main, _) = extract(&text);
            let (again, none) = extract(&main);
            prop_assert_eq!(again, main);
            prop_assert!(none.is_none());
        }
    }
}
