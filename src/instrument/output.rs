// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! How wrapped call results are summarized.

use std::fmt::Debug;

use serde_json::Value;

use crate::reasoning::{self, Reasoned};

/// Maximum characters of a result kept in `result_summary`.
pub const MAX_SUMMARY_CHARS: usize = 100;

/// Last path segment of a type name, without generic arguments.
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Truncate a summary to [`MAX_SUMMARY_CHARS`] characters plus `...`.
pub fn truncate_summary(summary: String) -> String {
    match summary.char_indices().nth(MAX_SUMMARY_CHARS) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary,
    }
}

/// A value returned by a wrapped operation.
pub trait MethodOutput: Sized {
    /// Recorded as `result_type`.
    fn type_tag(&self) -> String {
        short_type_name::<Self>()
    }

    /// String form recorded (truncated) as `result_summary`.
    fn summary(&self) -> String;

    /// Separate an embedded reasoning trace from the value.
    ///
    /// Returns the value to hand back to the caller and the reasoning, if a
    /// non-empty one was found. Without reasoning the value must be returned
    /// untouched.
    fn split_reasoning(self) -> (Self, Option<String>) {
        (self, None)
    }
}

impl MethodOutput for String {
    fn summary(&self) -> String {
        self.clone()
    }

    fn split_reasoning(self) -> (Self, Option<String>) {
        match reasoning::extract(&self) {
            (main, Some(trace)) if !trace.is_empty() => (main, Some(trace)),
            _ => (self, None),
        }
    }
}

impl MethodOutput for () {
    fn type_tag(&self) -> String {
        "()".to_string()
    }

    fn summary(&self) -> String {
        "()".to_string()
    }
}

macro_rules! display_output {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MethodOutput for $ty {
                fn summary(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_output!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: Debug> MethodOutput for Vec<T> {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

impl<T: MethodOutput> MethodOutput for Option<T> {
    fn type_tag(&self) -> String {
        match self {
            Some(value) => value.type_tag(),
            None => "None".to_string(),
        }
    }

    fn summary(&self) -> String {
        match self {
            Some(value) => value.summary(),
            None => "None".to_string(),
        }
    }

    fn split_reasoning(self) -> (Self, Option<String>) {
        match self {
            Some(value) => {
                let (value, trace) = value.split_reasoning();
                (Some(value), trace)
            }
            None => (None, None),
        }
    }
}

impl MethodOutput for Value {
    fn summary(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl<T: MethodOutput> MethodOutput for Reasoned<T> {
    fn type_tag(&self) -> String {
        self.value.type_tag()
    }

    fn summary(&self) -> String {
        self.value.summary()
    }

    fn split_reasoning(self) -> (Self, Option<String>) {
        match self.reasoning {
            Some(trace) if !trace.trim().is_empty() => {
                (Reasoned::plain(self.value), Some(trace.trim().to_string()))
            }
            reasoning => (
                Reasoned {
                    value: self.value,
                    reasoning,
                },
                None,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reasoning::{TRACE_END, TRACE_START};
    use serde_json::json;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<String>(), "String");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
        assert_eq!(short_type_name::<std::io::Error>(), "Error");
        assert_eq!(short_type_name::<i32>(), "i32");
    }

    #[test]
    fn test_truncate_summary() {
        assert_eq!(truncate_summary("short".to_string()), "short");

        let exact = "a".repeat(MAX_SUMMARY_CHARS);
        assert_eq!(truncate_summary(exact.clone()), exact);

        let long = "é".repeat(MAX_SUMMARY_CHARS + 5);
        let summary = truncate_summary(long);
        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_string_reasoning_split() {
        let text = format!("pre {}why{} post", TRACE_START, TRACE_END);
        let (value, trace) = text.split_reasoning();
        assert_eq!(value, "pre  post");
        assert_eq!(trace.as_deref(), Some("why"));
    }

    #[test]
    fn test_string_without_reasoning_is_untouched() {
        let (value, trace) = "  padded  ".to_string().split_reasoning();
        assert_eq!(value, "  padded  ");
        assert!(trace.is_none());

        let empty = format!("  answer {}  {}", TRACE_START, TRACE_END);
        let (value, trace) = empty.clone().split_reasoning();
        assert_eq!(value, empty);
        assert!(trace.is_none());
    }

    #[test]
    fn test_non_text_outputs() {
        assert_eq!(42i32.type_tag(), "i32");
        assert_eq!(42i32.summary(), "42");
        assert_eq!(vec![1, 2].summary(), "[1, 2]");
        assert_eq!(().type_tag(), "()");
        assert_eq!(None::<String>.type_tag(), "None");
        assert_eq!(Some(3u8).summary(), "3");
        assert_eq!(json!({"a": 1}).summary(), r#"{"a":1}"#);
    }

    #[test]
    fn test_reasoned_output() {
        let (value, trace) = Reasoned::new(7u32, " because ").split_reasoning();
        assert_eq!(value, Reasoned::plain(7u32));
        assert_eq!(trace.as_deref(), Some("because"));

        let (value, trace) = Reasoned::new(7u32, "").split_reasoning();
        assert_eq!(value.reasoning.as_deref(), Some(""));
        assert!(trace.is_none());
    }
}
