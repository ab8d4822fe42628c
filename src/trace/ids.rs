// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Identifier types for envelopes, spans and traces.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Get a short representation (first 8 characters).
            pub fn short(&self) -> &str {
                let end = self
                    .0
                    .char_indices()
                    .nth(8)
                    .map(|(idx, _)| idx)
                    .unwrap_or(self.0.len());
                &self.0[..end]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(
    /// Globally unique identifier of one envelope.
    EventId
);

define_id!(
    /// Correlation group shared by every envelope of one causal chain.
    TraceId
);

define_id!(
    /// Identifier of a single envelope within its trace.
    ///
    /// Freshly generated per envelope unless a caller supplies one for
    /// manual correlation.
    SpanId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = TraceId::new();
        let b = TraceId::new();
        assert_ne!(a, b);
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn test_short() {
        let id = SpanId::new();
        assert_eq!(id.short().len(), 8);

        let tiny = SpanId::from("abc");
        assert_eq!(tiny.short(), "abc");
    }

    #[test]
    fn test_display_and_debug() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = TraceId::from(uuid);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(format!("{:?}", id), "TraceId(550e8400)");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = TraceId::from("manual-trace");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"manual-trace\"");
        let parsed: TraceId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
