//! Newtype identifiers for mailbox entities.
//!
//! Thread, message and label identifiers are all opaque strings on the
//! wire. Wrapping each in its own type keeps them from being swapped at
//! a call site.

use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            /// Borrows the underlying identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

string_id! {
    /// Identifier of a conversation thread.
    ThreadId
}

string_id! {
    /// Identifier of a single message within a thread.
    MessageId
}

string_id! {
    /// Identifier of a mailbox label.
    LabelId
}
