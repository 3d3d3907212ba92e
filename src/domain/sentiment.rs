//! Sentiment verdict types.
//!
//! A classification run leaves every inbox thread marked with exactly one of
//! these four verdicts. `Unprocessed` records that classification could not
//! run for the message; it is distinct from `Neutral`, which is a real
//! verdict about the text.

use std::fmt;

/// Sentiment verdict for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    /// The text reads as positive.
    Positive,
    /// The text reads as neutral, or the reply named neither polarity.
    Neutral,
    /// The text reads as negative.
    Negative,
    /// Classification did not run or the service reply was unusable.
    Unprocessed,
}

impl Sentiment {
    /// All four verdicts, in label-resolution order.
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Neutral,
        Sentiment::Negative,
        Sentiment::Unprocessed,
    ];

    /// Display name of the mailbox label that marks this verdict.
    ///
    /// These are exact strings, emoji suffix included; the mailbox provider
    /// must round-trip them unchanged.
    pub fn label_name(&self) -> &'static str {
        match self {
            Sentiment::Positive => "HAPPY TONE 😊",
            Sentiment::Neutral => "NEUTRAL TONE 😐",
            Sentiment::Negative => "UPSET TONE 😡",
            Sentiment::Unprocessed => "UNPROCESSED ⚠️",
        }
    }

    /// Maps a raw completion reply to a verdict.
    ///
    /// The reply is lowercased and trimmed, then matched by containment with
    /// positive checked first. A reply naming neither polarity is neutral.
    pub fn from_reply(reply: &str) -> Self {
        let reply = reply.trim().to_lowercase();
        if reply.contains("positive") {
            Sentiment::Positive
        } else if reply.contains("negative") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Unprocessed => "unprocessed",
        };
        write!(f, "{word}")
    }
}
