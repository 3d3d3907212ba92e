//! Mailbox labels.

use super::LabelId;

/// A label as the mailbox reports it: an opaque id plus the name users
/// see. Names are what sentiment labels are matched on, since ids are
/// assigned by the provider at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
}

impl Label {
    pub fn new(id: impl Into<LabelId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Provider-defined label ids with fixed well-known values.
pub mod system_labels {
    use super::LabelId;

    pub fn inbox() -> LabelId {
        LabelId::from("INBOX")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_keep_their_unicode_suffix() {
        let label = Label::new("Label_123", "HAPPY TONE \u{1F60A}");
        assert_eq!(label.id.as_str(), "Label_123");
        assert_eq!(label.name, "HAPPY TONE \u{1F60A}");
    }

    #[test]
    fn inbox_id_is_the_wire_constant() {
        assert_eq!(system_labels::inbox().as_str(), "INBOX");
    }
}
