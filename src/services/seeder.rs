//! Seeds the mailbox with sample messages for trying out the pipeline.
//!
//! Sends three messages to the account's own address, one per expected
//! tone, so a fresh inbox has something to classify. The complaint sample
//! has an HTML-only body on purpose: it exercises the normalizer's HTML
//! fallback path end to end.

use std::sync::Arc;

use crate::domain::Address;
use crate::providers::email::{Mailbox, OutgoingMessage, Result};

/// Sends a fixed set of sample messages to the mailbox owner.
pub struct SampleSeeder {
    mailbox: Arc<dyn Mailbox>,
}

impl SampleSeeder {
    /// Creates a seeder over a mailbox.
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self { mailbox }
    }

    /// Sends the sample set and returns how many messages went out.
    pub async fn seed(&self) -> Result<usize> {
        let recipient = self.mailbox.user_email().await?;
        let samples = sample_messages(&recipient);
        let count = samples.len();

        for message in &samples {
            let id = self.mailbox.send_message(message).await?;
            tracing::info!(message_id = %id, subject = %message.subject, "sample message sent");
        }

        Ok(count)
    }
}

/// Builds the three sample messages addressed to `recipient`.
fn sample_messages(recipient: &str) -> Vec<OutgoingMessage> {
    let to = vec![Address::new(recipient)];

    vec![
        OutgoingMessage {
            to: to.clone(),
            subject: "Thank you for amazing service!".to_string(),
            body_text: "Hi, I really enjoyed working with you. Thank you again!".to_string(),
            body_html: None,
            from_name: Some("Customer A".to_string()),
        },
        OutgoingMessage {
            to: to.clone(),
            subject: "Request for information".to_string(),
            body_text: "Hello, I need more information on your recent product launch. Thank you."
                .to_string(),
            body_html: None,
            from_name: Some("Customer B".to_string()),
        },
        OutgoingMessage {
            to,
            subject: "Complaint!".to_string(),
            body_text: String::new(),
            body_html: Some(
                "<p>Hello, You are late in delivery, again.</p>\n<p>Please contact me ASAP before I cancel our subscription.</p>"
                    .to_string(),
            ),
            from_name: Some("Customer C".to_string()),
        },
    ]
}
