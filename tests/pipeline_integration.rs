//! Integration tests for the sentiment pipeline.
//!
//! These tests drive the public pipeline API against an in-memory mailbox
//! and a scripted chat-completion stub. Each service module contains its own
//! unit tests for detailed logic testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use pretty_assertions::assert_eq;

use tonemark::config::ClassifierSettings;
use tonemark::domain::{
    Address, Email, Label, LabelId, MessageId, Sentiment, Thread, ThreadId,
};
use tonemark::providers::ai::{
    CompletionRequest, CompletionResponse, LlmError, LlmProvider, LlmResult,
};
use tonemark::providers::email::{
    Mailbox, MailboxError, OutgoingMessage, Pagination, Result as MailboxResult,
};
use tonemark::services::{SampleSeeder, SentimentClassifier, SentimentPipeline, INBOX_PAGE_SIZE};

// ============================================================================
// In-memory Mailbox
// ============================================================================

/// Mailbox that lives entirely in memory. Messages sent through it are
/// delivered back into its own inbox, so a seed-then-analyze cycle works
/// the same way it does against a real account.
struct InMemoryMailbox {
    threads: RwLock<Vec<Thread>>,
    labels: RwLock<Vec<Label>>,
    thread_labels: RwLock<HashMap<String, HashSet<String>>>,
    sent: RwLock<Vec<OutgoingMessage>>,
    fail_fetch: bool,
}

impl InMemoryMailbox {
    fn new() -> Self {
        Self {
            threads: RwLock::new(Vec::new()),
            labels: RwLock::new(Vec::new()),
            thread_labels: RwLock::new(HashMap::new()),
            sent: RwLock::new(Vec::new()),
            fail_fetch: false,
        }
    }

    fn with_threads(threads: Vec<Thread>) -> Self {
        let mailbox = Self::new();
        *mailbox.threads.write().unwrap() = threads;
        mailbox
    }

    fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    fn label_id_by_name(&self, name: &str) -> Option<LabelId> {
        self.labels
            .read()
            .unwrap()
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.id.clone())
    }

    fn labels_on(&self, thread: &str) -> HashSet<String> {
        self.thread_labels
            .read()
            .unwrap()
            .get(thread)
            .cloned()
            .unwrap_or_default()
    }

    fn label_count(&self) -> usize {
        self.labels.read().unwrap().len()
    }
}

#[async_trait]
impl Mailbox for InMemoryMailbox {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn fetch_inbox_threads(&self, pagination: Pagination) -> MailboxResult<Vec<Thread>> {
        if self.fail_fetch {
            return Err(MailboxError::Connection("connection reset".to_string()));
        }

        let threads = self.threads.read().unwrap();
        Ok(threads
            .iter()
            .skip(pagination.offset)
            .take(pagination.limit)
            .cloned()
            .collect())
    }

    async fn fetch_labels(&self) -> MailboxResult<Vec<Label>> {
        Ok(self.labels.read().unwrap().clone())
    }

    async fn create_label(&self, name: &str) -> MailboxResult<Label> {
        let mut labels = self.labels.write().unwrap();
        let label = Label {
            id: LabelId::from(format!("Label_{}", labels.len() + 1)),
            name: name.to_string(),
        };
        labels.push(label.clone());
        Ok(label)
    }

    async fn modify_labels(
        &self,
        thread_id: &ThreadId,
        add: &[LabelId],
        remove: &[LabelId],
    ) -> MailboxResult<()> {
        let mut threads = self.thread_labels.write().unwrap();
        let entry = threads.entry(thread_id.0.clone()).or_default();
        for label in remove {
            entry.remove(&label.0);
        }
        for label in add {
            entry.insert(label.0.clone());
        }
        Ok(())
    }

    async fn send_message(&self, message: &OutgoingMessage) -> MailboxResult<MessageId> {
        let n = {
            let mut sent = self.sent.write().unwrap();
            sent.push(message.clone());
            sent.len()
        };

        // Deliver to self: sent mail shows up as a fresh inbox thread
        let thread_id = ThreadId::from(format!("seeded-{}", n));
        let message_id = MessageId::from(format!("seeded-msg-{}", n));

        let from = match &message.from_name {
            Some(name) => Address::with_name("owner@example.com", name),
            None => Address::new("owner@example.com"),
        };

        let email = Email {
            id: message_id.clone(),
            thread_id: thread_id.clone(),
            from,
            subject: Some(message.subject.clone()),
            body_text: Some(message.body_text.clone()),
            body_html: message.body_html.clone(),
            date: Utc::now(),
        };

        self.threads.write().unwrap().push(Thread {
            id: thread_id,
            subject: Some(message.subject.clone()),
            messages: vec![email],
            labels: vec![LabelId::from("INBOX")],
        });

        Ok(message_id)
    }

    async fn user_email(&self) -> MailboxResult<String> {
        Ok("owner@example.com".to_string())
    }
}

// ============================================================================
// Scripted LLM
// ============================================================================

/// Chat-completion stub that answers from keyword rules and records what
/// it was asked.
struct ScriptedLlm {
    calls: AtomicUsize,
    seen: RwLock<Vec<String>>,
}

impl ScriptedLlm {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: RwLock::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> LlmResult<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let text = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.seen.write().unwrap().push(text.clone());

        let reply = if text.contains("enjoyed") {
            "positive"
        } else if text.contains("late in delivery") {
            "negative"
        } else {
            "neutral"
        };

        Ok(CompletionResponse {
            text: reply.to_string(),
        })
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Stub that fails every request like an upstream outage.
struct OutageLlm;

#[async_trait]
impl LlmProvider for OutageLlm {
    fn name(&self) -> &str {
        "outage"
    }

    async fn complete(&self, _request: &CompletionRequest) -> LlmResult<CompletionResponse> {
        Err(LlmError::ApiError {
            status: 500,
            message: "Internal Server Error".to_string(),
        })
    }

    fn model(&self) -> &str {
        "outage-model"
    }
}

fn plain_thread(thread_id: &str, body: &str) -> Thread {
    Thread {
        id: ThreadId::from(thread_id),
        subject: Some("Subject".to_string()),
        messages: vec![Email {
            id: MessageId::from(format!("{}-m1", thread_id)),
            thread_id: ThreadId::from(thread_id),
            from: Address::new("sender@example.com"),
            subject: Some("Subject".to_string()),
            body_text: Some(body.to_string()),
            body_html: None,
            date: Utc::now(),
        }],
        labels: vec![LabelId::from("INBOX")],
    }
}

// ============================================================================
// Seed Then Analyze
// ============================================================================

#[tokio::test]
async fn seed_then_analyze_labels_each_thread() {
    let mailbox = Arc::new(InMemoryMailbox::new());

    let seeder = SampleSeeder::new(mailbox.clone());
    assert_eq!(seeder.seed().await.unwrap(), 3);

    let llm = Arc::new(ScriptedLlm::new());
    let pipeline = SentimentPipeline::new(
        mailbox.clone(),
        SentimentClassifier::with_provider(llm.clone()),
    );

    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.threads, 3);
    assert_eq!(summary.messages, 3);
    assert_eq!(summary.positive, 1);
    assert_eq!(summary.neutral, 1);
    assert_eq!(summary.negative, 1);
    assert_eq!(summary.unprocessed, 0);
    assert_eq!(llm.call_count(), 3);

    let happy = mailbox
        .label_id_by_name(Sentiment::Positive.label_name())
        .unwrap();
    let neutral = mailbox
        .label_id_by_name(Sentiment::Neutral.label_name())
        .unwrap();
    let upset = mailbox
        .label_id_by_name(Sentiment::Negative.label_name())
        .unwrap();

    assert_eq!(mailbox.labels_on("seeded-1"), HashSet::from([happy.0]));
    assert_eq!(mailbox.labels_on("seeded-2"), HashSet::from([neutral.0]));
    assert_eq!(mailbox.labels_on("seeded-3"), HashSet::from([upset.0]));
}

#[tokio::test]
async fn html_only_complaint_reaches_classifier_stripped() {
    let mailbox = Arc::new(InMemoryMailbox::new());
    SampleSeeder::new(mailbox.clone()).seed().await.unwrap();

    let llm = Arc::new(ScriptedLlm::new());
    let pipeline = SentimentPipeline::new(
        mailbox.clone(),
        SentimentClassifier::with_provider(llm.clone()),
    );
    pipeline.run().await.unwrap();

    let seen = llm.seen.read().unwrap();
    let complaint = seen
        .iter()
        .find(|t| t.contains("late in delivery"))
        .expect("complaint text classified");

    // The HTML body was used (plain body is empty) and tags were stripped
    assert!(!complaint.contains('<'));
    assert!(complaint.contains("cancel our subscription"));
}

#[tokio::test]
async fn analysis_is_stable_across_reruns() {
    let mailbox = Arc::new(InMemoryMailbox::new());
    SampleSeeder::new(mailbox.clone()).seed().await.unwrap();

    let llm = Arc::new(ScriptedLlm::new());
    let pipeline = SentimentPipeline::new(
        mailbox.clone(),
        SentimentClassifier::with_provider(llm.clone()),
    );

    let first = pipeline.run().await.unwrap();
    let after_first: Vec<HashSet<String>> = (1..=3)
        .map(|n| mailbox.labels_on(&format!("seeded-{}", n)))
        .collect();

    let second = pipeline.run().await.unwrap();
    let after_second: Vec<HashSet<String>> = (1..=3)
        .map(|n| mailbox.labels_on(&format!("seeded-{}", n)))
        .collect();

    assert_eq!(first, second);
    assert_eq!(after_first, after_second);

    // The four sentiment labels were created once, not per run
    assert_eq!(mailbox.label_count(), 4);
}

#[tokio::test]
async fn sentiment_labels_use_exact_display_names() {
    let mailbox = Arc::new(InMemoryMailbox::new());
    let pipeline = SentimentPipeline::new(mailbox.clone(), SentimentClassifier::disabled());
    pipeline.run().await.unwrap();

    let names: Vec<String> = mailbox
        .labels
        .read()
        .unwrap()
        .iter()
        .map(|l| l.name.clone())
        .collect();

    assert_eq!(
        names,
        vec![
            "HAPPY TONE \u{1F60A}",
            "NEUTRAL TONE \u{1F610}",
            "UPSET TONE \u{1F621}",
            "UNPROCESSED \u{26A0}\u{FE0F}",
        ]
    );
}

// ============================================================================
// Failure Isolation
// ============================================================================

#[tokio::test]
async fn upstream_outage_marks_messages_unprocessed() {
    let mailbox = Arc::new(InMemoryMailbox::with_threads(vec![
        plain_thread("t1", "I love this product!"),
        plain_thread("t2", "Please share more details."),
    ]));

    let pipeline = SentimentPipeline::new(
        mailbox.clone(),
        SentimentClassifier::with_provider(Arc::new(OutageLlm)),
    );

    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.messages, 2);
    assert_eq!(summary.unprocessed, 2);

    let unprocessed = mailbox
        .label_id_by_name(Sentiment::Unprocessed.label_name())
        .unwrap();
    assert_eq!(
        mailbox.labels_on("t1"),
        HashSet::from([unprocessed.0.clone()])
    );
    assert_eq!(mailbox.labels_on("t2"), HashSet::from([unprocessed.0]));
}

#[tokio::test]
async fn missing_credential_still_labels_everything() {
    let mailbox = Arc::new(InMemoryMailbox::with_threads(vec![plain_thread(
        "t1",
        "This is terrible and disappointing.",
    )]));

    // No API key anywhere: the classifier comes up disabled
    let classifier = SentimentClassifier::from_settings(&ClassifierSettings::default());
    assert!(!classifier.is_enabled());

    let pipeline = SentimentPipeline::new(mailbox.clone(), classifier);
    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.unprocessed, 1);

    let unprocessed = mailbox
        .label_id_by_name(Sentiment::Unprocessed.label_name())
        .unwrap();
    assert_eq!(mailbox.labels_on("t1"), HashSet::from([unprocessed.0]));
}

// ============================================================================
// Mailbox Faults and Paging
// ============================================================================

#[tokio::test]
async fn mailbox_fault_aborts_the_run() {
    let mailbox = Arc::new(InMemoryMailbox::new().failing_fetch());
    let pipeline = SentimentPipeline::new(mailbox, SentimentClassifier::disabled());

    assert!(pipeline.run().await.is_err());
}

#[tokio::test]
async fn run_covers_only_the_first_page_of_threads() {
    let threads: Vec<Thread> = (0..INBOX_PAGE_SIZE + 5)
        .map(|n| plain_thread(&format!("t{}", n), "hello"))
        .collect();

    let mailbox = Arc::new(InMemoryMailbox::with_threads(threads));
    let pipeline = SentimentPipeline::new(mailbox, SentimentClassifier::disabled());

    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.threads, INBOX_PAGE_SIZE);
    assert_eq!(summary.messages, INBOX_PAGE_SIZE);
}
