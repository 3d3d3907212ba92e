//! Gmail-backed [`Mailbox`].
//!
//! # Authentication
//!
//! The mailbox holds OAuth client credentials plus a refresh token and
//! trades them for an access token in [`GmailMailbox::connect`]. The
//! access token is kept in memory for the life of the run; nothing is
//! persisted here.
//!
//! # Endpoints
//!
//! Gmail API v1 under `users/me`:
//! - `threads.list` then `threads.get` per thread for inbox listing
//! - `threads.modify` for label changes
//! - `labels.list` / `labels.create` for label management
//! - `messages.send` for outgoing mail
//! - `getProfile` for the account's own address

use async_trait::async_trait;
use base64::prelude::*;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{Mailbox, MailboxError, OutgoingMessage, Pagination, Result};
use crate::domain::{system_labels, Address, Email, Label, LabelId, MessageId, Thread, ThreadId};

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Boundary marker for multipart/alternative outgoing messages.
const MIME_BOUNDARY: &str = "=_tonemark_alternative";

// Wire types. Only fields the crate reads are modeled; serde drops the
// rest of each payload.

#[derive(Debug, Deserialize)]
struct ThreadList {
    threads: Option<Vec<ThreadStub>>,
}

/// `threads.list` returns ids only; bodies need a `threads.get` each.
#[derive(Debug, Deserialize)]
struct ThreadStub {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiThread {
    id: String,
    #[serde(default)]
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMessage {
    id: String,
    thread_id: String,
    #[serde(default)]
    label_ids: Vec<String>,
    payload: Option<MessagePart>,
    internal_date: Option<String>,
}

/// A MIME part. The message payload itself is the root part; multipart
/// messages nest children under `parts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagePart {
    mime_type: Option<String>,
    #[serde(default)]
    headers: Vec<Header>,
    body: Option<PartBody>,
    #[serde(default)]
    parts: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PartBody {
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LabelList {
    labels: Option<Vec<ApiLabel>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifyCall {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    add_label_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    remove_label_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
}

/// OAuth credentials for one Gmail account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmailCredentials {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Gmail REST API mailbox.
///
/// # Example
///
/// ```ignore
/// use tonemark::providers::email::{GmailMailbox, Mailbox, Pagination};
///
/// let mut mailbox = GmailMailbox::new(credentials);
/// mailbox.connect().await?;
/// let threads = mailbox.fetch_inbox_threads(Pagination::first(10)).await?;
/// ```
pub struct GmailMailbox {
    client: reqwest::Client,
    credentials: GmailCredentials,
    access_token: Option<String>,
}

impl GmailMailbox {
    /// A mailbox that cannot make API calls until [`connect`](Self::connect)
    /// has obtained an access token.
    pub fn new(credentials: GmailCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            access_token: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.access_token.is_some()
    }

    /// Trades the refresh token for an access token.
    pub async fn connect(&mut self) -> Result<()> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&form)
            .send()
            .await
            .map_err(|e| MailboxError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(MailboxError::Authentication(format!(
                "token refresh rejected ({status}): {detail}"
            )));
        }

        let grant: TokenGrant = Self::decode(response).await?;
        self.access_token = Some(grant.access_token);

        tracing::info!("Gmail mailbox connected");
        Ok(())
    }

    fn token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| MailboxError::Authentication("not connected".to_string()))
    }

    async fn api_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let call = self
            .client
            .get(format!("{GMAIL_API_BASE}{path}"))
            .bearer_auth(self.token()?);
        Self::decode(Self::send(call).await?).await
    }

    async fn api_post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let call = self
            .client
            .post(format!("{GMAIL_API_BASE}{path}"))
            .bearer_auth(self.token()?)
            .json(body);
        Self::decode(Self::send(call).await?).await
    }

    async fn api_post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let call = self
            .client
            .post(format!("{GMAIL_API_BASE}{path}"))
            .bearer_auth(self.token()?)
            .json(body);
        Self::send(call).await.map(|_| ())
    }

    async fn send(call: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = call
            .send()
            .await
            .map_err(|e| MailboxError::Connection(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| MailboxError::Internal(format!("undecodable Gmail response: {e}")))
    }

    async fn error_from(response: reqwest::Response) -> MailboxError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => MailboxError::Authentication(format!("token rejected: {body}")),
            404 => MailboxError::NotFound(body),
            429 => MailboxError::RateLimited {
                retry_after_secs: None,
            },
            code => MailboxError::Provider(format!("Gmail API returned {code}: {body}")),
        }
    }

    /// Parses `Name <email>` header values; anything without angle
    /// brackets is treated as a bare address.
    fn parse_address(value: &str) -> Address {
        let value = value.trim();

        if let Some((name, rest)) = value.split_once('<') {
            if let Some((email, _)) = rest.split_once('>') {
                let name = name.trim().trim_matches('"');
                return if name.is_empty() {
                    Address::new(email.trim())
                } else {
                    Address::with_name(email.trim(), name)
                };
            }
        }

        Address::new(value)
    }

    fn decode_part_data(body: &PartBody) -> Option<String> {
        let bytes = BASE64_URL_SAFE_NO_PAD.decode(body.data.as_ref()?).ok()?;
        String::from_utf8(bytes).ok()
    }

    /// Pulls the plain and HTML bodies out of a message's part tree.
    ///
    /// A single-part message carries its body on the root part, routed by
    /// its declared mime type with plain text as the default. Multipart
    /// messages are walked depth-first and the first part of each kind
    /// wins.
    fn extract_bodies(payload: &MessagePart) -> (Option<String>, Option<String>) {
        let mut text = None;
        let mut html = None;

        if let Some(decoded) = payload.body.as_ref().and_then(Self::decode_part_data) {
            match payload.mime_type.as_deref() {
                Some("text/html") => html = Some(decoded),
                _ => text = Some(decoded),
            }
        }

        Self::walk_parts(&payload.parts, &mut text, &mut html);
        (text, html)
    }

    fn walk_parts(parts: &[MessagePart], text: &mut Option<String>, html: &mut Option<String>) {
        for part in parts {
            match part.mime_type.as_deref() {
                Some("text/plain") if text.is_none() => {
                    *text = part.body.as_ref().and_then(Self::decode_part_data);
                }
                Some("text/html") if html.is_none() => {
                    *html = part.body.as_ref().and_then(Self::decode_part_data);
                }
                _ => {}
            }
            Self::walk_parts(&part.parts, text, html);
        }
    }

    fn header_value<'a>(payload: Option<&'a MessagePart>, name: &str) -> Option<&'a str> {
        payload?
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    fn to_email(msg: &ApiMessage) -> Email {
        let payload = msg.payload.as_ref();

        let from = Self::header_value(payload, "From")
            .map(Self::parse_address)
            .unwrap_or_else(|| Address::new("unknown@unknown.com"));
        let subject = Self::header_value(payload, "Subject").map(str::to_owned);

        let date = msg
            .internal_date
            .as_deref()
            .and_then(|millis| millis.parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now);

        let (body_text, body_html) = payload.map(Self::extract_bodies).unwrap_or_default();

        Email {
            id: MessageId::from(msg.id.clone()),
            thread_id: ThreadId::from(msg.thread_id.clone()),
            from,
            subject,
            body_text,
            body_html,
            date,
        }
    }

    fn to_thread(thread: ApiThread) -> Thread {
        let messages: Vec<Email> = thread.messages.iter().map(Self::to_email).collect();
        let subject = messages.first().and_then(|m| m.subject.clone());

        // Thread labels are the union of per-message label ids.
        let mut seen = std::collections::BTreeSet::new();
        for msg in thread.messages {
            seen.extend(msg.label_ids);
        }

        Thread {
            id: ThreadId::from(thread.id),
            subject,
            messages,
            labels: seen.into_iter().map(LabelId::from).collect(),
        }
    }

    /// Renders an RFC 5322 message for `messages.send`.
    ///
    /// Gmail always sends from the authenticated account; the From header
    /// only contributes the optional display name. An HTML body turns the
    /// message into multipart/alternative.
    fn build_raw_message(message: &OutgoingMessage, from_address: &str) -> String {
        let from_header = match &message.from_name {
            Some(name) => format!("{name} <{from_address}>"),
            None => from_address.to_string(),
        };
        let to_header = message
            .to
            .iter()
            .map(|a| a.display())
            .collect::<Vec<_>>()
            .join(", ");

        let mut raw = format!(
            "From: {from_header}\r\nTo: {to_header}\r\nSubject: {}\r\nMIME-Version: 1.0\r\n",
            message.subject
        );

        match &message.body_html {
            Some(html) => {
                raw.push_str(&format!(
                    "Content-Type: multipart/alternative; boundary=\"{MIME_BOUNDARY}\"\r\n\r\n"
                ));
                raw.push_str(&format!("--{MIME_BOUNDARY}\r\n"));
                raw.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
                raw.push_str(&message.body_text);
                raw.push_str(&format!("\r\n--{MIME_BOUNDARY}\r\n"));
                raw.push_str("Content-Type: text/html; charset=utf-8\r\n\r\n");
                raw.push_str(html);
                raw.push_str(&format!("\r\n--{MIME_BOUNDARY}--\r\n"));
            }
            None => {
                raw.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
                raw.push_str(&message.body_text);
            }
        }

        raw
    }
}

#[async_trait]
impl Mailbox for GmailMailbox {
    fn name(&self) -> &str {
        "gmail"
    }

    async fn fetch_inbox_threads(&self, pagination: Pagination) -> Result<Vec<Thread>> {
        // The API pages by token, not offset. Ask for offset+limit ids
        // and drop the front of the listing.
        let want = pagination.offset + pagination.limit;
        let listing: ThreadList = self
            .api_get(&format!(
                "/threads?labelIds={}&maxResults={want}",
                system_labels::inbox()
            ))
            .await?;

        let mut threads = Vec::new();
        for stub in listing
            .threads
            .unwrap_or_default()
            .into_iter()
            .skip(pagination.offset)
        {
            let full: ApiThread = self
                .api_get(&format!("/threads/{}?format=full", stub.id))
                .await?;
            threads.push(Self::to_thread(full));
        }

        tracing::debug!(count = threads.len(), "fetched inbox threads");
        Ok(threads)
    }

    async fn fetch_labels(&self) -> Result<Vec<Label>> {
        let listing: LabelList = self.api_get("/labels").await?;

        Ok(listing
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|l| Label::new(l.id, l.name))
            .collect())
    }

    async fn create_label(&self, name: &str) -> Result<Label> {
        #[derive(Serialize)]
        struct NewLabel<'a> {
            name: &'a str,
        }

        let created: ApiLabel = self.api_post("/labels", &NewLabel { name }).await?;

        tracing::info!(label = %created.name, id = %created.id, "created Gmail label");
        Ok(Label::new(created.id, created.name))
    }

    async fn modify_labels(
        &self,
        thread_id: &ThreadId,
        add: &[LabelId],
        remove: &[LabelId],
    ) -> Result<()> {
        if add.is_empty() && remove.is_empty() {
            return Ok(());
        }

        let body = ModifyCall {
            add_label_ids: add.iter().map(|l| l.0.clone()).collect(),
            remove_label_ids: remove.iter().map(|l| l.0.clone()).collect(),
        };
        self.api_post_unit(&format!("/threads/{thread_id}/modify"), &body)
            .await
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<MessageId> {
        #[derive(Serialize)]
        struct RawMessage {
            raw: String,
        }

        #[derive(Deserialize)]
        struct SentMessage {
            id: String,
        }

        let from_address = self.user_email().await?;
        let rendered = Self::build_raw_message(message, &from_address);

        let sent: SentMessage = self
            .api_post(
                "/messages/send",
                &RawMessage {
                    raw: BASE64_URL_SAFE_NO_PAD.encode(rendered.as_bytes()),
                },
            )
            .await?;

        tracing::info!(message_id = %sent.id, "message sent via Gmail API");
        Ok(MessageId::from(sent.id))
    }

    async fn user_email(&self) -> Result<String> {
        let profile: Profile = self.api_get("/profile").await?;
        Ok(profile.email_address)
    }
}
