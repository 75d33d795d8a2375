//! Chat store: conversation directory, message log and reconciliation.
//!
//! # Responsibility
//! - Find or create the conversation owning a sent message.
//! - Maintain unread counters and last-message snapshots.
//! - Persist conversations and messages under two storage keys.
//!
//! # Invariants
//! - A conversation's `unread_count` equals the number of unread messages
//!   whose sender and receiver are both participants.
//! - At most one conversation exists per participant set.
//! - Messages keep insertion order; only `read` ever changes.
//! - Self-addressed messages are stored read and never bump unread counts.

use crate::model::chat::{Conversation, ConversationId, Message};
use crate::model::{generate_id, now_epoch_ms};
use crate::repo::kv_repo::{storage_keys, KvRepository, RepoError};
use crate::seed;
use crate::service::{keep_newest, StoreConfig};
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum accepted length of a user or conversation id.
pub const MAX_ID_CHARS: usize = 100;
/// Maximum accepted message length after trimming.
pub const MAX_CONTENT_CHARS: usize = 1_000;

pub type ChatResult<T> = Result<T, ChatError>;

/// Errors returned by chat store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Id field is blank after trim.
    EmptyId(&'static str),
    /// Id field exceeds `MAX_ID_CHARS`.
    IdTooLong(&'static str),
    /// Message content is blank after trim.
    EmptyContent,
    /// Message content exceeds `MAX_CONTENT_CHARS`.
    ContentTooLong { chars: usize },
    ConversationNotFound(ConversationId),
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId(field) => write!(f, "{field} must not be blank"),
            Self::IdTooLong(field) => write!(f, "{field} exceeds {MAX_ID_CHARS} characters"),
            Self::EmptyContent => write!(f, "message content must not be blank"),
            Self::ContentTooLong { chars } => write!(
                f,
                "message content has {chars} characters; limit is {MAX_CONTENT_CHARS}"
            ),
            Self::ConversationNotFound(id) => write!(f, "conversation not found: {id}"),
        }
    }
}

impl Error for ChatError {}

/// Chat store over a key/value repository.
pub struct ChatService<R: KvRepository> {
    repo: R,
    config: StoreConfig,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    current_conversation_messages: Vec<Message>,
    last_error: Option<String>,
}

impl<R: KvRepository> ChatService<R> {
    /// Creates the store from seed data, then overlays persisted snapshots.
    pub fn new(repo: R, config: StoreConfig) -> Self {
        let now = now_epoch_ms();
        let mut service = Self {
            repo,
            config,
            conversations: seed::conversations(now),
            messages: seed::messages(now),
            current_conversation_messages: Vec::new(),
            last_error: None,
        };
        service.restore();
        service
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages loaded by the last successful `fetch_messages` call.
    pub fn current_conversation_messages(&self) -> &[Message] {
        &self.current_conversation_messages
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn conversation(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.id == conversation_id)
    }

    /// Finds the conversation whose participant set is exactly `{a, b}`.
    pub fn find_conversation(&self, a: &str, b: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.matches_pair(a, b))
    }

    /// Conversations `user_id` takes part in, most recent activity first.
    ///
    /// Conversations without a last message sort after all others.
    pub fn conversations_for_user(&self, user_id: &str) -> Vec<&Conversation> {
        let mut items: Vec<&Conversation> = self
            .conversations
            .iter()
            .filter(|conversation| conversation.has_participant(user_id))
            .collect();
        items.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
        items
    }

    /// Sum of unread counters over conversations `user_id` takes part in.
    pub fn unread_total_for(&self, user_id: &str) -> u32 {
        self.conversations
            .iter()
            .filter(|conversation| conversation.has_participant(user_id))
            .map(|conversation| conversation.unread_count)
            .sum()
    }

    /// Resets conversations and messages to the seed snapshot.
    pub fn fetch_conversations(&mut self) {
        self.last_error = None;
        self.config.simulate_latency();
        let now = now_epoch_ms();
        self.conversations = seed::conversations(now);
        self.messages = seed::messages(now);
        info!(
            "event=chat_fetch module=chat status=ok conversations={}",
            self.conversations.len()
        );
    }

    /// Loads the messages of one conversation into the current view.
    ///
    /// # Errors
    /// - Invalid id or unknown conversation; the current view is cleared.
    pub fn fetch_messages(&mut self, conversation_id: &str) -> ChatResult<&[Message]> {
        self.last_error = None;
        match self.collect_conversation_messages(conversation_id) {
            Ok(messages) => {
                self.current_conversation_messages = messages;
                Ok(&self.current_conversation_messages)
            }
            Err(err) => {
                warn!("event=chat_fetch_messages module=chat status=error error={err}");
                self.current_conversation_messages.clear();
                self.last_error = Some("Failed to fetch messages".to_string());
                Err(err)
            }
        }
    }

    /// Appends a message and reconciles its conversation.
    ///
    /// # Contract
    /// - Ids and content are trimmed before validation and storage.
    /// - A new conversation starts with unread `1` (`0` for self messages).
    /// - An existing conversation gets `last_message` replaced and unread
    ///   incremented unless sender == receiver.
    pub fn send_message(
        &mut self,
        sender_id: &str,
        receiver_id: &str,
        content: &str,
    ) -> ChatResult<Message> {
        self.last_error = None;
        let (sender_id, receiver_id, content) =
            match validate_send(sender_id, receiver_id, content) {
                Ok(normalized) => normalized,
                Err(err) => {
                    self.last_error = Some("Failed to send message".to_string());
                    return Err(err);
                }
            };

        self.config.simulate_latency();

        let is_self = sender_id == receiver_id;
        let message = Message {
            id: generate_id("msg"),
            sender_id,
            receiver_id,
            content,
            timestamp: now_epoch_ms(),
            read: is_self,
        };

        let conversation_id = self.reconcile_conversation(&message);
        self.messages.push(message.clone());
        self.persist();

        info!(
            "event=chat_send module=chat status=ok conversation_id={} self_addressed={} content_chars={}",
            conversation_id,
            is_self,
            message.content.chars().count()
        );
        Ok(message)
    }

    /// Zeroes the unread counter and marks every member message read.
    ///
    /// Returns how many messages flipped from unread to read. Calling it
    /// again on the same conversation returns `0` and changes nothing.
    pub fn mark_conversation_as_read(&mut self, conversation_id: &str) -> ChatResult<usize> {
        self.last_error = None;
        match self.apply_mark_read(conversation_id) {
            Ok((id, flipped)) => {
                self.persist();
                info!(
                    "event=chat_mark_read module=chat status=ok conversation_id={} flipped={}",
                    id, flipped
                );
                Ok(flipped)
            }
            Err(err) => {
                warn!("event=chat_mark_read module=chat status=error error={err}");
                self.last_error = Some("Failed to mark conversation as read".to_string());
                Err(err)
            }
        }
    }

    fn collect_conversation_messages(&self, conversation_id: &str) -> ChatResult<Vec<Message>> {
        let id = normalize_id(conversation_id, "conversation id")?;
        self.config.simulate_latency();
        let conversation = self
            .conversation(&id)
            .ok_or_else(|| ChatError::ConversationNotFound(id.clone()))?;
        Ok(self
            .messages
            .iter()
            .filter(|message| conversation.contains_message(message))
            .cloned()
            .collect())
    }

    fn apply_mark_read(&mut self, conversation_id: &str) -> ChatResult<(ConversationId, usize)> {
        let id = normalize_id(conversation_id, "conversation id")?;
        self.config.simulate_latency();
        let conversation = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == id)
            .ok_or_else(|| ChatError::ConversationNotFound(id.clone()))?;
        conversation.unread_count = 0;

        let mut flipped = 0;
        for message in self.messages.iter_mut() {
            if !message.read && conversation.contains_message(message) {
                message.read = true;
                flipped += 1;
            }
        }

        if let Some(snapshot) = conversation.last_message.as_mut() {
            snapshot.read = snapshot.read || snapshot_is_read(&self.messages, &snapshot.id);
        }

        Ok((id, flipped))
    }

    /// Returns the id of the conversation that now owns `message`.
    fn reconcile_conversation(&mut self, message: &Message) -> ConversationId {
        let increment = u32::from(!message.is_self_addressed());
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.matches_pair(&message.sender_id, &message.receiver_id))
        {
            conversation.last_message = Some(message.clone());
            conversation.unread_count += increment;
            return conversation.id.clone();
        }

        let mut conversation = Conversation::new(
            generate_id("conv"),
            message.sender_id.clone(),
            message.receiver_id.clone(),
        );
        conversation.last_message = Some(message.clone());
        conversation.unread_count = increment;
        let id = conversation.id.clone();
        self.conversations.push(conversation);
        id
    }

    /// Overlays persisted snapshots, then re-bounds the pair so counters
    /// match the restored log even when one key fell back to seed data.
    fn restore(&mut self) {
        match self
            .repo
            .load_json::<Vec<Conversation>>(storage_keys::CHAT_CONVERSATIONS)
        {
            Ok(Some(stored)) => self.conversations = stored,
            Ok(None) => {}
            Err(err) => log_restore_failure(storage_keys::CHAT_CONVERSATIONS, &err),
        }

        match self.repo.load_json::<Vec<Message>>(storage_keys::CHAT_MESSAGES) {
            Ok(Some(stored)) => self.messages = stored,
            Ok(None) => {}
            Err(err) => log_restore_failure(storage_keys::CHAT_MESSAGES, &err),
        }

        let (conversations, messages) = bounded_snapshot(
            &self.conversations,
            &self.messages,
            self.config.max_persisted_conversations,
            self.config.max_persisted_messages,
        );
        if conversations.len() != self.conversations.len() || messages.len() != self.messages.len()
        {
            warn!(
                "event=storage_restore module=chat status=truncated conversations={}->{} messages={}->{}",
                self.conversations.len(),
                conversations.len(),
                self.messages.len(),
                messages.len()
            );
        }
        self.conversations = conversations;
        self.messages = messages;
    }

    fn persist(&self) {
        let within_caps = self.conversations.len() <= self.config.max_persisted_conversations
            && self.messages.len() <= self.config.max_persisted_messages;
        if within_caps {
            self.save_snapshot(&self.conversations, &self.messages);
        } else {
            let (conversations, messages) = bounded_snapshot(
                &self.conversations,
                &self.messages,
                self.config.max_persisted_conversations,
                self.config.max_persisted_messages,
            );
            self.save_snapshot(&conversations, &messages);
        }
    }

    fn save_snapshot(&self, conversations: &[Conversation], messages: &[Message]) {
        if let Err(err) = self
            .repo
            .save_json(storage_keys::CHAT_CONVERSATIONS, conversations)
        {
            warn!(
                "event=storage_save module=chat status=error key={} error={err}",
                storage_keys::CHAT_CONVERSATIONS
            );
        }
        if let Err(err) = self.repo.save_json(storage_keys::CHAT_MESSAGES, messages) {
            warn!(
                "event=storage_save module=chat status=error key={} error={err}",
                storage_keys::CHAT_MESSAGES
            );
        }
    }
}

/// Bounds a chat snapshot without breaking the unread invariant.
///
/// Keeps the `conversation_cap` most recently active conversations (list
/// order preserved) and the newest `message_cap` messages. Messages no kept
/// conversation owns are dropped, and every kept counter is recounted
/// against the kept log.
fn bounded_snapshot(
    conversations: &[Conversation],
    messages: &[Message],
    conversation_cap: usize,
    message_cap: usize,
) -> (Vec<Conversation>, Vec<Message>) {
    let mut ranked: Vec<usize> = (0..conversations.len()).collect();
    ranked.sort_by(|&a, &b| {
        conversations[b]
            .last_activity()
            .cmp(&conversations[a].last_activity())
    });
    ranked.truncate(conversation_cap);
    ranked.sort_unstable();
    let mut kept: Vec<Conversation> = ranked
        .into_iter()
        .map(|index| conversations[index].clone())
        .collect();

    let kept_messages: Vec<Message> = {
        let pairs: HashSet<(&str, &str)> = kept
            .iter()
            .map(|conversation| {
                let [first, second] = &conversation.participant_ids;
                pair_key(first, second)
            })
            .collect();
        let participants: HashSet<&str> = kept
            .iter()
            .flat_map(|conversation| conversation.participant_ids.iter().map(String::as_str))
            .collect();
        keep_newest(messages, message_cap)
            .iter()
            .filter(|message| {
                if message.is_self_addressed() {
                    participants.contains(message.sender_id.as_str())
                } else {
                    pairs.contains(&pair_key(&message.sender_id, &message.receiver_id))
                }
            })
            .cloned()
            .collect()
    };

    let mut unread_by_pair: HashMap<(&str, &str), u32> = HashMap::new();
    let mut unread_to_self: HashMap<&str, u32> = HashMap::new();
    for message in kept_messages.iter().filter(|message| !message.read) {
        if message.is_self_addressed() {
            *unread_to_self.entry(message.sender_id.as_str()).or_default() += 1;
        } else {
            *unread_by_pair
                .entry(pair_key(&message.sender_id, &message.receiver_id))
                .or_default() += 1;
        }
    }
    for conversation in &mut kept {
        let [first, second] = &conversation.participant_ids;
        let self_unread = |user: &str| unread_to_self.get(user).copied().unwrap_or(0);
        let unread = if first == second {
            self_unread(first)
        } else {
            unread_by_pair
                .get(&pair_key(first, second))
                .copied()
                .unwrap_or(0)
                + self_unread(first)
                + self_unread(second)
        };
        conversation.unread_count = unread;
    }

    (kept, kept_messages)
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn snapshot_is_read(messages: &[Message], message_id: &str) -> bool {
    messages
        .iter()
        .any(|message| message.id == message_id && message.read)
}

fn validate_send(
    sender_id: &str,
    receiver_id: &str,
    content: &str,
) -> ChatResult<(String, String, String)> {
    let sender_id = normalize_id(sender_id, "sender id")?;
    let receiver_id = normalize_id(receiver_id, "receiver id")?;

    let content = content.trim();
    if content.is_empty() {
        return Err(ChatError::EmptyContent);
    }
    let chars = content.chars().count();
    if chars > MAX_CONTENT_CHARS {
        return Err(ChatError::ContentTooLong { chars });
    }

    Ok((sender_id, receiver_id, content.to_string()))
}

fn normalize_id(value: &str, field: &'static str) -> ChatResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ChatError::EmptyId(field));
    }
    if trimmed.chars().count() > MAX_ID_CHARS {
        return Err(ChatError::IdTooLong(field));
    }
    Ok(trimmed.to_string())
}

fn log_restore_failure(key: &str, err: &RepoError) {
    warn!("event=storage_restore module=chat status=error key={key} error={err}");
}

#[cfg(test)]
mod tests {
    use super::{validate_send, ChatError, MAX_CONTENT_CHARS};

    #[test]
    fn validate_send_trims_all_fields() {
        let (sender, receiver, content) = validate_send(" user1 ", "user2\n", "  hi  ").unwrap();
        assert_eq!(sender, "user1");
        assert_eq!(receiver, "user2");
        assert_eq!(content, "hi");
    }

    #[test]
    fn validate_send_rejects_blank_and_oversize_input() {
        assert_eq!(
            validate_send("", "user2", "hi").unwrap_err(),
            ChatError::EmptyId("sender id")
        );
        assert_eq!(
            validate_send("user1", "user2", "   ").unwrap_err(),
            ChatError::EmptyContent
        );
        let long = "x".repeat(MAX_CONTENT_CHARS + 1);
        assert!(matches!(
            validate_send("user1", "user2", &long),
            Err(ChatError::ContentTooLong { chars }) if chars == MAX_CONTENT_CHARS + 1
        ));
        let long_id = "u".repeat(101);
        assert_eq!(
            validate_send(&long_id, "user2", "hi").unwrap_err(),
            ChatError::IdTooLong("sender id")
        );
    }
}
