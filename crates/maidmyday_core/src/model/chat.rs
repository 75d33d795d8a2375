//! Chat domain model.
//!
//! # Responsibility
//! - Define messages and the two-party conversations that aggregate them.
//! - Own participant-set membership rules used by reconciliation.
//!
//! # Invariants
//! - A conversation has exactly two participant slots; both slots hold the
//!   same id for a self-conversation.
//! - A message belongs to a conversation when its sender and receiver are
//!   both participants.
//! - Messages are immutable once created except for `read`.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

pub type MessageId = String;
pub type ConversationId = String;

/// One chat message between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    #[serde(with = "crate::model::timestamp")]
    pub timestamp: i64,
    pub read: bool,
}

impl Message {
    pub fn is_self_addressed(&self) -> bool {
        self.sender_id == self.receiver_id
    }
}

/// Two-party thread with an aggregate unread counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub participant_ids: [UserId; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    pub unread_count: u32,
}

impl Conversation {
    pub fn new(id: ConversationId, first: UserId, second: UserId) -> Self {
        Self {
            id,
            participant_ids: [first, second],
            last_message: None,
            unread_count: 0,
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_ids.iter().any(|id| id == user_id)
    }

    /// Returns whether the participant set equals `{a, b}`.
    ///
    /// For distinct ids this is the same as containing both; for `a == b` it
    /// only matches a self-conversation.
    pub fn matches_pair(&self, a: &str, b: &str) -> bool {
        let [first, second] = &self.participant_ids;
        (first == a && second == b) || (first == b && second == a)
    }

    pub fn contains_message(&self, message: &Message) -> bool {
        self.has_participant(&message.sender_id) && self.has_participant(&message.receiver_id)
    }

    /// Returns the participant that is not `user_id`.
    ///
    /// Self-conversations return `user_id` itself; non-members get `None`.
    pub fn partner_of(&self, user_id: &str) -> Option<&UserId> {
        let [first, second] = &self.participant_ids;
        if first == user_id {
            Some(second)
        } else if second == user_id {
            Some(first)
        } else {
            None
        }
    }

    pub fn last_activity(&self) -> Option<i64> {
        self.last_message.as_ref().map(|message| message.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversation, Message};

    fn message(sender: &str, receiver: &str) -> Message {
        Message {
            id: "msg9".to_string(),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            content: "hi".to_string(),
            timestamp: 0,
            read: false,
        }
    }

    #[test]
    fn matches_pair_is_order_independent() {
        let conv = Conversation::new("c".to_string(), "user1".to_string(), "user2".to_string());
        assert!(conv.matches_pair("user2", "user1"));
        assert!(!conv.matches_pair("user1", "user1"));
    }

    #[test]
    fn self_conversation_only_matches_its_owner() {
        let conv = Conversation::new("c".to_string(), "user1".to_string(), "user1".to_string());
        assert!(conv.matches_pair("user1", "user1"));
        assert!(!conv.contains_message(&message("user1", "user2")));
        assert_eq!(conv.partner_of("user1").map(String::as_str), Some("user1"));
    }

    #[test]
    fn partner_lookup_rejects_non_members() {
        let conv = Conversation::new("c".to_string(), "user1".to_string(), "user3".to_string());
        assert_eq!(conv.partner_of("user3").map(String::as_str), Some("user1"));
        assert!(conv.partner_of("user4").is_none());
    }

    #[test]
    fn participant_ids_must_have_two_entries_when_deserialized() {
        let json = r#"{"id":"c","participantIds":["user1"],"unreadCount":0}"#;
        assert!(serde_json::from_str::<Conversation>(json).is_err());
    }
}
