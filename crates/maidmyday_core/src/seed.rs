//! Mock seed data standing in for a real backend.
//!
//! # Responsibility
//! - Provide deterministic household fixtures for every store.
//! - Anchor relative dates ("tomorrow", "1 hour ago") to a caller instant.
//!
//! # Invariants
//! - Seed ids are stable across calls (`user1`, `task1`, `conv1`, ...).
//! - Seed conversations satisfy the unread-count invariant.
//! - Schedules embed copies of seed tasks, not references.

use crate::model::chat::{Conversation, Message};
use crate::model::notification::{Notification, NotificationKind};
use crate::model::schedule::Schedule;
use crate::model::task::{Task, TaskPriority};
use crate::model::user::{User, UserRole};
use crate::model::DAY_MS;

const HOUR_MS: i64 = 3_600_000;
const MINUTE_MS: i64 = 60_000;

/// Password accepted for every seeded account.
pub const MOCK_PASSWORD: &str = "password";

pub fn users() -> Vec<User> {
    vec![
        user("user1", "John Smith", "john@example.com", UserRole::Owner),
        user("user2", "Anna Johnson", "anna@example.com", UserRole::Staff),
        user("user3", "Maria Garcia", "maria@example.com", UserRole::Staff),
        user("user4", "Robert Chen", "robert@example.com", UserRole::Staff),
    ]
}

pub fn tasks(now: i64) -> Vec<Task> {
    vec![
        task(
            "task1",
            "Vacuum Living Room",
            "Vacuum the entire living room, including under the furniture and the corners.",
            TaskPriority::High,
            now + DAY_MS,
            ("Anna Johnson", "user2"),
            false,
            now,
        ),
        task(
            "task2",
            "Clean Kitchen",
            "Wipe down all surfaces, clean the sink, and mop the floor.",
            TaskPriority::Medium,
            now + 2 * DAY_MS,
            ("Maria Garcia", "user3"),
            true,
            now - DAY_MS,
        ),
        task(
            "task3",
            "Laundry",
            "Wash, dry, and fold all clothes in the laundry basket.",
            TaskPriority::Low,
            now + 3 * DAY_MS,
            ("Robert Chen", "user4"),
            false,
            now - 2 * DAY_MS,
        ),
        task(
            "task4",
            "Clean Bathrooms",
            "Clean all bathrooms, including toilets, showers, and sinks.",
            TaskPriority::High,
            now + DAY_MS,
            ("Anna Johnson", "user2"),
            false,
            now,
        ),
        task(
            "task5",
            "Water Plants",
            "Water all indoor and outdoor plants.",
            TaskPriority::Low,
            now + DAY_MS,
            ("Maria Garcia", "user3"),
            true,
            now - 3 * DAY_MS,
        ),
        task(
            "task6",
            "Dust Furniture",
            "Dust all furniture in the living room and bedrooms.",
            TaskPriority::Medium,
            now + 2 * DAY_MS,
            ("Robert Chen", "user4"),
            false,
            now - DAY_MS,
        ),
    ]
}

pub fn schedules(now: i64) -> Vec<Schedule> {
    let tasks = tasks(now);
    let pick = |indices: &[usize]| -> Vec<Task> {
        indices.iter().map(|&index| tasks[index].clone()).collect()
    };

    vec![
        Schedule {
            id: "schedule1".to_string(),
            title: "This Week's Cleaning".to_string(),
            start_date: now,
            end_date: now + 6 * DAY_MS,
            tasks: pick(&[0, 3, 5]),
            created_at: now,
        },
        Schedule {
            id: "schedule2".to_string(),
            title: "Monthly Deep Clean".to_string(),
            start_date: now + 7 * DAY_MS,
            end_date: now + 14 * DAY_MS,
            tasks: pick(&[1, 2, 4]),
            created_at: now - 7 * DAY_MS,
        },
        Schedule {
            id: "schedule3".to_string(),
            title: "Special Event Preparation".to_string(),
            start_date: now + 21 * DAY_MS,
            end_date: now + 22 * DAY_MS,
            tasks: pick(&[0, 1, 3, 5]),
            created_at: now - 14 * DAY_MS,
        },
    ]
}

pub fn messages(now: i64) -> Vec<Message> {
    vec![
        message("msg1", "user1", "user2", "Hi Anna, have you finished vacuuming the living room?", now - HOUR_MS, true),
        message("msg2", "user2", "user1", "Yes, I just finished. I also dusted the shelves.", now - 55 * MINUTE_MS, true),
        message("msg3", "user1", "user2", "Great! Thank you for the extra effort.", now - 50 * MINUTE_MS, true),
        message("msg4", "user1", "user3", "Maria, can you please clean the kitchen tomorrow?", now - 2 * HOUR_MS, false),
        message("msg5", "user3", "user1", "Sure, I'll do it first thing in the morning.", now - 90 * MINUTE_MS, true),
        message("msg6", "user1", "user4", "Robert, don't forget to water the plants today.", now - DAY_MS, true),
        message("msg7", "user4", "user1", "I already did it this morning. All plants are watered.", now - 23 * HOUR_MS, true),
        message("msg8", "user1", "user4", "Perfect, thank you!", now - 22 * HOUR_MS, false),
    ]
}

pub fn conversations(now: i64) -> Vec<Conversation> {
    let messages = messages(now);
    let conversation = |id: &str, other: &str, last: usize, unread: u32| Conversation {
        id: id.to_string(),
        participant_ids: ["user1".to_string(), other.to_string()],
        last_message: Some(messages[last].clone()),
        unread_count: unread,
    };

    vec![
        conversation("conv1", "user2", 2, 0),
        conversation("conv2", "user3", 4, 1),
        conversation("conv3", "user4", 7, 1),
    ]
}

pub fn notifications(now: i64) -> Vec<Notification> {
    vec![
        notification("notif1", "Task Completed", "Anna has completed vacuuming the living room.", now - HOUR_MS, false, NotificationKind::Task, Some("task1")),
        notification("notif2", "New Message", "You have a new message from Maria.", now - 2 * HOUR_MS, true, NotificationKind::Message, Some("conv2")),
        notification("notif3", "Task Due Soon", "The 'Clean Bathrooms' task is due tomorrow.", now - DAY_MS, true, NotificationKind::Task, Some("task4")),
        notification("notif4", "Schedule Started", "The 'This Week's Cleaning' schedule has started.", now - 2 * DAY_MS, true, NotificationKind::Schedule, Some("schedule1")),
        notification("notif5", "System Update", "MaidMyDay has been updated to version 1.2.0.", now - 3 * DAY_MS, true, NotificationKind::System, None),
    ]
}

fn user(id: &str, name: &str, email: &str, role: UserRole) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    description: &str,
    priority: TaskPriority,
    deadline: i64,
    (assignee, assignee_id): (&str, &str),
    completed: bool,
    created_at: i64,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority,
        deadline,
        assigned_to: assignee.to_string(),
        assigned_to_id: assignee_id.to_string(),
        completed,
        created_at,
    }
}

fn message(id: &str, sender: &str, receiver: &str, content: &str, timestamp: i64, read: bool) -> Message {
    Message {
        id: id.to_string(),
        sender_id: sender.to_string(),
        receiver_id: receiver.to_string(),
        content: content.to_string(),
        timestamp,
        read,
    }
}

fn notification(
    id: &str,
    title: &str,
    body: &str,
    timestamp: i64,
    read: bool,
    kind: NotificationKind,
    related_id: Option<&str>,
) -> Notification {
    Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: body.to_string(),
        timestamp,
        read,
        kind,
        related_id: related_id.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::{conversations, messages};

    #[test]
    fn seed_conversations_match_unread_messages() {
        let now = 10 * super::DAY_MS;
        let messages = messages(now);
        for conversation in conversations(now) {
            let unread = messages
                .iter()
                .filter(|message| conversation.contains_message(message) && !message.read)
                .count() as u32;
            assert_eq!(conversation.unread_count, unread, "{}", conversation.id);
        }
    }
}
