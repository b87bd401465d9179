//! # Domain Types
//!
//! Data structures shared between the gateway adapters and the update processor.

use serde::{Deserialize, Serialize};

/// One update as seen by the processor. Updates that carried no message
/// still appear here (with no text) so the cursor can move past them.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub update_id: i64,
    pub message_id: i64,
    pub chat_id: i64,
    pub thread_id: Option<i64>,
    pub sender_id: Option<i64>,
    pub text: Option<String>,
    pub is_topic_message: bool,
}

/// Membership status of a user in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

impl MemberRole {
    pub fn is_admin(self) -> bool {
        matches!(self, MemberRole::Creator | MemberRole::Administrator)
    }
}

/// Result of classifying a message's text. Exactly one variant per message.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetTopic,
    Get,
    /// Text following the command token, not yet split into codes.
    Add { body: String },
    Unrecognized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_roles() {
        assert!(MemberRole::Creator.is_admin());
        assert!(MemberRole::Administrator.is_admin());
        assert!(!MemberRole::Member.is_admin());
        assert!(!MemberRole::Restricted.is_admin());
        assert!(!MemberRole::Left.is_admin());
        assert!(!MemberRole::Kicked.is_admin());
    }

    #[test]
    fn test_role_from_status_string() {
        let role: MemberRole = serde_json::from_str("\"creator\"").unwrap();
        assert_eq!(role, MemberRole::Creator);
        let role: MemberRole = serde_json::from_str("\"kicked\"").unwrap();
        assert_eq!(role, MemberRole::Kicked);
    }
}
