pub const RUN_START: &str = "Checking for updates...";
pub const RUN_DONE: &str = "Check complete.";
pub const NO_UPDATES: &str = "No new messages.";
pub const CONNECTIONS_CLOSED: &str = "Connections closed.";

pub fn fetch_failed(err: &str) -> String {
    format!("Failed to fetch updates from Telegram: {err}")
}

pub fn updates_received(count: usize) -> String {
    format!("Received {count} new updates.")
}

pub fn topic_bound(chat_id: i64, thread_id: i64) -> String {
    format!("Bot bound to chat {chat_id} and topic {thread_id}")
}

pub fn role_lookup_failed(chat_id: i64, user_id: i64, err: &str) -> String {
    format!("Could not check role of user {user_id} in chat {chat_id}: {err}")
}

pub fn reply_failed(chat_id: i64, err: &str) -> String {
    format!("Failed to send reply to chat {chat_id}: {err}")
}

pub fn code_allocated(remaining: usize) -> String {
    format!("Code issued, {remaining} left")
}

pub fn codes_added(added: usize, candidates: usize, total: usize) -> String {
    format!("Added {added} of {candidates} submitted codes, inventory holds {total}")
}

pub fn cursor_advanced(update_id: i64) -> String {
    format!("Cursor advanced to {update_id}")
}

pub fn batch_halted(update_id: i64, err: &str) -> String {
    format!("Stopping batch at update {update_id}: {err}")
}

pub fn run_interrupted(processed: usize, total: usize) -> String {
    format!("Run interrupted after {processed} of {total} updates; the rest will be retried.")
}
