//! # Messages
//!
//! Reply texts sent to chat members. Outbound text uses Telegram HTML markup.

pub const ADMIN_ONLY: &str = "Эту команду может использовать только администратор.";
pub const BOT_NEEDS_ADMIN: &str =
    "Я должен быть администратором в этом чате, чтобы проверить ваши права.";
pub const SET_TOPIC_USAGE: &str = "Эту команду нужно использовать внутри темы (топика).";
pub const TOPIC_BOUND: &str = "✅ Отлично! Теперь я буду работать только в этой теме.";

pub const CODES_EXHAUSTED: &str = "😔 Увы, все коды закончились.";
pub const ADD_USAGE: &str = "После команды /add отправьте список кодов, каждый с новой строки.";
pub const NOTHING_ADDED: &str = "Все эти коды уже были в базе. Новых не добавлено.";

pub fn code_issued(code: &str, remaining: usize) -> String {
    format!("<code>{}</code>\n\n(Осталось: {remaining})", escape_html(code))
}

pub fn codes_added(added: usize, available: usize) -> String {
    format!("👍 Добавлено {added} новых кодов.\nВсего доступно: {available}")
}

/// Codes are arbitrary user text; keep them from breaking HTML parse mode.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
