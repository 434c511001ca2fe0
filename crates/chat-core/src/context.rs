//! Context window construction: fixed priming messages, the long-term
//! memory summary, and a bounded short-term window of recent raw turns.

use chat_types::config::ChatConfig;
use chat_types::message::Message;
use chat_types::session::ChatSession;

/// Template wrapping the compressed memory when it is injected as a
/// synthetic system message.
pub const HISTORY_PROMPT: &str = "This is a summary of the chat history as a recap: ";

/// The synthetic system message carrying the session's compressed memory.
pub fn memory_prompt(session: &ChatSession) -> Message {
    let mut msg = Message::system(format!("{}{}", HISTORY_PROMPT, session.memory_prompt));
    msg.date = String::new();
    msg
}

/// Build the ordered message list to submit to the completion service.
///
/// Output order: priming context, then (if enabled and non-empty) the memory
/// summary, then the chronological trailing window. The window is bounded by
/// two independent conditions: an index floor (`history_message_count` and
/// `last_summarize_index`, whichever is higher) and the character budget
/// `compress_message_length_threshold`. The memory message is inserted
/// before the budget walk and never counts against the threshold.
pub fn build_context(session: &ChatSession, config: &ChatConfig) -> Vec<Message> {
    let messages: Vec<&Message> = session.messages.iter().filter(|m| !m.is_error).collect();
    let n = messages.len();

    let mut window = session.context.clone();

    // Long-term memory.
    if session.send_memory && !session.memory_prompt.is_empty() {
        window.push(memory_prompt(session));
    }

    // Index floor: never re-include turns already folded into memory, and
    // never include more than history_message_count trailing turns.
    // A negative count means no short-term bound.
    let short_term_index = if config.history_message_count < 0 {
        0
    } else {
        n.saturating_sub(config.history_message_count as usize)
    };
    let long_term_index = session.last_summarize_index.min(n);
    let oldest_index = short_term_index.max(long_term_index);

    let threshold = config.compress_message_length_threshold;

    // Walk backward collecting as many recent turns as the budget allows.
    let mut reversed_recent: Vec<Message> = Vec::new();
    let mut count = 0usize;
    let mut i = n;
    while i > oldest_index && count < threshold {
        i -= 1;
        let msg = messages[i];
        count += msg.char_len();
        reversed_recent.push(msg.clone());
    }

    reversed_recent.reverse();
    window.extend(reversed_recent);
    window
}
