//! Summarization engine — post-turn topic inference and long-term memory
//! compression.

use futures::StreamExt;

use chat_types::event::ChatEvent;
use chat_types::message::Message;
use chat_types::session::DEFAULT_TOPIC;

use crate::context::memory_prompt;
use crate::ports::{ChatRequest, ChatStreamEvent, CompletionPort};
use crate::store::ChatStore;

/// Minimum accumulated characters before a topic is worth inferring.
pub const SUMMARIZE_MIN_LEN: usize = 50;

/// Character budget used when the model's max-token setting is zero.
const SUMMARIZE_FALLBACK_BUDGET: usize = 4000;

const TOPIC_PROMPT: &str = "Summarize our conversation into a four to five \
word title as the conversation topic, without punctuation or quotation marks";

const SUMMARIZE_PROMPT: &str = "Summarize the discussion briefly in 200 words \
or less to use as a prompt for future context.";

/// Strip quoting and trailing punctuation from an inferred topic label.
pub fn trim_topic(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '“' || c == '”')
        .trim_end_matches(|c| matches!(c, ',' | '.' | '!' | '?' | '。' | '，' | '！' | '？'))
        .trim()
        .to_string()
}

/// Run both post-turn checks for the given session: topic inference and
/// memory compression. Failures are logged and skipped; the next turn
/// simply retries with a larger backlog.
pub async fn summarize_session(store: &ChatStore, llm: &dyn CompletionPort, session_index: usize) {
    let config = store.config();

    // ── Topic inference ──────────────────────────────────────
    let needs_topic = store
        .session_at(session_index)
        .map(|s| s.topic == DEFAULT_TOPIC && s.count_messages() >= SUMMARIZE_MIN_LEN)
        .unwrap_or(false);

    if needs_topic {
        let Some(session) = store.session_at(session_index) else {
            return;
        };
        let mut messages = session.messages.clone();
        messages.push(Message::user(TOPIC_PROMPT));
        let req = ChatRequest {
            messages,
            model: config.model.clone(),
        };
        match llm.completion(req).await {
            Ok(label) => {
                let topic = trim_topic(&label);
                if !topic.is_empty() {
                    store.update_session(session_index, |s| s.topic = topic);
                    store.events().emit(ChatEvent::TopicUpdated { session_index });
                }
            }
            Err(e) => log::warn!("topic inference failed: {}", e),
        }
    }

    // ── Memory compression ───────────────────────────────────
    let Some(session) = store.session_at(session_index) else {
        return;
    };

    let start = session.last_summarize_index.min(session.messages.len());
    let mut to_summarize: Vec<Message> = session.messages[start..].to_vec();
    let history_len: usize = to_summarize.iter().map(Message::char_len).sum();

    let budget = if config.model.max_tokens == 0 {
        SUMMARIZE_FALLBACK_BUDGET
    } else {
        config.model.max_tokens as usize
    };
    if history_len > budget {
        let n = to_summarize.len();
        let keep = if config.history_message_count < 0 {
            n
        } else {
            config.history_message_count as usize
        };
        to_summarize = to_summarize.split_off(n.saturating_sub(keep));
    }

    to_summarize.insert(0, memory_prompt(&session));

    // Turns that arrive while compression streams must not be lost; the
    // index advances only to the count captured here.
    let captured_index = session.messages.len();

    if history_len > config.compress_message_length_threshold && session.send_memory {
        log::info!(
            "compressing {} message(s) ({} chars) for session {}",
            to_summarize.len() - 1,
            history_len,
            session_index
        );
        let mut messages = to_summarize;
        messages.push(Message::system(SUMMARIZE_PROMPT));
        let req = ChatRequest {
            messages,
            model: config.model.clone(),
        };

        // Compression streams are not stop/retry targets.
        let (_handle, mut stream) = llm.stream_chat(req);

        while let Some(event) = stream.next().await {
            match event {
                ChatStreamEvent::Delta(text) => {
                    store.update_session(session_index, |s| s.memory_prompt = text);
                    store.events().emit(ChatEvent::MemoryUpdated { session_index });
                }
                ChatStreamEvent::Done(text) => {
                    store.update_session(session_index, |s| {
                        s.memory_prompt = text;
                        // Forward-only, and never past the current history.
                        s.last_summarize_index = captured_index
                            .max(s.last_summarize_index)
                            .min(s.messages.len());
                    });
                    store.events().emit(ChatEvent::MemoryUpdated { session_index });
                    break;
                }
                ChatStreamEvent::Error { status, message } => {
                    log::error!(
                        "memory compression failed for session {}: status={:?} {}",
                        session_index,
                        status,
                        message
                    );
                    break;
                }
            }
        }
    }
}
