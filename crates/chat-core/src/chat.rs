//! Streaming ingestion controller — drives one user turn from submission
//! to a settled assistant message.

use futures::StreamExt;

use chat_types::event::ChatEvent;
use chat_types::message::Message;
use chat_types::Result;

use crate::context::build_context;
use crate::pool::ControllerPool;
use crate::ports::{ChatRequest, ChatStreamEvent, CompletionPort};
use crate::store::ChatStore;
use crate::summarize;

const UNAUTHORIZED_MESSAGE: &str =
    "Unauthorized, please check your API key in the settings page.";
const STREAM_ERROR_SUFFIX: &str = "Oops, something went wrong, please retry later.";

/// Submit one user turn: append the user message and a streaming assistant
/// placeholder, issue the completion request, and apply deltas in arrival
/// order until the stream settles. On completion the post-turn hook updates
/// stats and checks summarization thresholds.
pub async fn submit_user_input(
    store: &ChatStore,
    pool: &ControllerPool,
    llm: &dyn CompletionPort,
    content: &str,
) -> Result<()> {
    let (user_id, bot_id) = store.next_message_pair();
    let user_message = Message::user(content).with_id(user_id);
    let mut bot_message = Message::assistant("").with_id(bot_id);
    bot_message.streaming = true;

    let session_index = store.current_session_index();

    // Window first, then the new user message on top.
    let mut send_messages = store.with_current(|session, config| build_context(session, config));
    send_messages.push(user_message.clone());

    // Commit both turns before the request goes out so the UI shows the
    // pending turn immediately and stop/retry has something to target.
    {
        let user_message = user_message.clone();
        let bot_message = bot_message.clone();
        store.update_current_session(move |session| {
            session.messages.push(user_message);
            session.messages.push(bot_message);
        });
    }

    let req = ChatRequest {
        messages: send_messages,
        model: store.config().model,
    };
    log::info!(
        "submitting turn: session {} user {} ({} context messages)",
        session_index,
        user_id,
        req.messages.len()
    );

    let (handle, mut stream) = llm.stream_chat(req);
    pool.register(session_index, bot_id, handle);

    while let Some(event) = stream.next().await {
        match event {
            ChatStreamEvent::Delta(text) => {
                // A delta after stop/retry means the message already
                // settled; drop it.
                if !pool.contains(session_index, bot_id) {
                    store.update_message(session_index, bot_id, |m| m.streaming = false);
                    break;
                }
                store.update_message(session_index, bot_id, |m| m.content = text);
            }
            ChatStreamEvent::Done(text) => {
                pool.remove(session_index, bot_id);
                let mut finished = bot_message.clone();
                finished.content = text.clone();
                finished.streaming = false;
                store.update_message(session_index, bot_id, |m| {
                    m.streaming = false;
                    m.content = text;
                });
                store.on_new_message(session_index, &finished);
                store
                    .events()
                    .emit(ChatEvent::TurnComplete { session_index, message_id: bot_id });
                summarize::summarize_session(store, llm, session_index).await;
                break;
            }
            ChatStreamEvent::Error { status, message } => {
                let cancelled = !pool.contains(session_index, bot_id);
                log::warn!(
                    "stream failed for session {} message {}: status={:?} {} (cancelled={})",
                    session_index,
                    bot_id,
                    status,
                    message,
                    cancelled
                );
                store.update_message(session_index, bot_id, |m| {
                    if status == Some(401) {
                        m.content = UNAUTHORIZED_MESSAGE.to_string();
                    } else if !cancelled {
                        m.content.push_str("\n\n");
                        m.content.push_str(STREAM_ERROR_SUFFIX);
                    }
                    m.streaming = false;
                    if !cancelled {
                        m.is_error = true;
                    }
                });
                if !cancelled {
                    store.update_message(session_index, user_id, |m| m.is_error = true);
                    store.events().emit(ChatEvent::Error { message });
                }
                pool.remove(session_index, bot_id);
                store
                    .events()
                    .emit(ChatEvent::TurnComplete { session_index, message_id: bot_id });
                break;
            }
        }
    }

    Ok(())
}

/// Stop/retry entry point: abort the in-flight stream for a message id.
/// The next delta (if any) finds its registry entry gone and is ignored.
pub fn stop_streaming(pool: &ControllerPool, session_index: usize, message_id: u64) {
    pool.stop(session_index, message_id);
}
