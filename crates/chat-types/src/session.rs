use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Placeholder title for sessions whose topic has not been inferred yet.
pub const DEFAULT_TOPIC: &str = "New Conversation";

const PRIMING_SYSTEM: &str = "You are now the game master for a turn based game. \
Every turn has 3 wacky options. Each player turn should result in unpredictable consequences.";

const PRIMING_USER: &str = "Run a game where the player goal is to get off the planet \
KuKiPie in Spark Galaxy. The player should only have 5 turns before it's game over. \
Indicate which turn they're on each time they make a move. The first scenario is \
You land on the planet, and you see a huge pink fuzzball alien in the distance, \
it's singing a loud song.";

const PRIMING_ASSISTANT: &str = "Turn 1 of 5 \n You wave at the huge fuzzball, and make \
a big goofy smile, and look closely. It has a nice pink sweater, and a less pink face, \
and is eating something big and juicy. You wonder if he can help you get off the planet. \
\n1. Run over and see if the fuzzball speaks English. \n2. Yell hello at the fuzzball \
from here. \n3. Run to another part of the planet.";

/// The three fixed priming messages every fresh session starts from.
pub fn priming_context() -> Vec<Message> {
    vec![
        Message::system(PRIMING_SYSTEM),
        Message::user(PRIMING_USER),
        Message::assistant(PRIMING_ASSISTANT),
    ]
}

/// Derived counters attached to a session; informational only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatStat {
    pub token_count: usize,
    pub word_count: usize,
    pub char_count: usize,
}

impl ChatStat {
    /// Fold one completed message into the counters.
    pub fn add_message(&mut self, message: &Message) {
        let chars = message.char_len();
        self.char_count += chars;
        self.word_count += message.content.split_whitespace().count();
        // Rough estimate; good enough for display purposes.
        self.token_count += chars / 4;
    }
}

/// One independent conversation thread with its own priming context,
/// history, and memory state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub topic: String,
    /// Whether long-term compression feeds back into the context window.
    #[serde(default)]
    pub send_memory: bool,
    /// Running compressed summary of older turns; empty until first compression.
    #[serde(default)]
    pub memory_prompt: String,
    /// Fixed priming messages established at creation; logically immutable.
    #[serde(default)]
    pub context: Vec<Message>,
    /// Full append-only turn history.
    pub messages: Vec<Message>,
    #[serde(default)]
    pub stat: ChatStat,
    pub last_update: String,
    /// Index into `messages` up to which compression has already consumed.
    /// Invariant: `0 <= last_summarize_index <= messages.len()`, monotonic.
    #[serde(default)]
    pub last_summarize_index: usize,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            send_memory: true,
            memory_prompt: String::new(),
            context: priming_context(),
            messages: Vec::new(),
            stat: ChatStat::default(),
            last_update: chrono::Utc::now().to_rfc3339(),
            last_summarize_index: 0,
        }
    }

    /// Sum of character counts over the whole history, error turns included.
    pub fn count_messages(&self) -> usize {
        self.messages.iter().map(Message::char_len).sum()
    }

    pub fn message_mut(&mut self, id: u64) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
