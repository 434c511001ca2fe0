use serde::{Deserialize, Serialize};

/// Process-wide configuration, persisted alongside the session list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How many trailing turns to always include verbatim; -1 means unbounded.
    pub history_message_count: i64,
    /// Character budget that bounds the context window and triggers compression.
    pub compress_message_length_threshold: usize,
    pub submit_key: SubmitKey,
    pub theme: Theme,
    pub font_size: u32,
    pub send_preview_bubble: bool,
    pub model: ModelConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_message_count: 4,
            compress_message_length_threshold: 1000,
            submit_key: SubmitKey::Enter,
            theme: Theme::Auto,
            font_size: 16,
            send_preview_bubble: false,
            model: ModelConfig::default(),
        }
    }
}

/// Parameters forwarded to the completion service with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-0301".to_string(),
            temperature: 1.0,
            max_tokens: 2000,
            presence_penalty: 0.0,
        }
    }
}

/// Models the UI may offer; unknown names fall back to the default.
pub const AVAILABLE_MODELS: &[&str] = &[
    "gpt-4",
    "gpt-4-0314",
    "gpt-4-32k",
    "gpt-4-32k-0314",
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-0301",
];

impl ModelConfig {
    /// Clamp every field into its valid range, falling back to defaults for
    /// out-of-family values. Applied on every config update.
    pub fn validate(&mut self) {
        if !AVAILABLE_MODELS.contains(&self.model.as_str()) {
            self.model = ModelConfig::default().model;
        }
        self.max_tokens = self.max_tokens.min(32_000);
        self.temperature = self.temperature.clamp(0.0, 2.0);
        self.presence_penalty = self.presence_penalty.clamp(-2.0, 2.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitKey {
    Enter,
    CtrlEnter,
    ShiftEnter,
    AltEnter,
    MetaEnter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Auto,
    Dark,
    Light,
}
