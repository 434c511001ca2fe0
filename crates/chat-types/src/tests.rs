#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::*;
    use crate::event::*;
    use crate::message::*;
    use crate::session::*;

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_system() {
        let msg = Message::system("You are a game master");
        assert_eq!(msg.role, Role::System);
        assert_eq!(msg.content, "You are a game master");
        assert!(!msg.streaming);
        assert!(!msg.is_error);
    }

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_message_assistant() {
        let msg = Message::assistant("I can help");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "I can help");
    }

    #[test]
    fn test_message_with_id() {
        let msg = Message::user("hi").with_id(42);
        assert_eq!(msg.id, 42);
    }

    #[test]
    fn test_message_char_len_multibyte() {
        let msg = Message::user("héllo");
        assert_eq!(msg.char_len(), 5);
    }

    #[test]
    fn test_message_serialization_roundtrip() {
        let mut msg = Message::user("test input").with_id(7);
        msg.streaming = true;
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id, 7);
        assert_eq!(deserialized.role, Role::User);
        assert_eq!(deserialized.content, "test input");
        assert!(deserialized.streaming);
    }

    #[test]
    fn test_message_flags_skipped_when_false() {
        let msg = Message::user("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("streaming"));
        assert!(!json.contains("is_error"));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }

    #[test]
    fn test_role_deserialization() {
        let role: Role = serde_json::from_str(r#""assistant""#).unwrap();
        assert_eq!(role, Role::Assistant);
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_new_session_defaults() {
        let session = ChatSession::new();
        assert_eq!(session.topic, DEFAULT_TOPIC);
        assert!(session.send_memory);
        assert!(session.memory_prompt.is_empty());
        assert!(session.messages.is_empty());
        assert_eq!(session.last_summarize_index, 0);
        assert_eq!(session.stat.char_count, 0);
    }

    #[test]
    fn test_new_session_priming_context() {
        let session = ChatSession::new();
        assert_eq!(session.context.len(), 3);
        assert_eq!(session.context[0].role, Role::System);
        assert_eq!(session.context[1].role, Role::User);
        assert_eq!(session.context[2].role, Role::Assistant);
    }

    #[test]
    fn test_session_ids_unique() {
        let a = ChatSession::new();
        let b = ChatSession::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_count_messages_includes_error_turns() {
        let mut session = ChatSession::new();
        session.messages.push(Message::user("abcde"));
        let mut failed = Message::assistant("xyz");
        failed.is_error = true;
        session.messages.push(failed);
        assert_eq!(session.count_messages(), 8);
    }

    #[test]
    fn test_message_mut_finds_by_id() {
        let mut session = ChatSession::new();
        session.messages.push(Message::user("a").with_id(1));
        session.messages.push(Message::assistant("b").with_id(2));
        session.message_mut(2).unwrap().content = "changed".to_string();
        assert_eq!(session.messages[1].content, "changed");
        assert!(session.message_mut(99).is_none());
    }

    #[test]
    fn test_session_serialization_roundtrip() {
        let mut session = ChatSession::new();
        session.messages.push(Message::user("hello").with_id(3));
        session.memory_prompt = "a summary".to_string();
        session.last_summarize_index = 1;

        let json = serde_json::to_string(&session).unwrap();
        let restored: ChatSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, session.id);
        assert_eq!(restored.messages.len(), 1);
        assert_eq!(restored.memory_prompt, "a summary");
        assert_eq!(restored.last_summarize_index, 1);
    }

    // ─── Stat Tests ──────────────────────────────────────────

    #[test]
    fn test_stat_add_message() {
        let mut stat = ChatStat::default();
        stat.add_message(&Message::user("one two three"));
        assert_eq!(stat.char_count, 13);
        assert_eq!(stat.word_count, 3);
        assert_eq!(stat.token_count, 13 / 4);
    }

    #[test]
    fn test_stat_accumulates() {
        let mut stat = ChatStat::default();
        stat.add_message(&Message::user("aaaa"));
        stat.add_message(&Message::assistant("bbbb"));
        assert_eq!(stat.char_count, 8);
        assert_eq!(stat.word_count, 2);
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.history_message_count, 4);
        assert_eq!(config.compress_message_length_threshold, 1000);
        assert_eq!(config.model.model, "gpt-3.5-turbo-0301");
        assert_eq!(config.model.max_tokens, 2000);
    }

    #[test]
    fn test_model_config_validate_clamps() {
        let mut model = ModelConfig {
            model: "not-a-model".to_string(),
            temperature: 9.0,
            max_tokens: 1_000_000,
            presence_penalty: -5.0,
        };
        model.validate();
        assert_eq!(model.model, "gpt-3.5-turbo-0301");
        assert_eq!(model.temperature, 2.0);
        assert_eq!(model.max_tokens, 32_000);
        assert_eq!(model.presence_penalty, -2.0);
    }

    #[test]
    fn test_model_config_validate_keeps_known_model() {
        let mut model = ModelConfig::default();
        model.model = "gpt-4".to_string();
        model.validate();
        assert_eq!(model.model, "gpt-4");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ChatConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ChatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    // ─── Error & Event Tests ─────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = ChatError::Transport {
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "transport error (500): boom");

        let err = ChatError::Transport {
            status: None,
            message: "offline".to_string(),
        };
        assert_eq!(err.to_string(), "transport error: offline");
    }

    #[test]
    fn test_error_from_serde() {
        let parse: std::result::Result<ChatConfig, _> = serde_json::from_str("{{nope");
        let err: ChatError = parse.unwrap_err().into();
        assert!(matches!(err, ChatError::Serialization(_)));
    }

    #[test]
    fn test_event_serialization() {
        let event = ChatEvent::MessageUpdated {
            session_index: 1,
            message_id: 44,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("MessageUpdated"));
        let restored: ChatEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            restored,
            ChatEvent::MessageUpdated { session_index: 1, message_id: 44 }
        ));
    }
}
