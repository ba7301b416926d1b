//! Chat conversation validation.

use regdesk_shared::{AppError, ChatTurn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_MESSAGES: usize = 20;
const MAX_CONTENT: usize = 4000;

/// Conversation validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// No messages were sent.
    #[error("messages must not be empty")]
    Empty,
    /// Too many messages.
    #[error("at most {} messages are allowed", MAX_MESSAGES)]
    TooLong,
    /// A message has a role other than user or assistant.
    #[error("message {index}: role must be 'user' or 'assistant'")]
    InvalidRole {
        /// 0-based position.
        index: usize,
    },
    /// A message is blank or oversized.
    #[error("message {index}: content must be 1-{} characters", MAX_CONTENT)]
    InvalidContent {
        /// 0-based position.
        index: usize,
    },
    /// The conversation does not end with the user.
    #[error("the last message must come from the user")]
    LastNotUser,
}

impl From<ConversationError> for AppError {
    fn from(err: ConversationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Speaker of a message sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The visitor.
    User,
    /// The model.
    Assistant,
}

impl ChatRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Raw role string.
    #[serde(default)]
    pub role: String,
    /// Message text.
    #[serde(default)]
    pub content: String,
}

/// Chat request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Chat response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    /// Assistant's answer.
    pub reply: String,
}

fn parse_role(role: &str) -> Option<ChatRole> {
    match role.trim() {
        "user" => Some(ChatRole::User),
        "assistant" => Some(ChatRole::Assistant),
        _ => None,
    }
}

/// Validates a conversation and prepends the system prompt.
///
/// # Errors
///
/// Returns the first rule the conversation breaks.
pub fn prepare_conversation(
    messages: &[ChatMessage],
    system_prompt: &str,
) -> Result<Vec<ChatTurn>, ConversationError> {
    if messages.is_empty() {
        return Err(ConversationError::Empty);
    }
    if messages.len() > MAX_MESSAGES {
        return Err(ConversationError::TooLong);
    }

    let mut turns = Vec::with_capacity(messages.len() + 1);
    if !system_prompt.trim().is_empty() {
        turns.push(ChatTurn::new("system", system_prompt));
    }

    let mut last_role = ChatRole::Assistant;
    for (index, message) in messages.iter().enumerate() {
        let role = parse_role(&message.role).ok_or(ConversationError::InvalidRole { index })?;
        let content = message.content.trim();
        if content.is_empty() || content.chars().count() > MAX_CONTENT {
            return Err(ConversationError::InvalidContent { index });
        }
        turns.push(ChatTurn::new(role.as_str(), content));
        last_role = role;
    }

    if last_role != ChatRole::User {
        return Err(ConversationError::LastNotUser);
    }

    Ok(turns)
}
