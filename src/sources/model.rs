//! Chat completion through the OpenAI API.

use super::LanguageModel;
use crate::config::OpenAISettings;
use crate::error::{Result, ToolbeltError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    fn to_request_message(&self) -> Result<ChatCompletionRequestMessage> {
        let message: ChatCompletionRequestMessage = match self.role {
            ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(self.content.clone())
                .build()
                .map_err(|e| ToolbeltError::Model(e.to_string()))?
                .into(),
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(self.content.clone())
                .build()
                .map_err(|e| ToolbeltError::Model(e.to_string()))?
                .into(),
            ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(self.content.clone())
                .build()
                .map_err(|e| ToolbeltError::Model(e.to_string()))?
                .into(),
        };
        Ok(message)
    }
}

/// OpenAI chat model.
pub struct OpenAIModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIModel {
    pub fn new(settings: &OpenAISettings, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: create_client(settings, api_key)?,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OpenAIModel {
    #[instrument(skip(self, turns), fields(model = %self.model, turns = turns.len()))]
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        let messages = turns
            .iter()
            .map(ChatTurn::to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| ToolbeltError::Model(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ToolbeltError::Model(format!("Chat API error: {}", e)))?;

        let reply = response
            .choices
            .first()
            .ok_or_else(|| ToolbeltError::Model("No response from model".to_string()))?
            .message
            .content
            .clone()
            .unwrap_or_default();

        debug!("Model replied with {} chars", reply.len());
        Ok(reply)
    }
}
