//! Azure OpenAI chat completion client
//!
//! One prompt in, one completion out. Sampling runs at a fixed low
//! temperature to favour factual phrasing over creative variation.

use crate::config::AzureOpenAiConfig;
use crate::error::{AdvisorError, Result};
use crate::provider::ChatProvider;
use async_openai::config::AzureConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u16 = 800;

/// Chat client for one Azure OpenAI deployment
pub struct AzureChatClient {
    client: Client<AzureConfig>,
    deployment: String,
}

impl AzureChatClient {
    /// Build a client from validated configuration. The client is created
    /// once per advisor and reused across questions.
    pub fn new(config: &AzureOpenAiConfig) -> Self {
        let azure_config = AzureConfig::new()
            .with_api_base(&config.endpoint)
            .with_api_key(&config.api_key)
            .with_api_version(&config.api_version)
            .with_deployment_id(&config.chat_deployment);

        Self {
            client: Client::with_config(azure_config),
            deployment: config.chat_deployment.clone(),
        }
    }
}

#[async_trait]
impl ChatProvider for AzureChatClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(
                    system_prompt.to_string(),
                ),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(user_prompt.to_string()),
                name: None,
            }),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.deployment.clone())
            .messages(messages)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .ok_or_else(|| {
                log::error!("No content in chat response: {:?}", response);
                AdvisorError::Generation("no content in chat response".to_string())
            })?;

        Ok(content.clone())
    }
}
