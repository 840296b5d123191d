//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url）；支持 OpenAI、DeepSeek、自建代理等。
//! 工具以 function tool 形式声明，响应中的 tool_calls 解析为 ToolCall。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestToolMessage,
    ChatCompletionRequestToolMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionTool, ChatCompletionTools,
    CreateChatCompletionRequest, FunctionCall, FunctionObject,
};
use async_openai::Client;
use async_trait::async_trait;
use serde_json::Value;

use crate::llm::{LlmClient, LlmError, LlmResponse};
use crate::memory::{Message, Role, ToolCall};
use crate::tools::ToolSpec;

/// Token 使用统计（累计值）
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: Arc<AtomicU64>,
    pub completion_tokens: Arc<AtomicU64>,
    pub total_tokens: Arc<AtomicU64>,
}

impl TokenUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, prompt: u64, completion: u64) {
        self.prompt_tokens.fetch_add(prompt, Ordering::Relaxed);
        self.completion_tokens.fetch_add(completion, Ordering::Relaxed);
        self.total_tokens.fetch_add(prompt + completion, Ordering::Relaxed);
    }

    pub fn get(&self) -> (u64, u64, u64) {
        (
            self.prompt_tokens.load(Ordering::Relaxed),
            self.completion_tokens.load(Ordering::Relaxed),
            self.total_tokens.load(Ordering::Relaxed),
        )
    }
}

/// OpenAI 兼容客户端：持有 Client 与 model 名
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    /// 累计 token 使用统计
    pub usage: TokenUsage,
}

impl OpenAiClient {
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = if let Some(url) = base_url {
            OpenAIConfig::new()
                .with_api_base(url)
                .with_api_key(api_key)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            usage: TokenUsage::new(),
        }
    }

    fn build_request(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<CreateChatCompletionRequest, LlmError> {
        let messages = to_openai_messages(messages)?;
        let tools = if tools.is_empty() {
            None
        } else {
            Some(tools.iter().map(to_openai_tool).collect())
        };
        Ok(CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            tools,
            ..Default::default()
        })
    }
}

/// Transcript 消息 -> API 消息；assistant 的工具调用参数序列化为 JSON 字符串
pub(crate) fn to_openai_messages(
    messages: &[Message],
) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
    messages
        .iter()
        .map(|m| {
            let msg = match m.role {
                Role::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(m.content.clone()),
                        name: None,
                    },
                ),
                Role::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(m.content.clone()),
                    name: None,
                }),
                Role::Assistant => {
                    let tool_calls = if m.tool_calls.is_empty() {
                        None
                    } else {
                        Some(
                            m.tool_calls
                                .iter()
                                .map(|c| {
                                    ChatCompletionMessageToolCalls::Function(
                                        ChatCompletionMessageToolCall {
                                            id: c.id.clone(),
                                            function: FunctionCall {
                                                name: c.name.clone(),
                                                arguments: c.args.to_string(),
                                            },
                                        },
                                    )
                                })
                                .collect(),
                        )
                    };
                    let content = if m.content.is_empty() && tool_calls.is_some() {
                        None
                    } else {
                        Some(ChatCompletionRequestAssistantMessageContent::Text(
                            m.content.clone(),
                        ))
                    };
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content,
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls,
                        function_call: None,
                    })
                }
                Role::Tool => {
                    let tool_call_id = m.tool_call_id.clone().ok_or_else(|| {
                        LlmError::InvalidRequest("tool message without tool_call_id".to_string())
                    })?;
                    ChatCompletionRequestMessage::Tool(ChatCompletionRequestToolMessage {
                        content: ChatCompletionRequestToolMessageContent::Text(m.content.clone()),
                        tool_call_id,
                    })
                }
            };
            Ok(msg)
        })
        .collect()
}

fn to_openai_tool(spec: &ToolSpec) -> ChatCompletionTools {
    ChatCompletionTools::Function(ChatCompletionTool {
        function: FunctionObject {
            name: spec.name.clone(),
            description: Some(spec.description.clone()),
            parameters: Some(spec.parameters.clone()),
            strict: None,
        },
    })
}

/// 解析单个函数调用；参数为空字符串时视为空对象。
/// 参数不是合法 JSON 时原样保留为字符串，由工具自己的参数解析报错，不影响本轮其余调用
fn parse_tool_call(id: String, name: String, arguments: &str) -> ToolCall {
    let args = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(arguments).unwrap_or_else(|e| {
            tracing::warn!(tool = %name, error = %e, "tool arguments are not valid JSON");
            Value::String(arguments.to_string())
        })
    };
    ToolCall::new(id, name, args)
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn token_usage(&self) -> (u64, u64, u64) {
        self.usage.get()
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, LlmError> {
        let request = self.build_request(messages, tools)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Provider(e.to_string()))?;

        // 提取 token 使用统计
        if let Some(usage) = &response.usage {
            self.usage.add(
                usage.prompt_tokens as u64,
                usage.completion_tokens as u64,
            );
        }

        let choice = response.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        let content = choice.message.content.unwrap_or_default();

        let mut tool_calls = Vec::new();
        for call in choice.message.tool_calls.unwrap_or_default() {
            match call {
                ChatCompletionMessageToolCalls::Function(f) => {
                    tool_calls.push(parse_tool_call(f.id, f.function.name, &f.function.arguments));
                }
                other => {
                    tracing::warn!(call = ?other, "ignoring non-function tool call");
                }
            }
        }

        tracing::debug!(
            model = %self.model,
            tool_calls = tool_calls.len(),
            "chat completion received"
        );
        Ok(LlmResponse {
            content,
            tool_calls,
        })
    }
}
