//! 邮件工具：add_email / send_email
//!
//! add_email 只做结构校验（local@domain.suffix），结果仅供参考，不会阻止 send_email。
//! send_email 以当前文档为正文、derive_subject() 为主题交给 Deliverer。

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::core::AgentError;
use crate::delivery::Deliverer;
use crate::document::SharedDocument;
use crate::tools::schema::{args_schema, parse_args};
use crate::tools::Tool;

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// 至少一个非 @ 字符、@、至少一个非 @ 字符、.、至少一个字符
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

/// add_email 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddEmailArgs {
    /// Email address to check.
    pub email: String,
}

/// send_email 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SendEmailArgs {
    /// Recipient email address.
    pub recipient: String,
}

/// add_email 工具：邮箱格式校验
#[derive(Debug, Default)]
pub struct AddEmailTool;

#[async_trait]
impl Tool for AddEmailTool {
    fn name(&self) -> &str {
        "add_email"
    }

    fn description(&self) -> &str {
        "Check if the provided email address is valid for sending."
    }

    fn parameters_schema(&self) -> Value {
        args_schema::<AddEmailArgs>()
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let args: AddEmailArgs = parse_args(self.name(), args)?;
        if !is_valid_email(&args.email) {
            return Ok("Invalid email format. Please provide a valid email address.".to_string());
        }
        Ok(format!(
            "Email '{}' is valid and ready to receive the document.",
            args.email.trim()
        ))
    }
}

/// send_email 工具：发送当前文档
pub struct SendEmailTool {
    document: SharedDocument,
    deliverer: Arc<dyn Deliverer>,
}

impl SendEmailTool {
    pub fn new(document: SharedDocument, deliverer: Arc<dyn Deliverer>) -> Self {
        Self { document, deliverer }
    }
}

fn delivery_cause(err: &AgentError) -> String {
    match err {
        AgentError::DeliveryFailed(reason) => reason.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Tool for SendEmailTool {
    fn name(&self) -> &str {
        "send_email"
    }

    fn description(&self) -> &str {
        "Send the current document via email to the given address."
    }

    fn parameters_schema(&self) -> Value {
        args_schema::<SendEmailArgs>()
    }

    async fn execute(&self, args: Value) -> Result<String, String> {
        let args: SendEmailArgs = parse_args(self.name(), args)?;
        let recipient = args.recipient.trim();
        let (subject, body) = {
            let doc = self.document.lock().await;
            if doc.saved_name().is_none() {
                tracing::warn!("send_email before any successful save; subject has no file name");
            }
            (doc.derive_subject(), doc.content().to_string())
        };
        match self.deliverer.deliver(recipient, &subject, &body).await {
            Ok(()) => Ok(format!("Document sent to {} successfully.", recipient)),
            Err(e) => Err(format!("Error sending email: {}", delivery_cause(&e))),
        }
    }
}
