//! 邮件投递协作者
//!
//! Deliverer 把 (recipient, subject, body) 交给传输层：SmtpDeliverer 走 STARTTLS + 登录认证，
//! UnconfiguredDeliverer 在没有凭据时直接返回失败原因，RecordingDeliverer 供测试记录投递内容。

use std::sync::Mutex;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::core::AgentError;

/// 投递接口：Deliver(recipient, subject, body)
#[async_trait]
pub trait Deliverer: Send + Sync {
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AgentError>;
}

/// SMTP 投递：纯文本正文，无附件
pub struct SmtpDeliverer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpDeliverer {
    /// host 通常为 smtp.gmail.com，port 587（STARTTLS）；username 同时作为发件人地址
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Result<Self, AgentError> {
        let sender: Mailbox = username
            .parse()
            .map_err(|e| AgentError::ConfigError(format!("invalid sender '{}': {}", username, e)))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AgentError::ConfigError(format!("smtp relay {}: {}", host, e)))?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        Ok(Self { transport, sender })
    }
}

#[async_trait]
impl Deliverer for SmtpDeliverer {
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AgentError> {
        let to: Mailbox = recipient.parse().map_err(|e| {
            AgentError::DeliveryFailed(format!("invalid recipient '{}': {}", recipient, e))
        })?;
        let email = lettre::Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AgentError::DeliveryFailed(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AgentError::DeliveryFailed(e.to_string()))?;
        tracing::info!(recipient = %recipient, subject = %subject, "email delivered");
        Ok(())
    }
}

/// 未配置 SMTP 凭据时使用：每次投递都失败并说明原因
#[derive(Debug, Default)]
pub struct UnconfiguredDeliverer;

#[async_trait]
impl Deliverer for UnconfiguredDeliverer {
    async fn deliver(&self, recipient: &str, _subject: &str, _body: &str) -> Result<(), AgentError> {
        tracing::warn!(recipient = %recipient, "delivery requested without SMTP credentials");
        Err(AgentError::DeliveryFailed(
            "SMTP credentials are not configured (set SMTP_USERNAME and SMTP_PASSWORD)".to_string(),
        ))
    }
}

/// 一次被记录的投递
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// 测试用投递：记录每封邮件，可设置固定失败原因
#[derive(Debug, Default)]
pub struct RecordingDeliverer {
    sent: Mutex<Vec<SentMail>>,
    fail_with: Option<String>,
}

impl RecordingDeliverer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Deliverer for RecordingDeliverer {
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AgentError> {
        if let Some(reason) = &self.fail_with {
            return Err(AgentError::DeliveryFailed(reason.clone()));
        }
        if let Ok(mut s) = self.sent.lock() {
            s.push(SentMail {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_rejects_invalid_sender() {
        let err = SmtpDeliverer::new("smtp.example.com", 587, "not an address", "pw")
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_always_fails() {
        let err = UnconfiguredDeliverer
            .deliver("a@b.com", "s", "b")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SMTP credentials"));
    }

    #[tokio::test]
    async fn test_recording_deliverer() {
        let d = RecordingDeliverer::new();
        d.deliver("a@b.com", "subj", "body").await.unwrap();
        assert_eq!(
            d.sent(),
            vec![SentMail {
                recipient: "a@b.com".into(),
                subject: "subj".into(),
                body: "body".into(),
            }]
        );
    }
}
