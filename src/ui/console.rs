//! 行式终端边界：读取一行输入、展示会话事件
//!
//! StdConsole 对接真实的 stdin/stdout；ScriptedConsole 按脚本喂输入并记录输出，供测试驱动整个会话。

use std::collections::VecDeque;
use std::io::{self, Write};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::session::SessionEvent;

/// 控制器与人之间的边界
#[async_trait]
pub trait Console: Send {
    /// 打印提示并读取一行；输入结束（EOF）时返回 None
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn emit(&mut self, event: &SessionEvent) -> io::Result<()>;
}

/// 标准输入输出
pub struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        {
            let mut out = io::stdout().lock();
            out.write_all(prompt.as_bytes())?;
            out.flush()?;
        }
        self.lines.next_line().await
    }

    fn emit(&mut self, event: &SessionEvent) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", event.render())?;
        out.flush()
    }
}

/// 脚本化终端：输入耗尽即视为 EOF
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    prompts: Vec<String>,
    events: Vec<SessionEvent>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// 已显示过的提示（按顺序）
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// 全部事件按终端格式拼接后的文本
    pub fn transcript_text(&self) -> String {
        self.events
            .iter()
            .map(SessionEvent::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front())
    }

    fn emit(&mut self, event: &SessionEvent) -> io::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_console_runs_dry() {
        let mut console = ScriptedConsole::new(["hello"]);
        assert_eq!(console.read_line("> ").await.unwrap().as_deref(), Some("hello"));
        assert_eq!(console.read_line("> ").await.unwrap(), None);
        assert_eq!(console.prompts(), ["> ", "> "]);
    }

    #[test]
    fn test_scripted_console_records_rendered_output() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        console.emit(&SessionEvent::SessionStarted).unwrap();
        console
            .emit(&SessionEvent::AssistantMessage { text: "hi".into() })
            .unwrap();
        assert_eq!(
            console.transcript_text(),
            "\n+=+=+=+ DRAFTER WITH EMAIL SUPPORT +=+=+=+\n\nAI: hi"
        );
    }
}
