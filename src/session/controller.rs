//! 会话控制器：驱动 轮次 -> 工具分发 -> 保存检测 的状态机
//!
//! 每个阶段处理函数返回下一个阶段；阶段之间需要传递的数据（本轮输入、待分发的调用、
//! 本批结果）暂存在控制器里，离开对应阶段即被取走。

use uuid::Uuid;

use crate::core::{AgentError, SessionPhase, SessionSnapshot};
use crate::document::SharedDocument;
use crate::memory::{ToolCall, Transcript};
use crate::session::{SessionEvent, TerminationMode, TurnExecutor, GREETING};
use crate::tools::{ToolExecutor, ToolResult};
use crate::ui::Console;

/// 下一条指令的提示
pub const INSTRUCTION_PROMPT: &str = "\nWhat would you like to do with the document? ";
/// 保存后询问收件人的提示
pub const RECIPIENT_PROMPT: &str =
    "Enter an email address to send the document (or leave blank to skip): ";

/// 单个会话：独占一份文档与一份 Transcript
pub struct SessionController {
    turn: TurnExecutor,
    executor: ToolExecutor,
    document: SharedDocument,
    termination: TerminationMode,
    transcript: Transcript,
    phase: SessionPhase,
    snapshot: SessionSnapshot,
    pending_utterance: Option<String>,
    pending_calls: Vec<ToolCall>,
    last_batch: Vec<ToolResult>,
}

impl SessionController {
    pub fn new(turn: TurnExecutor, executor: ToolExecutor, document: SharedDocument) -> Self {
        Self {
            turn,
            executor,
            document,
            termination: TerminationMode::default(),
            transcript: Transcript::new(),
            phase: SessionPhase::default(),
            snapshot: SessionSnapshot::default(),
            pending_utterance: None,
            pending_calls: Vec::new(),
            last_batch: Vec::new(),
        }
    }

    pub fn with_termination(mut self, mode: TerminationMode) -> Self {
        self.termination = mode;
        self
    }

    pub fn termination(&self) -> TerminationMode {
        self.termination
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// 跑到 Ended 为止；只有推理失败与终端 I/O 失败会以错误返回
    pub async fn run(&mut self, console: &mut dyn Console) -> Result<SessionSnapshot, AgentError> {
        tracing::info!(tools = ?self.executor.tool_names(), "session started");
        console.emit(&SessionEvent::SessionStarted)?;

        let outcome = self.drive(console).await;

        let (prompt, completion, total) = self.turn.token_usage();
        tracing::info!(
            turns = self.snapshot.turns,
            tool_calls = self.snapshot.tool_calls,
            prompt_tokens = prompt,
            completion_tokens = completion,
            total_tokens = total,
            "session finished"
        );
        outcome?;

        console.emit(&SessionEvent::SessionEnded)?;
        self.snapshot.phase = self.phase;
        self.snapshot.saved_name = self.document.lock().await.saved_name().map(str::to_string);
        Ok(self.snapshot.clone())
    }

    async fn drive(&mut self, console: &mut dyn Console) -> Result<(), AgentError> {
        while !self.phase.is_terminal() {
            let next = match self.phase {
                SessionPhase::AwaitingInput => self.await_input(console).await?,
                SessionPhase::RunningTurn => self.run_turn(console).await?,
                SessionPhase::DispatchingTools => self.dispatch_tools(console).await?,
                SessionPhase::CheckingTermination => self.check_termination(),
                SessionPhase::PostSavePrompt => self.post_save(console).await?,
                SessionPhase::Ended => SessionPhase::Ended,
            };
            tracing::debug!(from = ?self.phase, to = ?next, "phase transition");
            self.phase = next;
        }
        Ok(())
    }

    async fn await_input(&mut self, console: &mut dyn Console) -> Result<SessionPhase, AgentError> {
        if self.transcript.is_empty() {
            self.pending_utterance = Some(GREETING.to_string());
            return Ok(SessionPhase::RunningTurn);
        }
        match console.read_line(INSTRUCTION_PROMPT).await? {
            Some(line) => {
                console.emit(&SessionEvent::UserMessage { text: line.clone() })?;
                self.pending_utterance = Some(line);
                Ok(SessionPhase::RunningTurn)
            }
            None => {
                tracing::info!("input closed, ending session");
                self.snapshot.input_closed = true;
                Ok(SessionPhase::Ended)
            }
        }
    }

    async fn run_turn(&mut self, console: &mut dyn Console) -> Result<SessionPhase, AgentError> {
        let utterance = self.pending_utterance.take().unwrap_or_default();
        let response = self
            .turn
            .run_turn(&mut self.transcript, &utterance, &self.document)
            .await?;
        self.snapshot.turns += 1;

        console.emit(&SessionEvent::AssistantMessage {
            text: response.content.clone(),
        })?;
        if !response.has_tool_calls() {
            return Ok(SessionPhase::AwaitingInput);
        }
        console.emit(&SessionEvent::ToolsRequested {
            names: response.tool_calls.iter().map(|c| c.name.clone()).collect(),
        })?;
        self.pending_calls = response.tool_calls;
        Ok(SessionPhase::DispatchingTools)
    }

    async fn dispatch_tools(&mut self, console: &mut dyn Console) -> Result<SessionPhase, AgentError> {
        let calls = std::mem::take(&mut self.pending_calls);
        let results = self.executor.dispatch_all(&calls).await;
        self.snapshot.tool_calls += results.len();

        self.transcript.extend(results.iter().map(ToolResult::to_message));
        for r in &results {
            console.emit(&SessionEvent::ToolResult {
                tool: r.tool_name.clone(),
                content: r.content.clone(),
            })?;
        }
        self.last_batch = results;
        Ok(SessionPhase::CheckingTermination)
    }

    fn check_termination(&mut self) -> SessionPhase {
        let batch = std::mem::take(&mut self.last_batch);
        if self.termination.save_detected(&batch) {
            SessionPhase::PostSavePrompt
        } else {
            SessionPhase::AwaitingInput
        }
    }

    /// 询问收件人；非空则先 add_email 再 send_email，校验结果不影响发送
    async fn post_save(&mut self, console: &mut dyn Console) -> Result<SessionPhase, AgentError> {
        console.emit(&SessionEvent::DocumentSaved)?;
        let recipient = match console.read_line(RECIPIENT_PROMPT).await? {
            Some(line) => line.trim().to_string(),
            None => {
                self.snapshot.input_closed = true;
                String::new()
            }
        };
        if recipient.is_empty() {
            tracing::info!("no recipient given, skipping delivery");
            return Ok(SessionPhase::Ended);
        }

        self.snapshot.delivery_attempted = true;
        let calls = [
            post_save_call("add_email", serde_json::json!({ "email": recipient })),
            post_save_call("send_email", serde_json::json!({ "recipient": recipient })),
        ];
        for call in &calls {
            let result = self.executor.execute(call).await;
            self.snapshot.tool_calls += 1;
            console.emit(&SessionEvent::DeliveryResult {
                tool: result.tool_name,
                content: result.content,
            })?;
        }
        Ok(SessionPhase::Ended)
    }
}

fn post_save_call(name: &str, args: serde_json::Value) -> ToolCall {
    ToolCall::new(format!("post_save_{}", Uuid::new_v4()), name, args)
}
