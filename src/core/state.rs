//! 会话状态机的阶段定义
//!
//! 控制器按 AwaitingInput -> RunningTurn -> (DispatchingTools -> CheckingTermination)? -> ...
//! 推进，保存成功后进入 PostSavePrompt，最后停在 Ended。

use serde::Serialize;

/// 会话阶段
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// 等待下一条用户输入（首轮使用固定问候语）
    #[default]
    AwaitingInput,
    /// 正在调用 LLM
    RunningTurn,
    /// 正在执行本轮的工具调用
    DispatchingTools,
    /// 检查本批工具结果是否表示文档已保存
    CheckingTermination,
    /// 保存后询问是否发送邮件
    PostSavePrompt,
    Ended,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Ended)
    }
}

/// 会话结束时的内部快照，用于日志与测试断言
#[derive(Clone, Debug, Default)]
pub struct SessionSnapshot {
    /// 已完成的 LLM 轮数
    pub turns: usize,
    /// 已执行的工具调用数（含保存后的 add_email / send_email）
    pub tool_calls: usize,
    pub phase: SessionPhase,
    /// 最近一次成功保存的文件名
    pub saved_name: Option<String>,
    /// 保存后是否尝试了邮件发送
    pub delivery_attempted: bool,
    /// 是否因输入流结束而提前退出
    pub input_closed: bool,
}
