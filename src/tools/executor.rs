//! 工具执行器
//!
//! 持有 ToolRegistry 与全局超时，execute(tool_name, args, ctx) 在超时内调用工具，
//! 超时或失败时转为 ExecutorError；每次调用输出结构化审计日志（JSON）。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::ExecutorError;
use crate::tools::{Tool, ToolContext, ToolRegistry};

/// 工具执行器：对每次调用施加超时，并将结果映射为 ExecutorError
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_timeout(registry: ToolRegistry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// 执行指定工具；超时返回 ToolTimeout，工具返回 Err 则转为 ToolExecutionFailed；输出 JSON 审计日志
    pub async fn execute(
        &self,
        tool_name: &str,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<String, ExecutorError> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| ExecutorError::UnknownTool(tool_name.to_string()))?;

        let start = Instant::now();
        let args_preview = args_preview(&args);
        let result = timeout(self.timeout, tool.execute(args, ctx)).await;

        let (ok, outcome): (bool, &str) = match &result {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": tool_name,
            "session": ctx.session.id(),
            "ok": ok,
            "outcome": outcome,
            "duration_ms": duration_ms,
            "args_preview": args_preview,
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        match result {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(e)) if e.starts_with(super::INVALID_ARGS_PREFIX) => {
                Err(ExecutorError::InvalidArguments {
                    tool: tool_name.to_string(),
                    detail: e,
                })
            }
            Ok(Err(e)) => Err(ExecutorError::ToolExecutionFailed(e)),
            Err(_) => Err(ExecutorError::ToolTimeout(tool_name.to_string())),
        }
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.registry.get(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

fn args_preview(args: &serde_json::Value) -> String {
    let s = args.to_string();
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::core::ResearchSession;

    struct SleepyTool;

    #[async_trait]
    impl Tool for SleepyTool {
        fn name(&self) -> &str {
            "sleepy"
        }

        fn description(&self) -> &str {
            "Sleeps"
        }

        async fn execute(&self, _args: Value, _ctx: &ToolContext) -> Result<String, String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("woke".into())
        }
    }

    fn ctx() -> ToolContext {
        ToolContext::new(Arc::new(ResearchSession::new()))
    }

    #[tokio::test]
    async fn test_timeout_maps_to_tool_timeout() {
        let mut registry = ToolRegistry::new();
        registry.register(SleepyTool);
        let executor = ToolExecutor::with_timeout(registry, Duration::from_millis(20));
        let err = executor.execute("sleepy", Value::Null, &ctx()).await.unwrap_err();
        assert!(matches!(err, ExecutorError::ToolTimeout(name) if name == "sleepy"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let executor = ToolExecutor::new(ToolRegistry::new(), 1);
        let err = executor.execute("ghost", Value::Null, &ctx()).await.unwrap_err();
        assert!(matches!(err, ExecutorError::UnknownTool(_)));
    }

    #[test]
    fn test_args_preview_truncates() {
        let long = serde_json::json!({ "q": "x".repeat(500) });
        let preview = args_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 203);
    }
}
