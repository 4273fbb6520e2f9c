//! 工具错误类型
//!
//! ToolError 为正文提取与搜索的统一错误分类，所有失败都以值返回给调用方，不会 panic；
//! ExecutorError 为工具执行层（超时、未知工具、参数错误）的错误。

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// 提取 / 搜索过程中的错误（调用方可记录、跳过或自行重试，本 crate 不做自动重试）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// URL 非法、查询为空等输入问题（发生在任何网络请求之前）
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 抓取超过截止时间
    #[error("Timed out after {}ms: {url}", elapsed.as_millis())]
    Timeout { url: String, elapsed: Duration },

    /// 非 2xx 状态或传输层错误；有状态码时携带
    #[error("Failed to fetch ({}): {detail}", status.map(|s| s.to_string()).unwrap_or_else(|| "transport".to_string()))]
    FetchFailed { status: Option<u16>, detail: String },

    /// 搜索服务调用失败
    #[error("Search provider {provider} failed: {detail}")]
    Provider { provider: String, detail: String },
}

/// 错误标签（序列化为 snake_case，供工具输出中的 `error` 字段使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Timeout,
    FetchFailed,
    ProviderError,
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::InvalidInput(_) => ErrorKind::InvalidInput,
            ToolError::Timeout { .. } => ErrorKind::Timeout,
            ToolError::FetchFailed { .. } => ErrorKind::FetchFailed,
            ToolError::Provider { .. } => ErrorKind::ProviderError,
        }
    }

    pub fn provider(provider: &str, detail: impl Into<String>) -> Self {
        ToolError::Provider {
            provider: provider.to_string(),
            detail: detail.into(),
        }
    }
}

/// 工具执行层错误（ToolExecutor 统一转换）
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {detail}")]
    InvalidArguments { tool: String, detail: String },

    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("Tool timeout: {0}")]
    ToolTimeout(String),
}
