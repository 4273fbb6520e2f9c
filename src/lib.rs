//! Researcher - 研究助理工具集
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）与搜索服务凭证
//! - **core**: 错误分类、研究会话（搜索状态 + 键值存储）
//! - **extract**: 网页正文提取（超时、正文区域选择、规范化与截断）
//! - **search**: 搜索服务（Tavily / Google / Mock）与有界多轮累积
//! - **observability**: tracing 日志初始化
//! - **tools**: 供 agent 运行时调用的工具、注册表与执行器

pub mod config;
pub mod core;
pub mod extract;
pub mod observability;
pub mod search;
pub mod tools;

pub use crate::core::{ResearchSession, ToolError};
pub use extract::ContentExtractor;
pub use search::{SearchAccumulator, SearchOutcome, SessionSearchState};
