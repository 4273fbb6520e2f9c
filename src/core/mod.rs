//! 核心层：错误分类与研究会话

pub mod error;
pub mod session;

pub use error::{ErrorKind, ExecutorError, ToolError};
pub use session::{keys, ResearchSession};
