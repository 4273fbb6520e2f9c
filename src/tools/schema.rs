//! 工具参数类型与 JSON Schema 生成（schemars 自动生成，供 LLM 生成正确的参数格式）

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::INVALID_ARGS_PREFIX;

/// extract_content 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractArgs {
    /// 要提取正文的网页 URL（http/https 绝对地址）
    pub url: String,
}

/// extract_contents 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractManyArgs {
    /// 依次提取的 URL 列表
    pub urls: Vec<String>,
}

/// tavily_search 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// 搜索查询
    pub query: String,
}

/// web_search 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// 搜索查询
    pub query: String,
    /// 返回结果数（默认 1）
    #[serde(default)]
    pub num_results: Option<usize>,
}

/// save_search_results 中的单条结果
#[derive(Debug, Clone, serde::Serialize, Deserialize, JsonSchema)]
pub struct SavedResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// 发布日期，未知时为 "Not available"
    #[serde(default = "not_available")]
    pub published: String,
    /// 网页正文（最多 12000 字符）
    #[serde(default)]
    pub extracted_content: String,
    pub extraction_status: ExtractionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

fn not_available() -> String {
    "Not available".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Failed,
}

/// save_search_results 中的一轮
#[derive(Debug, Clone, serde::Serialize, Deserialize, JsonSchema)]
pub struct SavedRound {
    /// 轮次标识，如 "1 - Overview"
    pub round: String,
    pub results: Vec<SavedResult>,
}

/// save_search_results 参数
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaveResultsArgs {
    /// 含正文的完整检索结果（供后续分析使用）
    pub search_results: Vec<SavedRound>,
    /// 给用户看的精简展示（不含正文）
    pub user_display: String,
}

/// 由参数类型生成 JSON Schema
pub fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| serde_json::json!({ "type": "object" }))
}

/// 将 JSON 参数解析为类型化结构；失败信息以 INVALID_ARGS_PREFIX 开头
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("{INVALID_ARGS_PREFIX}{e}"))
}
