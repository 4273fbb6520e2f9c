//! 搜索数据类型

use serde::{Deserialize, Serialize};

/// 单条搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub url: String,
    pub title: String,
    /// 结果摘要
    pub content: String,
    /// 相关度
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

/// 一次搜索服务调用的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultItem>,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// 会话内一轮搜索（1 起编号）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRound {
    pub query: String,
    /// ISO-8601
    pub timestamp: String,
    pub results: Vec<SearchResultItem>,
    pub response_time_ms: u64,
    pub round_number: usize,
}

/// 单次搜索请求参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub max_results: usize,
    pub include_raw_content: bool,
}
