//! 独立网页搜索工具（web_search）：单次查询，不计入会话轮次；Google 未配置时为 Mock

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::search::{SearchProvider, SearchRequest, SearchResponse};
use crate::tools::schema::{parse_args, schema_of, WebSearchArgs};
use crate::tools::{Tool, ToolContext};

const DEFAULT_NUM_RESULTS: usize = 1;

pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

/// `Result i:\nTitle:\nURL:\nContent:` 格式，结果间空行分隔
pub fn format_results(response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return "No results found.".to_string();
    }
    response
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "Result {}:\nTitle: {}\nURL: {}\nContent: {}",
                i + 1,
                r.title,
                r.url,
                r.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Single web search (Google Custom Search) returning titles, URLs and snippets. Args: {\"query\": \"...\", \"num_results\": 1 (optional)}"
    }

    fn parameters_schema(&self) -> Value {
        schema_of::<WebSearchArgs>()
    }

    async fn execute(&self, args: Value, _ctx: &ToolContext) -> Result<String, String> {
        let args: WebSearchArgs = parse_args(args)?;
        let query = args.query.trim();
        if query.is_empty() {
            return Err("Missing query".to_string());
        }
        tracing::info!(query = %query, provider = self.provider.name(), "web_search");
        let response = self
            .provider
            .search(SearchRequest {
                query,
                max_results: args.num_results.unwrap_or(DEFAULT_NUM_RESULTS),
                include_raw_content: false,
            })
            .await
            .map_err(|e| format!("Error: {}", e))?;
        Ok(format_results(&response))
    }
}
