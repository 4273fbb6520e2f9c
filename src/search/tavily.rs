//! Tavily 搜索服务：POST {base}/search，Bearer 鉴权，可请求 markdown 格式的原始页面内容

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::SearchSection;
use crate::core::ToolError;

use super::provider::SearchProvider;
use super::types::{SearchRequest, SearchResponse, SearchResultItem};

const MAX_RESULTS_LIMIT: usize = 20;

pub struct TavilyProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
    /// 秒
    #[serde(default)]
    response_time: Option<f64>,
    #[serde(default)]
    request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    raw_content: Option<String>,
}

impl TavilyProvider {
    pub fn new(api_key: String, config: &SearchSection) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key,
            base_url: config.tavily_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_body(request: &SearchRequest<'_>) -> serde_json::Value {
        let include_raw = if request.include_raw_content {
            json!("markdown")
        } else {
            json!(false)
        };
        json!({
            "query": request.query,
            "max_results": request.max_results.clamp(1, MAX_RESULTS_LIMIT),
            "include_raw_content": include_raw,
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    async fn search(&self, request: SearchRequest<'_>) -> Result<SearchResponse, ToolError> {
        let started = Instant::now();
        let res = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&Self::build_body(&request))
            .send()
            .await
            .map_err(|e| ToolError::provider(self.name(), e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ToolError::provider(
                self.name(),
                format!("Tavily API error {}: {}", status, body),
            ));
        }

        let parsed: TavilyResponse = res
            .json()
            .await
            .map_err(|e| ToolError::provider(self.name(), format!("Invalid response: {}", e)))?;

        let response_time_ms = parsed
            .response_time
            .map(|secs| (secs * 1000.0).round() as u64)
            .unwrap_or_else(|| started.elapsed().as_millis() as u64);

        Ok(SearchResponse {
            query: request.query.to_string(),
            results: parsed
                .results
                .into_iter()
                .map(|r| SearchResultItem {
                    url: r.url,
                    title: r.title,
                    content: r.content,
                    score: r.score,
                    raw_content: r.raw_content,
                })
                .collect(),
            response_time_ms,
            answer: parsed.answer,
            request_id: parsed.request_id,
        })
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}
