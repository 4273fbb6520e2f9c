//! Google Custom Search：GET {base}/customsearch/v1?key=&cx=&q=&num=

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::SearchSection;
use crate::core::ToolError;

use super::provider::SearchProvider;
use super::types::{SearchRequest, SearchResponse, SearchResultItem};

/// Custom Search 单次最多返回 10 条
const MAX_NUM: usize = 10;

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    cx: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl GoogleProvider {
    pub fn new(api_key: String, cx: String, config: &SearchSection) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key,
            cx,
            base_url: config.google_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleProvider {
    async fn search(&self, request: SearchRequest<'_>) -> Result<SearchResponse, ToolError> {
        let started = Instant::now();
        let num = request.max_results.clamp(1, MAX_NUM).to_string();
        let res = self
            .client
            .get(format!("{}/customsearch/v1", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("q", request.query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ToolError::provider(self.name(), format!("Search failed: {}", e)))?;

        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ToolError::provider(
                self.name(),
                format!("Google Search API error: {}", body),
            ));
        }

        let parsed: GoogleResponse = res
            .json()
            .await
            .map_err(|e| ToolError::provider(self.name(), format!("Invalid response: {}", e)))?;

        // 没有相关度分数，按排名递减
        let results = parsed
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| SearchResultItem {
                url: item.link,
                title: item.title,
                content: item.snippet,
                score: 1.0 / (i as f64 + 1.0),
                raw_content: None,
            })
            .collect();

        Ok(SearchResponse {
            query: request.query.to_string(),
            results,
            response_time_ms: started.elapsed().as_millis() as u64,
            answer: None,
            request_id: None,
        })
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
