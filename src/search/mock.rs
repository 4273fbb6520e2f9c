//! Mock 搜索服务（无 API Key 时使用）
//!
//! 固定形态、回显查询，便于无外部依赖地开发与测试；同样经过累积与轮数上限逻辑。

use async_trait::async_trait;

use crate::core::ToolError;

use super::provider::SearchProvider;
use super::types::{SearchRequest, SearchResponse, SearchResultItem};

const MOCK_RAW_CONTENT: &str =
    "<html><head><title>Test</title></head><body>Mock content</body></html>";

#[derive(Debug, Default, Clone, Copy)]
pub struct MockProvider;

impl MockProvider {
    pub fn response_for(request: SearchRequest<'_>) -> SearchResponse {
        let encoded: String = url::form_urlencoded::byte_serialize(request.query.as_bytes()).collect();
        SearchResponse {
            query: request.query.to_string(),
            results: vec![SearchResultItem {
                url: format!("https://example.com/search?q={}", encoded),
                title: format!("Mock result for: {}", request.query),
                content: format!(
                    "This is mock content for '{}'. Set an API key to get real results.",
                    request.query
                ),
                score: 0.5,
                raw_content: request
                    .include_raw_content
                    .then(|| MOCK_RAW_CONTENT.to_string()),
            }],
            response_time_ms: 0,
            answer: None,
            request_id: Some("mock-0".to_string()),
        }
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    async fn search(&self, request: SearchRequest<'_>) -> Result<SearchResponse, ToolError> {
        Ok(Self::response_for(request))
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_mock(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_query_deterministically() {
        let request = SearchRequest {
            query: "rust async",
            max_results: 2,
            include_raw_content: true,
        };
        let a = MockProvider.search(request).await.unwrap();
        let b = MockProvider.search(request).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.query, "rust async");
        assert_eq!(a.results.len(), 1);
        assert_eq!(a.results[0].url, "https://example.com/search?q=rust+async");
        assert!(a.results[0].title.contains("rust async"));
        assert!(a.results[0].raw_content.is_some());
    }

    #[tokio::test]
    async fn test_mock_omits_raw_content_when_not_requested() {
        let request = SearchRequest {
            query: "q",
            max_results: 2,
            include_raw_content: false,
        };
        let resp = MockProvider.search(request).await.unwrap();
        assert!(resp.results[0].raw_content.is_none());
    }
}
