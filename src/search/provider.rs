//! 搜索服务抽象
//!
//! 累积器在构造时选定一个 SearchProvider：有凭证用真实服务，无凭证用 MockProvider，调用路径上不再分支。

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Credentials, SearchProviderKind, SearchSection};
use crate::core::ToolError;

use super::google::GoogleProvider;
use super::mock::MockProvider;
use super::tavily::TavilyProvider;
use super::types::{SearchRequest, SearchResponse};

/// 搜索服务 trait
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 执行一次搜索；失败返回 ToolError::Provider
    async fn search(&self, request: SearchRequest<'_>) -> Result<SearchResponse, ToolError>;

    /// 服务名（日志与错误信息用）
    fn name(&self) -> &'static str;

    fn is_mock(&self) -> bool {
        false
    }
}

/// 按配置与凭证选择累积搜索使用的服务
pub fn provider_from_config(
    search: &SearchSection,
    credentials: &Credentials,
) -> Arc<dyn SearchProvider> {
    match search.provider {
        SearchProviderKind::Tavily => match credentials.tavily_api_key.clone() {
            Some(key) => Arc::new(TavilyProvider::new(key, search)),
            None => {
                tracing::warn!("TAVILY_API_KEY not set, search runs in mock mode");
                Arc::new(MockProvider)
            }
        },
        SearchProviderKind::Google => web_search_provider(search, credentials),
    }
}

/// 独立网页搜索（web_search 工具）使用的服务：Google，缺凭证时为 Mock
pub fn web_search_provider(
    search: &SearchSection,
    credentials: &Credentials,
) -> Arc<dyn SearchProvider> {
    match credentials.google() {
        Some((key, cx)) => Arc::new(GoogleProvider::new(key, cx, search)),
        None => {
            tracing::warn!("GOOGLE_API_KEY / GOOGLE_CX not set, web search runs in mock mode");
            Arc::new(MockProvider)
        }
    }
}
