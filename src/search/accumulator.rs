//! 有界多轮搜索累积
//!
//! 每个会话最多 max_rounds 轮：调用服务前先检查已有轮数，达到上限直接返回 LimitReached（不发请求、不改状态）；
//! 成功后一次性追加新一轮，服务失败不追加。状态以 `&mut SessionSearchState` 传入，由会话独占。

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::config::SearchSection;
use crate::core::ToolError;

use super::provider::SearchProvider;
use super::types::{SearchRequest, SearchResponse, SearchRound};

/// 会话内已完成的搜索轮次，只追加、不重排；仅在 reset 时清空
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSearchState {
    rounds: Vec<SearchRound>,
}

impl SessionSearchState {
    pub fn rounds(&self) -> &[SearchRound] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn queries(&self) -> Vec<&str> {
        self.rounds.iter().map(|r| r.query.as_str()).collect()
    }
}

/// 一次 search 调用的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// 已追加，仍有剩余轮次
    Continue {
        round: SearchRound,
        response: SearchResponse,
        remaining: usize,
    },
    /// 已追加，本轮达到上限
    Complete {
        round: SearchRound,
        response: SearchResponse,
    },
    /// 调用前已达上限；未发请求，状态不变
    LimitReached { total: usize },
}

impl SearchOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            SearchOutcome::Continue { .. } => "in_progress",
            SearchOutcome::Complete { .. } => "complete",
            SearchOutcome::LimitReached { .. } => "limit_reached",
        }
    }

    pub fn round(&self) -> Option<&SearchRound> {
        match self {
            SearchOutcome::Continue { round, .. } | SearchOutcome::Complete { round, .. } => {
                Some(round)
            }
            SearchOutcome::LimitReached { .. } => None,
        }
    }

    pub fn remaining(&self) -> usize {
        match self {
            SearchOutcome::Continue { remaining, .. } => *remaining,
            _ => 0,
        }
    }

    /// 本次调用后会话内的总轮数
    pub fn total(&self) -> usize {
        match self {
            SearchOutcome::Continue { round, .. } | SearchOutcome::Complete { round, .. } => {
                round.round_number
            }
            SearchOutcome::LimitReached { total } => *total,
        }
    }

    /// 给调用方（agent）的下一步指示
    pub fn message(&self, max_rounds: usize) -> String {
        match self {
            SearchOutcome::Continue { round, remaining, .. } => format!(
                "Search {}/{} complete. {} searches remaining.",
                round.round_number, max_rounds, remaining
            ),
            SearchOutcome::Complete { .. } => {
                "All searches complete. Stop searching and proceed to analysis.".to_string()
            }
            SearchOutcome::LimitReached { .. } => format!(
                "Search limit reached - maximum {} searches allowed per research session. Stop searching and proceed to analysis.",
                max_rounds
            ),
        }
    }

    /// 工具输出 JSON：服务响应 + 轮次簿记字段
    pub fn to_json(&self, query: &str, max_rounds: usize) -> Value {
        let mut out = match self {
            SearchOutcome::Continue { response, .. } | SearchOutcome::Complete { response, .. } => {
                serde_json::to_value(response).unwrap_or_else(|_| json!({ "query": query }))
            }
            SearchOutcome::LimitReached { .. } => json!({ "query": query, "results": [] }),
        };
        if let Some(obj) = out.as_object_mut() {
            obj.insert("search_number".into(), json!(self.total()));
            obj.insert("total_searches".into(), json!(self.total()));
            obj.insert("remaining_searches".into(), json!(self.remaining()));
            obj.insert("status".into(), json!(self.status()));
            obj.insert("message".into(), json!(self.message(max_rounds)));
            if matches!(self, SearchOutcome::LimitReached { .. }) {
                obj.insert("next_action".into(), json!("proceed_to_analysis"));
            }
        }
        out
    }
}

/// 有界搜索累积器；服务在构造时选定
pub struct SearchAccumulator {
    provider: Arc<dyn SearchProvider>,
    max_rounds: usize,
    max_results: usize,
    include_raw_content: bool,
}

impl SearchAccumulator {
    pub fn new(provider: Arc<dyn SearchProvider>, config: &SearchSection) -> Self {
        Self {
            provider,
            max_rounds: config.max_rounds,
            max_results: config.max_results,
            include_raw_content: config.include_raw_content,
        }
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// 执行一轮搜索并追加到会话状态
    pub async fn search(
        &self,
        query: &str,
        state: &mut SessionSearchState,
    ) -> Result<SearchOutcome, ToolError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidInput("Missing query".to_string()));
        }

        let completed = state.len();
        if completed >= self.max_rounds {
            tracing::warn!(
                completed,
                max_rounds = self.max_rounds,
                query = %query,
                "search limit reached, skipping"
            );
            return Ok(SearchOutcome::LimitReached { total: completed });
        }

        let request = SearchRequest {
            query,
            max_results: self.max_results,
            include_raw_content: self.include_raw_content,
        };
        let response = self.provider.search(request).await.map_err(|e| {
            tracing::warn!(provider = self.provider.name(), error = %e, "search round failed");
            e
        })?;

        let round = SearchRound {
            query: query.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            results: response.results.clone(),
            response_time_ms: response.response_time_ms,
            round_number: completed + 1,
        };
        state.rounds.push(round.clone());

        let remaining = self.max_rounds.saturating_sub(state.len());
        tracing::info!(
            round = round.round_number,
            max_rounds = self.max_rounds,
            results = round.results.len(),
            provider = self.provider.name(),
            query = %query,
            "search round completed"
        );

        Ok(if remaining == 0 {
            SearchOutcome::Complete { round, response }
        } else {
            SearchOutcome::Continue {
                round,
                response,
                remaining,
            }
        })
    }

    /// 清空会话状态，返回清除的轮数；空状态时为 0
    pub fn reset(&self, state: &mut SessionSearchState) -> usize {
        let cleared = state.rounds.len();
        state.rounds.clear();
        tracing::info!(cleared, "search state cleared for new research session");
        cleared
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::search::mock::MockProvider;

    /// 计数调用次数；第 fail_on 次调用返回错误
    struct FlakyProvider {
        calls: AtomicUsize,
        fail_on: usize,
    }

    #[async_trait]
    impl SearchProvider for FlakyProvider {
        async fn search(&self, request: SearchRequest<'_>) -> Result<SearchResponse, ToolError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.fail_on {
                return Err(ToolError::provider("flaky", "HTTP 502"));
            }
            Ok(MockProvider::response_for(request))
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    fn accumulator(provider: Arc<dyn SearchProvider>) -> SearchAccumulator {
        SearchAccumulator::new(provider, &SearchSection::default())
    }

    #[tokio::test]
    async fn test_three_rounds_then_limit() {
        let acc = accumulator(Arc::new(MockProvider));
        let mut state = SessionSearchState::default();

        let a = acc.search("A", &mut state).await.unwrap();
        assert_eq!(a.round().unwrap().round_number, 1);
        assert_eq!(a.remaining(), 2);
        assert_eq!(a.status(), "in_progress");

        let b = acc.search("B", &mut state).await.unwrap();
        assert_eq!(b.round().unwrap().round_number, 2);
        assert_eq!(b.remaining(), 1);

        let c = acc.search("C", &mut state).await.unwrap();
        assert_eq!(c.round().unwrap().round_number, 3);
        assert!(matches!(c, SearchOutcome::Complete { .. }));
        assert_eq!(c.remaining(), 0);

        let d = acc.search("D", &mut state).await.unwrap();
        assert_eq!(d, SearchOutcome::LimitReached { total: 3 });
        assert_eq!(d.remaining(), 0);
        assert_eq!(state.queries(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_limit_reached_makes_no_provider_call() {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicUsize::new(0),
            fail_on: usize::MAX,
        });
        let acc = accumulator(provider.clone());
        let mut state = SessionSearchState::default();
        for q in ["a", "b", "c"] {
            acc.search(q, &mut state).await.unwrap();
        }
        let before = state.clone();
        let out = acc.search("d", &mut state).await.unwrap();
        assert!(matches!(out, SearchOutcome::LimitReached { .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_provider_failure_does_not_append() {
        let acc = accumulator(Arc::new(FlakyProvider {
            calls: AtomicUsize::new(0),
            fail_on: 2,
        }));
        let mut state = SessionSearchState::default();
        acc.search("first", &mut state).await.unwrap();

        let err = acc.search("second", &mut state).await.unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::ProviderError);
        assert_eq!(state.len(), 1);

        // 失败不占用轮次：下一次成功仍编号为 2
        let next = acc.search("second again", &mut state).await.unwrap();
        assert_eq!(next.round().unwrap().round_number, 2);
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_state_change() {
        let acc = accumulator(Arc::new(MockProvider));
        let mut state = SessionSearchState::default();
        let err = acc.search("   ", &mut state).await.unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::InvalidInput);
        assert!(state.is_empty());
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let acc = accumulator(Arc::new(MockProvider));
        let mut state = SessionSearchState::default();
        acc.search("x", &mut state).await.unwrap();
        acc.search("y", &mut state).await.unwrap();

        assert_eq!(acc.reset(&mut state), 2);
        assert!(state.is_empty());
        assert_eq!(acc.reset(&mut state), 0);

        let again = acc.search("z", &mut state).await.unwrap();
        assert_eq!(again.round().unwrap().round_number, 1);
    }

    #[tokio::test]
    async fn test_round_records_timestamp_and_results() {
        let acc = accumulator(Arc::new(MockProvider));
        let mut state = SessionSearchState::default();
        acc.search("rust", &mut state).await.unwrap();
        let round = &state.rounds()[0];
        assert!(chrono::DateTime::parse_from_rfc3339(&round.timestamp).is_ok());
        assert_eq!(round.results.len(), 1);
        assert_eq!(round.response_time_ms, 0);
    }

    #[tokio::test]
    async fn test_outcome_json_fields() {
        let acc = accumulator(Arc::new(MockProvider));
        let mut state = SessionSearchState::default();
        let out = acc.search("A", &mut state).await.unwrap();
        let v = out.to_json("A", 3);
        assert_eq!(v["query"], "A");
        assert_eq!(v["search_number"], 1);
        assert_eq!(v["remaining_searches"], 2);
        assert_eq!(v["status"], "in_progress");
        assert!(v["results"].is_array());

        let limit = SearchOutcome::LimitReached { total: 3 };
        let v = limit.to_json("D", 3);
        assert_eq!(v["status"], "limit_reached");
        assert_eq!(v["remaining_searches"], 0);
        assert_eq!(v["results"], json!([]));
        assert!(v["message"].as_str().unwrap().contains("Stop searching"));
        assert_eq!(v["next_action"], "proceed_to_analysis");
    }
}
