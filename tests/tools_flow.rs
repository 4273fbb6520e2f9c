//! 工具层集成测试：Mock 模式下的多轮搜索、进度记录、重置、保存结果，以及同一会话的并发搜索

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use researcher::config::{AppConfig, Credentials, SearchSection};
use researcher::core::{keys, ExecutorError, ResearchSession, ToolError};
use researcher::search::{
    MockProvider, SearchAccumulator, SearchProvider, SearchRequest, SearchResponse,
};
use researcher::tools::{
    default_registry, AccumulatingSearchTool, ToolContext, ToolExecutor, ToolRegistry,
};
use serde_json::{json, Value};

fn mock_executor() -> ToolExecutor {
    let registry = default_registry(&AppConfig::default(), &Credentials::default());
    ToolExecutor::new(registry, 5)
}

fn new_ctx() -> ToolContext {
    ToolContext::new(Arc::new(ResearchSession::new()))
}

async fn call(executor: &ToolExecutor, tool: &str, args: Value, ctx: &ToolContext) -> Value {
    let raw = executor.execute(tool, args, ctx).await.expect("tool call");
    serde_json::from_str(&raw).expect("json output")
}

#[tokio::test]
async fn registry_exposes_all_tools() {
    let executor = mock_executor();
    assert_eq!(
        executor.tool_names(),
        vec![
            "clear_search_state",
            "extract_content",
            "extract_contents",
            "save_search_results",
            "tavily_search",
            "web_search",
        ]
    );
    let schema: Vec<Value> = serde_json::from_str(&executor.registry().to_schema_json()).unwrap();
    let search = schema.iter().find(|t| t["name"] == "tavily_search").unwrap();
    assert_eq!(search["parameters"]["required"], json!(["query"]));
}

#[tokio::test]
async fn mock_search_session_runs_to_limit() {
    let executor = mock_executor();
    let ctx = new_ctx();

    let mut numbers = Vec::new();
    for q in ["A", "B", "C"] {
        let out = call(&executor, "tavily_search", json!({ "query": q }), &ctx).await;
        assert_eq!(out["query"], q);
        assert_eq!(out["results"][0]["title"], format!("Mock result for: {q}"));
        numbers.push(out["search_number"].as_u64().unwrap());
    }
    assert_eq!(numbers, vec![1, 2, 3]);

    let progress = ctx.session.get(keys::SEARCH_PROGRESS).await.unwrap();
    assert_eq!(progress["status"], "ready_for_transfer");
    assert_eq!(progress["remaining_searches"], 0);

    let d = call(&executor, "tavily_search", json!({ "query": "D" }), &ctx).await;
    assert_eq!(d["status"], "limit_reached");
    assert_eq!(d["remaining_searches"], 0);
    assert_eq!(d["total_searches"], 3);
    assert_eq!(ctx.session.search_state().await.queries(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn clear_search_state_is_idempotent() {
    let executor = mock_executor();
    let ctx = new_ctx();
    call(&executor, "tavily_search", json!({ "query": "A" }), &ctx).await;
    call(&executor, "tavily_search", json!({ "query": "B" }), &ctx).await;

    let first = call(&executor, "clear_search_state", json!({}), &ctx).await;
    assert_eq!(first["cleared"], 2);
    assert_eq!(first["remaining_searches"], 3);
    assert_eq!(first["status"], "ready");

    let second = call(&executor, "clear_search_state", json!({}), &ctx).await;
    assert_eq!(second["cleared"], 0);
    assert!(ctx.session.search_state().await.is_empty());

    let progress = ctx.session.get(keys::SEARCH_PROGRESS).await.unwrap();
    assert_eq!(progress, json!({ "total_searches": 0, "remaining_searches": 3, "status": "ready" }));
}

#[tokio::test]
async fn sessions_are_isolated() {
    let executor = mock_executor();
    let a = new_ctx();
    let b = new_ctx();
    for q in ["1", "2", "3"] {
        call(&executor, "tavily_search", json!({ "query": q }), &a).await;
    }
    let out = call(&executor, "tavily_search", json!({ "query": "fresh" }), &b).await;
    assert_eq!(out["search_number"], 1);
}

#[tokio::test]
async fn bad_arguments_are_reported() {
    let executor = mock_executor();
    let err = executor
        .execute("tavily_search", json!({ "q": "typo" }), &new_ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutorError::InvalidArguments { .. }));

    let err = executor
        .execute("extract_content", json!({ "url": "nope" }), &new_ctx())
        .await
        .unwrap_err();
    match err {
        ExecutorError::ToolExecutionFailed(msg) => assert!(msg.starts_with("Error: Invalid input")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn web_search_mock_is_formatted() {
    let executor = mock_executor();
    let raw = executor
        .execute("web_search", json!({ "query": "axum" }), &new_ctx())
        .await
        .unwrap();
    assert!(raw.starts_with("Result 1:\nTitle: Mock result for: axum\nURL: https://example.com/search?q=axum"));
}

#[tokio::test]
async fn save_search_results_stores_full_data() {
    let executor = mock_executor();
    let ctx = new_ctx();
    let results = json!([{
        "round": "1 - Overview",
        "results": [{
            "title": "Rust",
            "url": "https://www.rust-lang.org/",
            "snippet": "A language empowering everyone.",
            "published": "2024-01-01",
            "extracted_content": "Long body text",
            "extraction_status": "success"
        }]
    }]);
    let out = call(
        &executor,
        "save_search_results",
        json!({ "search_results": results, "user_display": "1. Rust - https://www.rust-lang.org/" }),
        &ctx,
    )
    .await;
    assert_eq!(out, json!({ "success": true, "message": "1. Rust - https://www.rust-lang.org/" }));

    let saved = ctx.session.get(keys::SEARCH_RESULTS).await.unwrap();
    assert_eq!(saved[0]["results"][0]["extracted_content"], "Long body text");
    assert_eq!(saved[0]["results"][0]["extraction_status"], "success");
}

/// 每次搜索都让出执行权，迫使并发调用交错
struct SlowProvider;

#[async_trait]
impl SearchProvider for SlowProvider {
    async fn search(&self, request: SearchRequest<'_>) -> Result<SearchResponse, ToolError> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(MockProvider::response_for(request))
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_searches_respect_the_cap() {
    let accumulator = Arc::new(SearchAccumulator::new(
        Arc::new(SlowProvider),
        &SearchSection::default(),
    ));
    let mut registry = ToolRegistry::new();
    registry.register(AccumulatingSearchTool::new(accumulator));
    let executor = Arc::new(ToolExecutor::new(registry, 5));
    let ctx = new_ctx();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let executor = executor.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                executor
                    .execute("tavily_search", json!({ "query": format!("q{i}") }), &ctx)
                    .await
            })
        })
        .collect();

    let mut limited = 0;
    for h in handles {
        let raw = h.await.unwrap().unwrap();
        let v: Value = serde_json::from_str(&raw).unwrap();
        if v["status"] == "limit_reached" {
            limited += 1;
        }
    }

    assert_eq!(limited, 5);
    let state = ctx.session.search_state().await;
    assert_eq!(state.len(), 3);
    let numbers: Vec<usize> = state.rounds().iter().map(|r| r.round_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    drop(state);

    let progress = ctx.session.get(keys::SEARCH_PROGRESS).await.unwrap();
    assert_eq!(
        progress,
        json!({ "total_searches": 3, "remaining_searches": 0, "status": "ready_for_transfer" })
    );
}
