//! 累积搜索工具：tavily_search（受每会话轮数上限约束）与 clear_search_state（开始新研究会话）
//!
//! 两个工具共享同一个 SearchAccumulator，状态取自 ToolContext 中的会话；进度在持有会话搜索状态锁时写入会话键值存储，与累积状态保持一致。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::{keys, ResearchSession};
use crate::search::{SearchAccumulator, SearchOutcome};
use crate::tools::schema::{parse_args, schema_of, SearchArgs};
use crate::tools::{Tool, ToolContext};

pub struct AccumulatingSearchTool {
    accumulator: Arc<SearchAccumulator>,
}

impl AccumulatingSearchTool {
    pub fn new(accumulator: Arc<SearchAccumulator>) -> Self {
        Self { accumulator }
    }
}

async fn record_progress(session: &ResearchSession, total: usize, remaining: usize, status: &str) {
    session
        .set(
            keys::SEARCH_PROGRESS,
            json!({
                "total_searches": total,
                "remaining_searches": remaining,
                "status": status,
            }),
        )
        .await;
}

#[async_trait]
impl Tool for AccumulatingSearchTool {
    fn name(&self) -> &str {
        "tavily_search"
    }

    fn description(&self) -> &str {
        "Search the web and return results with URLs and content. Limited number of searches per research session; when the limit is reached, stop searching and proceed. Args: {\"query\": \"...\"}"
    }

    fn parameters_schema(&self) -> Value {
        schema_of::<SearchArgs>()
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<String, String> {
        let args: SearchArgs = parse_args(args)?;
        let max_rounds = self.accumulator.max_rounds();

        // 持锁完成“检查-调用-追加-记录进度”，同一会话的并发调用依次执行
        let mut state = ctx.session.search_state().await;
        let outcome = self
            .accumulator
            .search(&args.query, &mut state)
            .await
            .map_err(|e| format!("Error: {}", e))?;

        let progress_status = match &outcome {
            SearchOutcome::Continue { .. } => "collecting_results",
            SearchOutcome::Complete { .. } | SearchOutcome::LimitReached { .. } => {
                "ready_for_transfer"
            }
        };
        record_progress(&ctx.session, outcome.total(), outcome.remaining(), progress_status).await;
        drop(state);

        Ok(outcome.to_json(args.query.trim(), max_rounds).to_string())
    }
}

pub struct ClearSearchStateTool {
    accumulator: Arc<SearchAccumulator>,
}

impl ClearSearchStateTool {
    pub fn new(accumulator: Arc<SearchAccumulator>) -> Self {
        Self { accumulator }
    }
}

#[async_trait]
impl Tool for ClearSearchStateTool {
    fn name(&self) -> &str {
        "clear_search_state"
    }

    fn description(&self) -> &str {
        "Clear previous search results to start a new research session. Args: {}"
    }

    async fn execute(&self, _args: Value, ctx: &ToolContext) -> Result<String, String> {
        let mut state = ctx.session.search_state().await;
        let cleared = self.accumulator.reset(&mut state);
        let max_rounds = self.accumulator.max_rounds();
        record_progress(&ctx.session, 0, max_rounds, "ready").await;
        drop(state);

        Ok(json!({
            "message": format!("Cleared {} previous search results", cleared),
            "cleared": cleared,
            "remaining_searches": max_rounds,
            "status": "ready",
        })
        .to_string())
    }
}
