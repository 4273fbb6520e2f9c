//! save_search_results：完整结果（含正文）写入会话存储，只把精简展示返回给用户

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::keys;
use crate::tools::schema::{parse_args, schema_of, SaveResultsArgs};
use crate::tools::{Tool, ToolContext};

pub struct SaveSearchResultsTool;

#[async_trait]
impl Tool for SaveSearchResultsTool {
    fn name(&self) -> &str {
        "save_search_results"
    }

    fn description(&self) -> &str {
        "Save complete search results (with extracted content) to session state and return a clean user display. Args: {\"search_results\": [{\"round\": \"1 - Overview\", \"results\": [...]}], \"user_display\": \"...\"}"
    }

    fn parameters_schema(&self) -> Value {
        schema_of::<SaveResultsArgs>()
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<String, String> {
        let args: SaveResultsArgs = parse_args(args)?;
        let saved = serde_json::to_value(&args.search_results).map_err(|e| e.to_string())?;
        let total: usize = args.search_results.iter().map(|r| r.results.len()).sum();
        ctx.session.set(keys::SEARCH_RESULTS, saved).await;
        tracing::info!(
            session = ctx.session.id(),
            rounds = args.search_results.len(),
            results = total,
            "search results saved"
        );
        Ok(json!({ "success": true, "message": args.user_display }).to_string())
    }
}
